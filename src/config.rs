use crate::census::DEFAULT_CONCURRENCY;
use crate::error::{ForkinfoError, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    pub access_token: Option<String>,
    pub concurrency: usize,
    pub compare_timeout_secs: u64,
    /// API root for GitHub Enterprise; unset means api.github.com.
    #[serde(default)]
    pub api_base_uri: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("concurrency", &self.concurrency)
            .field("compare_timeout_secs", &self.compare_timeout_secs)
            .field("api_base_uri", &self.api_base_uri)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_token: None,
            concurrency: DEFAULT_CONCURRENCY,
            compare_timeout_secs: 30,
            api_base_uri: None,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&config_file())
    }

    pub fn load_from(config_file: &Path) -> Self {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if config_file.exists() {
            figment = figment.merge(Toml::file(config_file));
        }

        figment = figment.merge(Env::prefixed("FORKINFO_").ignore(&["LOG"])).merge(
            Env::raw()
                .only(&["GITHUB_TOKEN"])
                .map(|_| "access_token".into()),
        );

        match figment.extract() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("config parse error, using defaults: {e}");
                Config::default()
            }
        }
    }

    /// Zero disables the per-fork timeout.
    pub fn compare_timeout(&self) -> Option<Duration> {
        (self.compare_timeout_secs > 0).then(|| Duration::from_secs(self.compare_timeout_secs))
    }

    /// Writes `token` into the config file, keeping any other keys already there.
    pub fn save_token(config_file: &Path, token: &str) -> Result<()> {
        let mut stored: toml::Table = match std::fs::read_to_string(config_file) {
            Ok(content) => toml::from_str(&content)
                .map_err(|e| ForkinfoError::Config(format!("{}: {e}", config_file.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
            Err(e) => return Err(e.into()),
        };
        stored.insert("access_token".to_string(), toml::Value::String(token.to_string()));

        if let Some(parent) = config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&stored)
            .map_err(|e| ForkinfoError::Config(e.to_string()))?;
        std::fs::write(config_file, content)?;
        Ok(())
    }
}

pub fn config_file() -> PathBuf {
    config_dir().join("forkinfo").join("config.toml")
}

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}
