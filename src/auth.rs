use crate::config::Config;
use crate::error::{ForkinfoError, Result};
use dialoguer::{theme::ColorfulTheme, Input};
use std::io::IsTerminal;
use std::path::Path;

const TOKEN_NOTICE: &str = "\
The GitHub API limits unauthenticated access to 60 requests per
hour. To raise these limits, create a Personal Access Token at
https://github.com/settings/tokens/new?description=Forkinfo.
Leave scopes unchecked - forkinfo requires no special access.
";

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Anonymous,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token([REDACTED])"),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Outcome of looking at flags and configuration, before any prompting.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    Ready(Credentials),
    NeedsPrompt,
}

pub fn resolve(flag_token: Option<String>, no_token: bool, config: &Config) -> Result<Resolution> {
    match (flag_token, no_token) {
        (Some(_), true) => Err(ForkinfoError::Config(
            "--token and --no-token cannot be used together".to_string(),
        )),
        (Some(token), false) if token.trim().is_empty() => {
            Err(ForkinfoError::Config("--token was given an empty value".to_string()))
        }
        (Some(token), false) => Ok(Resolution::Ready(Credentials::Token(token.trim().to_string()))),
        (None, true) => Ok(Resolution::Ready(Credentials::Anonymous)),
        (None, false) => Ok(match config.access_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Resolution::Ready(Credentials::Token(token.to_string())),
            _ => Resolution::NeedsPrompt,
        }),
    }
}

/// Asks on the terminal for a token and stores it for later runs. Without a
/// terminal the run continues unauthenticated.
pub fn prompt_and_store(config_file: &Path) -> Result<Credentials> {
    if !std::io::stdin().is_terminal() {
        tracing::warn!("no access token configured and stdin is not a terminal, continuing unauthenticated");
        return Ok(Credentials::Anonymous);
    }

    eprintln!("{TOKEN_NOTICE}");
    let token: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Paste your API key below")
        .validate_with(|input: &String| validate_token(input))
        .interact_text()
        .map_err(|e| ForkinfoError::Config(format!("reading access token: {e}")))?;
    let token = token.trim().to_string();

    eprintln!("Saving config to {} ...", config_file.display());
    if let Err(e) = Config::save_token(config_file, &token) {
        tracing::warn!("failed saving config: {e}");
    }
    Ok(Credentials::Token(token))
}

pub fn validate_token(input: &str) -> std::result::Result<(), &'static str> {
    let token = input.trim();
    if token.is_empty() {
        return Err("the token cannot be empty");
    }
    if token.contains(char::is_whitespace) {
        return Err("the token cannot contain spaces");
    }
    Ok(())
}
