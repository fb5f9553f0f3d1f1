mod auth;
mod census;
mod config;
mod error;
mod github;
mod report;
#[cfg(test)]
mod test_utils;

use auth::{Credentials, Resolution};
use census::types::CensusOptions;
use census::Census;
use clap::Parser;
use config::Config;
use error::{ForkinfoError, Result};
use github::client::GitHubClient;
use github::types::RepoRef;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "forkinfo",
    version,
    about = "List the forks of a GitHub repository and how far each has drifted"
)]
struct Cli {
    /// Repository to inspect, as <owner>/<repository>
    repository: String,

    #[arg(long, help = "Hide forks identical to upstream")]
    hide_same: bool,

    #[arg(long, help = "Hide forks that are only behind upstream")]
    hide_old: bool,

    #[arg(long, help = "List commits of forks that are ahead or diverged")]
    show_commits: bool,

    #[arg(long, short = 't', help = "GitHub access token to use for this run")]
    token: Option<String>,

    #[arg(long, short = 'T', help = "Make unauthenticated requests")]
    no_token: bool,

    #[arg(long, short = 'j', help = "Number of forks compared at once")]
    jobs: Option<usize>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("[ERROR] {e}");
        if matches!(e, ForkinfoError::InvalidRepoRef(_)) {
            eprintln!();
            eprintln!("Usage: forkinfo <owner>/<repository>");
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("FORKINFO_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let target: RepoRef = cli.repository.parse()?;
    let config = Config::load();
    tracing::debug!(?config, "loaded config");

    let credentials = match auth::resolve(cli.token, cli.no_token, &config)? {
        Resolution::Ready(creds) => creds,
        Resolution::NeedsPrompt => auth::prompt_and_store(&config::config_file())?,
    };
    if credentials == Credentials::Anonymous {
        tracing::info!("using unauthenticated GitHub access");
    }

    let client = match config.api_base_uri.as_deref() {
        Some(uri) => GitHubClient::with_base_uri(&credentials, uri)?,
        None => GitHubClient::new(&credentials)?,
    };
    let concurrency = cli.jobs.unwrap_or(config.concurrency);
    let census = Census::new(Arc::new(client), concurrency, config.compare_timeout());

    let options = CensusOptions {
        hide_mirrors: cli.hide_same,
        hide_outdated: cli.hide_old,
        include_commit_detail: cli.show_commits,
    };

    eprintln!("Fetching repository...");
    let (upstream, forks) = census.fetch(&target).await?;
    if !forks.is_empty() {
        eprintln!("Comparing {} forks of {}...", forks.len(), upstream.full_name);
    }

    let report = census.classify_all(&upstream, forks, &options).await;
    print!("{}", report::render(&upstream, &report, options.include_commit_detail));
    Ok(())
}
