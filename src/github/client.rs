use crate::auth::Credentials;
use crate::error::{ForkinfoError, Result};
use crate::github::types::{CommitSummary, CompareOutcome, RepoSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::models::Repository;
use octocrab::Octocrab;
use serde::Deserialize;

const MAX_PER_PAGE: u64 = 100;

/// Read-only access to repository data on the hosting provider.
///
/// Retries, pagination and authentication live behind this trait; callers
/// only see snapshots and comparison primitives.
#[async_trait]
pub trait RepoClient: Send + Sync {
    async fn get_repository(&self, owner: &str, name: &str) -> Result<RepoSnapshot>;

    /// `size_hint` is the expected number of forks, used to size pages.
    async fn list_forks(&self, owner: &str, name: &str, size_hint: u64) -> Result<Vec<RepoSnapshot>>;

    async fn compare_commits(
        &self,
        owner: &str,
        name: &str,
        base: &str,
        head: &str,
    ) -> Result<CompareOutcome>;
}

#[derive(Clone)]
pub struct GitHubClient {
    octo: Octocrab,
}

impl GitHubClient {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Self::build(credentials, None)
    }

    /// Same as [`GitHubClient::new`] but talking to another API root, such
    /// as a GitHub Enterprise host.
    pub fn with_base_uri(credentials: &Credentials, base_uri: &str) -> Result<Self> {
        Self::build(credentials, Some(base_uri))
    }

    fn build(credentials: &Credentials, base_uri: Option<&str>) -> Result<Self> {
        let mut builder = match credentials {
            Credentials::Token(token) => Octocrab::builder().personal_token(token.clone()),
            Credentials::Anonymous => Octocrab::builder(),
        };
        if let Some(uri) = base_uri {
            builder = builder
                .base_uri(uri)
                .map_err(|e| ForkinfoError::Config(format!("invalid API base uri {uri}: {e}")))?;
        }
        let octo = builder
            .build()
            .map_err(|e| ForkinfoError::GitHub(e.to_string()))?;

        Ok(Self { octo })
    }
}

#[async_trait]
impl RepoClient for GitHubClient {
    async fn get_repository(&self, owner: &str, name: &str) -> Result<RepoSnapshot> {
        let repo = self
            .octo
            .repos(owner, name)
            .get()
            .await
            .map_err(|e| map_octo_err(e, || ForkinfoError::NotFound(format!("{owner}/{name}"))))?;
        Ok(snapshot(repo))
    }

    async fn list_forks(&self, owner: &str, name: &str, size_hint: u64) -> Result<Vec<RepoSnapshot>> {
        let per_page = size_hint.clamp(1, MAX_PER_PAGE) as u8;
        let mut forks = Vec::new();
        let mut page = 1u32;

        loop {
            let result = self
                .octo
                .repos(owner, name)
                .list_forks()
                .per_page(per_page)
                .page(page)
                .send()
                .await
                .map_err(|e| map_octo_err(e, || ForkinfoError::NotFound(format!("{owner}/{name}"))))?;

            if result.items.is_empty() {
                break;
            }
            forks.extend(result.items.into_iter().map(snapshot));

            if result.next.is_none() {
                break;
            }
            page += 1;
        }

        tracing::info!(count = forks.len(), "listed forks of {owner}/{name}");
        Ok(forks)
    }

    async fn compare_commits(
        &self,
        owner: &str,
        name: &str,
        base: &str,
        head: &str,
    ) -> Result<CompareOutcome> {
        // The typed comparison model insists on full base and merge-base
        // commits; only the status string, counts and commit list are needed.
        let raw: RawComparison = self
            .octo
            .get(format!("/repos/{owner}/{name}/compare/{base}...{head}"), None::<&()>)
            .await
            .map_err(|e| map_octo_err(e, || ForkinfoError::RefNotFound(format!("{base}...{head}"))))?;
        Ok(raw.into())
    }
}

fn map_octo_err(err: octocrab::Error, not_found: impl FnOnce() -> ForkinfoError) -> ForkinfoError {
    match &err {
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404 => not_found(),
        _ => ForkinfoError::GitHub(err.to_string()),
    }
}

fn count<T: TryInto<u64>>(value: Option<T>) -> u64 {
    value.and_then(|n| n.try_into().ok()).unwrap_or(0)
}

fn snapshot(repo: Repository) -> RepoSnapshot {
    let owner = repo
        .owner
        .as_ref()
        .map(|o| o.login.clone())
        .unwrap_or_default();
    let full_name = repo
        .full_name
        .clone()
        .unwrap_or_else(|| format!("{owner}/{}", repo.name));

    RepoSnapshot {
        full_name,
        description: repo.description,
        html_url: repo.html_url.map(|u| u.to_string()).unwrap_or_default(),
        default_branch: repo.default_branch.unwrap_or_else(|| "main".to_string()),
        // Fork listings leave this out; only the single-repository endpoint reports it.
        subscribers: count(repo.subscribers_count),
        stars: count(repo.stargazers_count),
        forks: count(repo.forks_count),
        open_issues: count(repo.open_issues_count),
        pushed_at: repo.pushed_at,
        owner,
        name: repo.name,
    }
}

#[derive(Deserialize)]
struct RawComparison {
    status: String,
    ahead_by: u64,
    behind_by: u64,
    total_commits: u64,
    html_url: String,
    #[serde(default)]
    commits: Vec<RawCommit>,
}

#[derive(Deserialize)]
struct RawCommit {
    sha: String,
    commit: RawCommitDetail,
}

#[derive(Deserialize)]
struct RawCommitDetail {
    author: Option<RawSignature>,
    message: String,
}

#[derive(Deserialize)]
struct RawSignature {
    name: String,
    date: Option<DateTime<Utc>>,
}

impl From<RawComparison> for CompareOutcome {
    fn from(raw: RawComparison) -> Self {
        let commits = raw
            .commits
            .into_iter()
            .map(|c| {
                let (author, time) = match c.commit.author {
                    Some(sig) => (sig.name, sig.date),
                    None => (String::new(), None),
                };
                CommitSummary {
                    sha: c.sha,
                    author,
                    time,
                    message: c.commit.message,
                }
            })
            .collect();

        Self {
            status: raw.status,
            ahead_by: raw.ahead_by,
            behind_by: raw.behind_by,
            total_commits: raw.total_commits,
            html_url: raw.html_url,
            commits,
        }
    }
}
