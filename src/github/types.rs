use crate::error::ForkinfoError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Read-only view of one repository as it looked when it was fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoSnapshot {
    pub owner: String,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub default_branch: String,
    pub subscribers: u64,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    /// `None` only when the remote has no push history at all.
    pub pushed_at: Option<DateTime<Utc>>,
}

/// Raw result of a commit-range comparison, before classification.
#[derive(Clone, Debug, Default)]
pub struct CompareOutcome {
    pub status: String,
    pub ahead_by: u64,
    pub behind_by: u64,
    pub total_commits: u64,
    pub html_url: String,
    pub commits: Vec<CommitSummary>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitSummary {
    pub sha: String,
    pub author: String,
    pub time: Option<DateTime<Utc>>,
    pub message: String,
}

impl CommitSummary {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

/// An `owner/name` pair as typed on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoRef {
    type Err = ForkinfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ForkinfoError::InvalidRepoRef(s.to_string());
        let (owner, name) = s.split_once('/').ok_or_else(invalid)?;
        let valid_part = |p: &str| !p.is_empty() && !p.contains('/') && !p.contains(char::is_whitespace);
        if !valid_part(owner) || !valid_part(name) {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
