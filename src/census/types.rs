use crate::github::types::{CommitSummary, RepoSnapshot};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForkStatus {
    Identical,
    Ahead,
    Behind,
    Diverged,
    Unreachable,
}

impl ForkStatus {
    /// Maps a comparison status as reported by the remote. `Unreachable` is
    /// never reported remotely, so it has no string form here.
    pub fn from_remote(status: &str) -> Option<Self> {
        match status {
            "identical" => Some(Self::Identical),
            "ahead" => Some(Self::Ahead),
            "behind" => Some(Self::Behind),
            "diverged" => Some(Self::Diverged),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identical => "identical",
            Self::Ahead => "ahead",
            Self::Behind => "behind",
            Self::Diverged => "diverged",
            Self::Unreachable => "unreachable",
        }
    }

    pub fn has_own_commits(&self) -> bool {
        matches!(self, Self::Ahead | Self::Diverged)
    }
}

impl fmt::Display for ForkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one fork relates to upstream's default branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub status: ForkStatus,
    pub total_commits: u64,
    pub ahead_by: u64,
    pub behind_by: u64,
    pub diff_url: String,
    pub commits: Vec<CommitSummary>,
}

impl Comparison {
    pub fn identical() -> Self {
        Self::with_status(ForkStatus::Identical)
    }

    pub fn unreachable() -> Self {
        Self::with_status(ForkStatus::Unreachable)
    }

    fn with_status(status: ForkStatus) -> Self {
        Self {
            status,
            total_commits: 0,
            ahead_by: 0,
            behind_by: 0,
            diff_url: String::new(),
            commits: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub total: usize,
    pub mirror: usize,
    pub outdated: usize,
    pub broken: usize,
}

impl Tally {
    pub fn record(&mut self, status: ForkStatus) {
        self.total += 1;
        match status {
            ForkStatus::Identical => self.mirror += 1,
            ForkStatus::Behind => self.outdated += 1,
            ForkStatus::Unreachable => self.broken += 1,
            ForkStatus::Ahead | ForkStatus::Diverged => {}
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CensusOptions {
    pub hide_mirrors: bool,
    pub hide_outdated: bool,
    pub include_commit_detail: bool,
}

impl CensusOptions {
    pub fn hides(&self, status: ForkStatus) -> bool {
        match status {
            ForkStatus::Identical => self.hide_mirrors,
            ForkStatus::Behind => self.hide_outdated,
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ForkRow {
    /// Zero-based position of the fork in the list the census was given.
    pub position: usize,
    pub fork: RepoSnapshot,
    pub comparison: Comparison,
}

#[derive(Clone, Debug, Default)]
pub struct CensusReport {
    pub rows: Vec<ForkRow>,
    pub tally: Tally,
}
