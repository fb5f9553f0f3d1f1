#![cfg(test)]

use crate::error::{ForkinfoError, Result};
use crate::github::client::RepoClient;
use crate::github::types::*;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn make_time(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn make_upstream(pushed_secs: i64) -> RepoSnapshot {
    RepoSnapshot {
        owner: "upstream".to_string(),
        name: "project".to_string(),
        full_name: "upstream/project".to_string(),
        description: Some("A test project".to_string()),
        html_url: "https://github.com/upstream/project".to_string(),
        default_branch: "main".to_string(),
        subscribers: 12,
        stars: 340,
        forks: 0,
        open_issues: 7,
        pushed_at: Some(make_time(pushed_secs)),
    }
}

pub fn make_fork(owner: &str, pushed_secs: i64) -> RepoSnapshot {
    RepoSnapshot {
        owner: owner.to_string(),
        name: "project".to_string(),
        full_name: format!("{owner}/project"),
        description: None,
        html_url: format!("https://github.com/{owner}/project"),
        default_branch: "main".to_string(),
        subscribers: 0,
        stars: 1,
        forks: 0,
        open_issues: 0,
        pushed_at: Some(make_time(pushed_secs)),
    }
}

pub fn make_summary(sha: &str) -> CommitSummary {
    CommitSummary {
        sha: format!("{sha}00000000"),
        author: "Test Author".to_string(),
        time: Some(make_time(0)),
        message: format!("commit {sha}"),
    }
}

pub fn outcome(status: &str, ahead: u64, behind: u64, commits: Vec<CommitSummary>) -> CompareOutcome {
    CompareOutcome {
        status: status.to_string(),
        ahead_by: ahead,
        behind_by: behind,
        total_commits: ahead + behind,
        html_url: format!("https://github.com/upstream/project/compare/{status}"),
        commits,
    }
}

/// Scripted [`RepoClient`]: comparisons are answered per fork owner and
/// every call is counted.
#[derive(Default)]
pub struct FakeClient {
    upstream: Option<RepoSnapshot>,
    forks: Vec<RepoSnapshot>,
    fail_fork_list: bool,
    outcomes: HashMap<String, CompareOutcome>,
    failures: HashSet<String>,
    panics: HashSet<String>,
    delay: Option<Duration>,
    compare_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    list_calls: AtomicUsize,
    requests: Mutex<Vec<(String, String, String, String)>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upstream(mut self, upstream: RepoSnapshot) -> Self {
        self.upstream = Some(upstream);
        self
    }

    pub fn with_forks(mut self, forks: Vec<RepoSnapshot>) -> Self {
        self.forks = forks;
        self
    }

    pub fn with_broken_fork_list(mut self) -> Self {
        self.fail_fork_list = true;
        self
    }

    pub fn with_outcome(mut self, fork_owner: &str, outcome: CompareOutcome) -> Self {
        self.outcomes.insert(fork_owner.to_string(), outcome);
        self
    }

    pub fn with_failure(mut self, fork_owner: &str) -> Self {
        self.failures.insert(fork_owner.to_string());
        self
    }

    /// Comparing this fork panics inside the worker.
    pub fn with_panic(mut self, fork_owner: &str) -> Self {
        self.panics.insert(fork_owner.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn compare_calls(&self) -> usize {
        self.compare_calls.load(Ordering::SeqCst)
    }

    /// Most comparisons that were ever running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn compare_requests(&self) -> Vec<(String, String, String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepoClient for FakeClient {
    async fn get_repository(&self, owner: &str, name: &str) -> Result<RepoSnapshot> {
        match &self.upstream {
            Some(up) if up.owner == owner && up.name == name => Ok(up.clone()),
            _ => Err(ForkinfoError::NotFound(format!("{owner}/{name}"))),
        }
    }

    async fn list_forks(&self, _owner: &str, _name: &str, _size_hint: u64) -> Result<Vec<RepoSnapshot>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fork_list {
            return Err(ForkinfoError::GitHub("connection reset".to_string()));
        }
        Ok(self.forks.clone())
    }

    async fn compare_commits(
        &self,
        owner: &str,
        name: &str,
        base: &str,
        head: &str,
    ) -> Result<CompareOutcome> {
        self.compare_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((
            owner.to_string(),
            name.to_string(),
            base.to_string(),
            head.to_string(),
        ));
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let fork_owner = head.split(':').next().unwrap_or(head);
        if self.panics.contains(fork_owner) {
            panic!("scripted panic comparing {head}");
        }
        if self.failures.contains(fork_owner) {
            return Err(ForkinfoError::RefNotFound(head.to_string()));
        }
        self.outcomes
            .get(fork_owner)
            .cloned()
            .ok_or_else(|| ForkinfoError::GitHub(format!("no scripted outcome for {head}")))
    }
}
