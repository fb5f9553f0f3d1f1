use crate::census::types::{Comparison, ForkStatus};
use crate::github::client::RepoClient;
use crate::github::types::RepoSnapshot;
use std::sync::Arc;
use std::time::Duration;

/// Compares forks against one upstream's default branch.
///
/// Failures never leave this type: a comparison that errors or times out
/// comes back as [`ForkStatus::Unreachable`].
#[derive(Clone)]
pub struct Classifier {
    client: Arc<dyn RepoClient>,
    timeout: Option<Duration>,
}

impl Classifier {
    pub fn new(client: Arc<dyn RepoClient>, timeout: Option<Duration>) -> Self {
        Self { client, timeout }
    }

    pub async fn classify(
        &self,
        upstream: &RepoSnapshot,
        fork: &RepoSnapshot,
        include_commits: bool,
    ) -> Comparison {
        if let (Some(ours), Some(theirs)) = (upstream.pushed_at, fork.pushed_at) {
            if ours == theirs {
                tracing::debug!(fork = %fork.full_name, "push time matches upstream, skipping compare");
                return Comparison::identical();
            }
        }

        let base = upstream.default_branch.as_str();
        let head = format!("{}:{}", fork.owner, upstream.default_branch);
        let request = self
            .client
            .compare_commits(&upstream.owner, &upstream.name, base, &head);

        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(res) => res,
                Err(_) => {
                    tracing::warn!(fork = %fork.full_name, "comparison timed out after {limit:?}");
                    return Comparison::unreachable();
                }
            },
            None => request.await,
        };

        let outcome = match outcome {
            Ok(o) => o,
            Err(e) => {
                tracing::warn!(fork = %fork.full_name, "comparison failed: {e}");
                return Comparison::unreachable();
            }
        };

        let Some(status) = ForkStatus::from_remote(&outcome.status) else {
            tracing::warn!(fork = %fork.full_name, status = %outcome.status, "unknown comparison status");
            return Comparison::unreachable();
        };

        let commits = if include_commits && status.has_own_commits() {
            outcome.commits
        } else {
            Vec::new()
        };

        Comparison {
            status,
            total_commits: outcome.total_commits,
            ahead_by: outcome.ahead_by,
            behind_by: outcome.behind_by,
            diff_url: outcome.html_url,
            commits,
        }
    }
}
