pub mod classify;
pub mod types;

use crate::error::Result;
use crate::github::client::RepoClient;
use crate::github::types::{RepoRef, RepoSnapshot};
use classify::Classifier;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use types::{CensusOptions, CensusReport, Comparison, ForkRow};

pub const DEFAULT_CONCURRENCY: usize = 8;

/// Runs the fork census against one shared client.
pub struct Census {
    client: Arc<dyn RepoClient>,
    classifier: Classifier,
    concurrency: usize,
}

impl Census {
    pub fn new(client: Arc<dyn RepoClient>, concurrency: usize, compare_timeout: Option<Duration>) -> Self {
        Self {
            classifier: Classifier::new(Arc::clone(&client), compare_timeout),
            client,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetches the upstream repository and its forks. Any failure here is
    /// fatal for the run, so nothing gets classified.
    pub async fn fetch(&self, target: &RepoRef) -> Result<(RepoSnapshot, Vec<RepoSnapshot>)> {
        let upstream = self.client.get_repository(&target.owner, &target.name).await?;
        tracing::info!(forks = upstream.forks, "fetched {}", upstream.full_name);

        if upstream.forks == 0 {
            return Ok((upstream, Vec::new()));
        }

        let forks = self
            .client
            .list_forks(&upstream.owner, &upstream.name, upstream.forks)
            .await?;
        Ok((upstream, forks))
    }

    /// Classifies every fork, at most `concurrency` at a time. Rows come back
    /// in the order the forks were given; hidden rows are still tallied.
    pub async fn classify_all(
        &self,
        upstream: &RepoSnapshot,
        forks: Vec<RepoSnapshot>,
        options: &CensusOptions,
    ) -> CensusReport {
        let upstream = Arc::new(upstream.clone());
        let forks = Arc::new(forks);
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut join_set: JoinSet<(usize, Comparison)> = JoinSet::new();

        for idx in 0..forks.len() {
            let classifier = self.classifier.clone();
            let upstream = Arc::clone(&upstream);
            let forks = Arc::clone(&forks);
            let semaphore = Arc::clone(&semaphore);
            let include_commits = options.include_commit_detail;

            join_set.spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return (idx, Comparison::unreachable()),
                };
                let comparison = classifier.classify(&upstream, &forks[idx], include_commits).await;
                (idx, comparison)
            });
        }

        let mut slots: Vec<Option<Comparison>> = vec![None; forks.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, comparison)) => {
                    tracing::debug!(fork = %forks[idx].full_name, status = %comparison.status, "classified");
                    slots[idx] = Some(comparison);
                }
                Err(e) => tracing::warn!("classification task failed: {e}"),
            }
        }

        let mut report = CensusReport::default();
        for (position, (fork, slot)) in forks.iter().zip(slots).enumerate() {
            let comparison = slot.unwrap_or_else(Comparison::unreachable);
            report.tally.record(comparison.status);
            if options.hides(comparison.status) {
                continue;
            }
            report.rows.push(ForkRow {
                position,
                fork: fork.clone(),
                comparison,
            });
        }
        report
    }
}
