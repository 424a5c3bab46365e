//! Fan-in of rollout sample scores.

use std::collections::BTreeMap;

use tokio::task::JoinSet;
use tracing::warn;

use crate::error::RolloutError;

/// What a sample task yields: its index and its score.
pub type SampleResult = (usize, Result<f64, RolloutError>);

/// Scores of the samples that succeeded, keyed by sample index.
///
/// The mean sums in index order, so it does not depend on the order the
/// tasks finished in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleStats {
    scores: BTreeMap<usize, f64>,
    failed: usize,
}

impl SampleStats {
    pub fn push(&mut self, index: usize, score: f64) {
        self.scores.insert(index, score);
    }

    pub fn fail(&mut self) {
        self.failed += 1;
    }

    pub fn succeeded(&self) -> usize {
        self.scores.len()
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Mean of the successful samples, None if there were none.
    pub fn mean(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let sum: f64 = self.scores.values().sum();
        Some(sum / self.scores.len() as f64)
    }

    /// Drains `set` in completion order. Failed or panicked samples are
    /// logged and counted, never averaged.
    pub async fn collect(set: &mut JoinSet<SampleResult>) -> SampleStats {
        let mut stats = SampleStats::default();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, Ok(score))) => stats.push(index, score),
                Ok((index, Err(err))) => {
                    warn!(sample = index, error = %err, "rollout sample failed");
                    stats.fail();
                }
                Err(join_err) => {
                    let err = RolloutError::TaskFailed(join_err.to_string());
                    warn!(error = %err, "rollout sample failed");
                    stats.fail();
                }
            }
        }
        stats
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod aggregate_tests;
