use chess_core::RulesError;
use thiserror::Error;

use crate::config::ConfigError;

/// Failure of one rollout sample or of a whole candidate.
#[derive(Error, Debug)]
pub enum RolloutError {
    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error("all {samples} rollout samples failed for {uci}")]
    AllSamplesFailed { uci: String, samples: usize },

    #[error("rollout task did not complete: {0}")]
    TaskFailed(String),
}

#[derive(Error, Debug)]
pub enum SelectError {
    #[error("rollouts failed for every one of {candidates} candidate moves")]
    AllCandidatesFailed { candidates: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
