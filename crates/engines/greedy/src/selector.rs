//! Move selection: heuristic candidate pool, rollouts per candidate, argmax.

use std::sync::Arc;

use chess_core::{legal_moves, move_to_uci, Color, Decision, Position};
use tracing::{debug, info, warn};

use crate::agent::AgentFactory;
use crate::config::{ConfigError, ExplorationConfig};
use crate::error::SelectError;
use crate::memory::RecentMoveMemory;
use crate::rollout::{derive_seed, CandidateMove, RolloutDriver};
use crate::scorer::{rank_moves, score_move};

pub struct MoveSelector {
    config: ExplorationConfig,
    driver: RolloutDriver,
    memory: RecentMoveMemory,
}

impl MoveSelector {
    pub fn new(config: ExplorationConfig, factory: Arc<dyn AgentFactory>) -> Result<Self, ConfigError> {
        config.validate()?;
        let driver = RolloutDriver::new(factory, config.rollout_depth(), config.choice_exploration);
        Ok(Self {
            config,
            driver,
            memory: RecentMoveMemory::EMPTY,
        })
    }

    pub fn config(&self) -> &ExplorationConfig {
        &self.config
    }

    /// Swaps in new settings, keeping the rollout agents and the move memory.
    /// Rejected settings leave the selector untouched.
    pub fn reconfigure(&mut self, config: ExplorationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.driver = RolloutDriver::new(
            self.driver.factory(),
            config.rollout_depth(),
            config.choice_exploration,
        );
        self.config = config;
        Ok(())
    }

    pub fn memory(&self) -> RecentMoveMemory {
        self.memory
    }

    pub fn reset_memory(&mut self) {
        self.memory.clear();
    }

    /// Picks a move for the side to move, scored from `perspective`.
    ///
    /// Candidates are rolled out one after another, each with its samples
    /// running concurrently. A candidate whose samples all fail is skipped.
    pub async fn select(&mut self, pos: &Position, perspective: Color) -> Result<Decision, SelectError> {
        let pool_size = i32::try_from(self.config.exploration_size).unwrap_or(i32::MAX);
        let pool = rank_moves(pos, pool_size);
        let Some(&first) = pool.first() else {
            return Ok(Decision::NoMove);
        };
        if legal_moves(pos).len() == 1 {
            debug!(mv = %move_to_uci(first), "only move, skipping rollouts");
            self.remember(pos, first.from);
            return Ok(Decision::Move(first));
        }
        debug!(
            pool = ?pool.iter().map(|m| move_to_uci(*m)).collect::<Vec<_>>(),
            "candidate pool"
        );

        let base = Arc::new(pos.clone());
        let mut best: Option<CandidateMove> = None;
        for (index, mv) in pool.iter().enumerate() {
            let candidate = CandidateMove::new(*mv, score_move(pos, *mv, &RecentMoveMemory::EMPTY));
            let seed = self.config.seed.map(|s| derive_seed(s, index as u64));
            let result = self
                .driver
                .evaluate(
                    &base,
                    candidate,
                    perspective,
                    &self.memory,
                    self.config.exploration_sample,
                    seed,
                )
                .await;
            match result {
                Ok(rolled) => {
                    // Strictly greater, so the earlier candidate wins ties.
                    if best.as_ref().map_or(true, |b| rolled.aggregate > b.aggregate) {
                        best = Some(rolled);
                    }
                }
                Err(err) => warn!(candidate = %move_to_uci(*mv), error = %err, "candidate dropped"),
            }
        }

        let best = best.ok_or(SelectError::AllCandidatesFailed {
            candidates: pool.len(),
        })?;
        info!(
            mv = %move_to_uci(best.mv),
            aggregate = best.aggregate,
            candidates = pool.len(),
            "move selected"
        );
        self.remember(pos, best.mv.from);
        Ok(Decision::Move(best.mv))
    }

    fn remember(&mut self, pos: &Position, from: u8) {
        if let Some(pc) = pos.piece_at(from) {
            self.memory.record(pc.kind);
        }
    }
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod selector_tests;
