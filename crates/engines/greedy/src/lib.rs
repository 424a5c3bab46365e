//! Greedy Rollout Chess Engine
//!
//! Two players built on one heuristic:
//! - [`GreedyEngine`] plays the best single-ply move by [`score_move`].
//! - [`ExplorationEngine`] takes the top heuristic moves as candidates, plays
//!   each out many times in isolated sandboxes with greedy agents on both
//!   sides, and picks the candidate with the best average outcome.

pub mod agent;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod memory;
pub mod rollout;
pub mod sandbox;
pub mod scorer;
pub mod selector;

pub use agent::{greedy_factory, scripted_factory, AgentFactory, GreedyAgent, ScriptedAgent};
pub use aggregate::SampleStats;
pub use config::{ConfigError, ExplorationConfig};
pub use error::{RolloutError, SelectError};
pub use memory::RecentMoveMemory;
pub use rollout::{position_score, CandidateMove, RolloutDriver};
pub use sandbox::{RolloutDepth, RunEnd, RunOutcome, Sandbox};
pub use scorer::{rank_moves, rank_moves_with_memory, score_move, PIECE_VALUES};
pub use selector::MoveSelector;

use async_trait::async_trait;
use chess_core::{Decision, Engine, EngineError, Position};
use tracing::info;


/// Single-ply greedy player.
#[derive(Debug, Clone, Default)]
pub struct GreedyEngine {
    memory: RecentMoveMemory,
}

impl GreedyEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Engine for GreedyEngine {
    async fn select_move(&mut self, pos: &Position) -> Result<Decision, EngineError> {
        let best = rank_moves_with_memory(pos, -1, &self.memory);
        let Some(&mv) = best.first() else {
            return Ok(Decision::NoMove);
        };
        if let Some(pc) = pos.piece_at(mv.from) {
            self.memory.record(pc.kind);
        }
        Ok(Decision::Move(mv))
    }

    fn name(&self) -> &str {
        "Greedy v1.0"
    }

    fn new_game(&mut self) {
        self.memory.clear();
    }
}

/// Rollout-backed player; scores from the side to move.
pub struct ExplorationEngine {
    selector: MoveSelector,
}

impl ExplorationEngine {
    pub fn new(config: ExplorationConfig) -> Result<Self, ConfigError> {
        Self::with_factory(config, greedy_factory())
    }

    /// Rolls out with agents from `factory` instead of greedy ones.
    pub fn with_factory(
        config: ExplorationConfig,
        factory: std::sync::Arc<dyn AgentFactory>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            selector: MoveSelector::new(config, factory)?,
        })
    }

    pub fn config(&self) -> &ExplorationConfig {
        self.selector.config()
    }

    /// New settings for the next search; the current game's memory carries on.
    pub fn reconfigure(&mut self, config: ExplorationConfig) -> Result<(), ConfigError> {
        self.selector.reconfigure(config)
    }

    pub fn memory(&self) -> RecentMoveMemory {
        self.selector.memory()
    }
}

#[async_trait]
impl Engine for ExplorationEngine {
    async fn select_move(&mut self, pos: &Position) -> Result<Decision, EngineError> {
        self.selector
            .select(pos, pos.side_to_move)
            .await
            .map_err(|err| EngineError::DecisionFailed {
                reason: err.to_string(),
            })
    }

    fn name(&self) -> &str {
        "Greedy Exploration v1.0"
    }

    fn new_game(&mut self) {
        info!("new game, clearing move memory");
        self.selector.reset_memory();
    }
}
