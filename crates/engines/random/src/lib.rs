//! Random Move Chess Engine
//!
//! Picks uniformly among legal moves. Useful as:
//! - A baseline opponent in self-play matches
//! - A rollout agent when heuristic playouts are too slow
//! - A stress test for move generation

use async_trait::async_trait;
use chess_core::{
    legal_moves_into, Agent, Decision, Engine, EngineError, Move, PlayArgs, Position, Proposal,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;


fn pick(pos: &Position, rng: &mut StdRng) -> Option<Move> {
    let mut pos_copy = pos.clone();
    let mut moves = Vec::with_capacity(64);
    legal_moves_into(&mut pos_copy, &mut moves);
    moves.choose(rng).copied()
}

/// Rollout agent that plays a random legal move and resigns when it has none.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Agent for RandomAgent {
    fn propose(&mut self, pos: &Position, _args: &PlayArgs) -> Proposal {
        match pick(pos, &mut self.rng) {
            Some(mv) => Proposal::Move(mv),
            None => Proposal::Resign,
        }
    }
}

/// A chess engine that plays random legal moves.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    rng: StdRng,
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

#[async_trait]
impl Engine for RandomEngine {
    async fn select_move(&mut self, pos: &Position) -> Result<Decision, EngineError> {
        Ok(match pick(pos, &mut self.rng) {
            Some(mv) => Decision::Move(mv),
            None => Decision::NoMove,
        })
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }
}
