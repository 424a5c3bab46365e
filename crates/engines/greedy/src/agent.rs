//! Agents that play inside simulated games, and the factories that make them.

use std::sync::Arc;

use chess_core::{Agent, Color, Move, PlayArgs, Position, Proposal};

use crate::memory::RecentMoveMemory;
use crate::scorer::rank_moves_with_memory;

/// Builds one fresh agent per colour for every simulated game.
///
/// Factories are shared by all rollout tasks, agents never are.
pub trait AgentFactory: Send + Sync {
    fn create(&self, color: Color) -> Box<dyn Agent>;
}

impl<F> AgentFactory for F
where
    F: Fn(Color) -> Box<dyn Agent> + Send + Sync,
{
    fn create(&self, color: Color) -> Box<dyn Agent> {
        self(color)
    }
}

/// Plays from the heuristic ranking.
///
/// With a positive `top_n` it offers the top moves and leaves the choice to
/// the caller; otherwise it proposes the single best move and remembers its
/// kind like a real player would.
#[derive(Debug, Clone, Default)]
pub struct GreedyAgent {
    memory: RecentMoveMemory,
}

impl GreedyAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory(&self) -> &RecentMoveMemory {
        &self.memory
    }
}

impl Agent for GreedyAgent {
    fn propose(&mut self, pos: &Position, args: &PlayArgs) -> Proposal {
        // A breadth of zero would rank nothing; it plays the best move.
        let offer_choices = args.top_n > 0;
        let top_n = if offer_choices { args.top_n } else { -1 };
        let ranked = rank_moves_with_memory(pos, top_n, &self.memory);
        if ranked.is_empty() {
            return Proposal::Resign;
        }
        if offer_choices {
            return Proposal::Choices(ranked);
        }
        let best = ranked[0];
        if let Some(pc) = pos.piece_at(best.from) {
            self.memory.record(pc.kind);
        }
        Proposal::Move(best)
    }
}

/// Plays a fixed list of moves, then resigns.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAgent {
    moves: Vec<Move>,
    next: usize,
}

impl ScriptedAgent {
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves, next: 0 }
    }
}

impl Agent for ScriptedAgent {
    fn propose(&mut self, _pos: &Position, _args: &PlayArgs) -> Proposal {
        match self.moves.get(self.next) {
            Some(&mv) => {
                self.next += 1;
                Proposal::Move(mv)
            }
            None => Proposal::Resign,
        }
    }
}

pub fn greedy_factory() -> Arc<dyn AgentFactory> {
    Arc::new(|_: Color| Box::new(GreedyAgent::new()) as Box<dyn Agent>)
}

/// Each colour replays its own script.
pub fn scripted_factory(white: Vec<Move>, black: Vec<Move>) -> Arc<dyn AgentFactory> {
    Arc::new(move |color: Color| {
        let script = match color {
            Color::White => white.clone(),
            Color::Black => black.clone(),
        };
        Box::new(ScriptedAgent::new(script)) as Box<dyn Agent>
    })
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod agent_tests;
