pub mod bitboard;
pub mod board;
pub mod error;
pub mod movegen;
pub mod status;
pub mod types;
pub mod uci;
pub mod zobrist;

// Re-export core game logic (not engine-specific)
pub use bitboard::*;
pub use board::*;
pub use error::*;
pub use movegen::*;
pub use status::*;
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;

use async_trait::async_trait;

// =============================================================================
// Agent trait: one decision per call, used inside simulations
// =============================================================================

/// Arguments handed to an [`Agent`] on every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayArgs {
    /// Negative: propose the single best move. Otherwise: propose up to this
    /// many candidates and let the caller choose among them.
    pub top_n: i32,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self { top_n: -1 }
    }
}

/// What an agent wants to do on its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    Resign,
    Move(Move),
    /// Candidate moves; the caller picks one.
    Choices(Vec<Move>),
}

/// A synchronous move proposer for one side of a simulated game.
///
/// Agents are created per rollout and never shared between threads, so
/// `&mut self` state (such as an RNG or a script cursor) needs no locking.
pub trait Agent: Send {
    fn propose(&mut self, pos: &Position, args: &PlayArgs) -> Proposal;
}

// =============================================================================
// Engine trait: implemented by all players that drive a real game
// =============================================================================

/// Outcome of a move decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Move(Move),
    /// The side to move has no legal move.
    NoMove,
}

impl Decision {
    pub fn best_move(self) -> Option<Move> {
        match self {
            Decision::Move(mv) => Some(mv),
            Decision::NoMove => None,
        }
    }
}

/// Trait that all chess engines must implement.
///
/// Decisions are async so engines can fan work out onto the runtime; cheap
/// engines simply return without awaiting.
#[async_trait]
pub trait Engine: Send {
    /// Choose a move for the side to move in `pos`.
    async fn select_move(&mut self, pos: &Position) -> Result<Decision, EngineError>;

    /// Returns the engine's name for UCI identification
    fn name(&self) -> &str;

    /// Returns the engine's author for UCI identification
    fn author(&self) -> &str {
        "ML-chess"
    }

    /// Reset per-game state such as move memory.
    fn new_game(&mut self) {}
}
