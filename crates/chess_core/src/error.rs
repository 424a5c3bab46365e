//! Error types for the rules engine and the engine trait.

use thiserror::Error;

/// Malformed Forsyth-Edwards Notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN needs at least 4 fields, got {0}")]
    MissingFields(usize),

    #[error("FEN board needs 8 ranks, got {0}")]
    RankCount(usize),

    #[error("FEN rank {rank} does not describe exactly 8 files")]
    FileCount { rank: usize },

    #[error("invalid piece character {0:?} in FEN")]
    PieceChar(char),

    #[error("invalid side to move {0:?} in FEN")]
    SideToMove(String),

    #[error("invalid castling character {0:?} in FEN")]
    CastlingChar(char),

    #[error("invalid en-passant square {0:?} in FEN")]
    EnPassant(String),

    #[error("invalid move counter {0:?} in FEN")]
    Counter(String),
}

/// A move the rules engine refused to play.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("illegal move {uci} in position {fen}")]
    IllegalMove { uci: String, fen: String },

    #[error("no piece on {square}")]
    NoPieceAt { square: String },
}

/// Failure surfaced by an [`Engine`](crate::Engine) while choosing a move.
///
/// Having no legal move is not an error; see [`Decision::NoMove`](crate::Decision).
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine could not reach a decision: {reason}")]
    DecisionFailed { reason: String },

    #[error(transparent)]
    Rules(#[from] RulesError),
}
