//! Piece kinds of the last two moves actually played.

use chess_core::PieceKind;

/// Penalty for moving the same kind as the previous move.
pub const LAST_KIND_PENALTY: f64 = -20.0;
/// Penalty for moving the same kind as two moves ago.
pub const BEFORE_LAST_KIND_PENALTY: f64 = -10.0;

/// A two-entry history of moved piece kinds.
///
/// This is a plain `Copy` value: scoring and rollouts receive it by reference
/// and never write to it. Only the caller that plays real moves records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecentMoveMemory {
    last: Option<PieceKind>,
    before_last: Option<PieceKind>,
}

impl RecentMoveMemory {
    pub const EMPTY: RecentMoveMemory = RecentMoveMemory {
        last: None,
        before_last: None,
    };

    pub fn record(&mut self, kind: PieceKind) {
        self.before_last = self.last;
        self.last = Some(kind);
    }

    pub fn last(&self) -> Option<PieceKind> {
        self.last
    }

    pub fn before_last(&self) -> Option<PieceKind> {
        self.before_last
    }

    /// Repetition penalty for moving `kind` next. Both terms can apply.
    pub fn penalty(&self, kind: PieceKind) -> f64 {
        let mut penalty = 0.0;
        if self.last == Some(kind) {
            penalty += LAST_KIND_PENALTY;
        }
        if self.before_last == Some(kind) {
            penalty += BEFORE_LAST_KIND_PENALTY;
        }
        penalty
    }

    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod memory_tests;
