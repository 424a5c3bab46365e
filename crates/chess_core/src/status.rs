//! Terminal-state detection.
//!
//! Repetition needs game history, which a bare [`Position`] does not carry;
//! callers that track hashes report it through [`GameStatus::with_repetitions`].

use crate::{
    board::{Applied, Position},
    movegen::legal_moves,
    types::*,
};

/// Halfmove clock value at which the seventy-five-move rule ends the game.
pub const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;
/// Occurrences of one position that end the game.
pub const FIVEFOLD: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Draw(DrawReason),
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::Ongoing)
    }

    /// Winner of a finished game, None for draws and ongoing games.
    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }

    /// Upgrades an ongoing status to a fivefold draw when `occurrences`
    /// of the current position reach the limit.
    pub fn with_repetitions(self, occurrences: usize) -> GameStatus {
        match self {
            GameStatus::Ongoing if occurrences >= FIVEFOLD => {
                GameStatus::Draw(DrawReason::FivefoldRepetition)
            }
            other => other,
        }
    }
}

impl Position {
    /// Terminal status of this position, ignoring repetition.
    pub fn status(&self) -> GameStatus {
        if legal_moves(self).is_empty() {
            return if self.in_check(self.side_to_move) {
                GameStatus::Checkmate {
                    winner: self.side_to_move.other(),
                }
            } else {
                GameStatus::Draw(DrawReason::Stalemate)
            };
        }
        self.rule_draw()
    }

    fn rule_draw(&self) -> GameStatus {
        if self.is_insufficient_material() {
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        } else if self.halfmove_clock >= SEVENTY_FIVE_MOVE_PLIES {
            GameStatus::Draw(DrawReason::SeventyFiveMoves)
        } else {
            GameStatus::Ongoing
        }
    }

    /// Neither side can ever mate: bare kings, a single minor piece, or
    /// only bishops that all stand on one square colour.
    pub fn is_insufficient_material(&self) -> bool {
        let mut knights = 0;
        let mut bishop_shades = [false; 2];
        for (i, slot) in self.board.iter().enumerate() {
            let Some(pc) = slot else { continue };
            match pc.kind {
                PieceKind::King => {}
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
                PieceKind::Knight => knights += 1,
                PieceKind::Bishop => {
                    let shade = (file_of(i as u8) + rank_of(i as u8)) % 2;
                    bishop_shades[shade as usize] = true;
                }
            }
        }
        let has_bishop = bishop_shades[0] || bishop_shades[1];
        let mixed_bishops = bishop_shades[0] && bishop_shades[1];
        match knights {
            0 => !mixed_bishops,
            1 => !has_bishop,
            _ => false,
        }
    }
}

impl Applied {
    /// Status of the resulting position, reusing the mate / stalemate flags
    /// computed by [`Position::apply`].
    pub fn status(&self) -> GameStatus {
        if self.is_checkmate {
            GameStatus::Checkmate {
                winner: self.position.side_to_move.other(),
            }
        } else if self.is_stalemate {
            GameStatus::Draw(DrawReason::Stalemate)
        } else {
            self.position.rule_draw()
        }
    }
}
