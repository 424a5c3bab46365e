//! Single-ply heuristic move scoring.
//!
//! Scores are from the mover's point of view: higher is better for the side
//! playing the move. The terms are additive except for checkmate, which
//! overrides everything with [`MATE_SCORE`].

use chess_core::{
    distance, file_of, legal_moves, rank_of, Bitboard, Color, Move, Piece, PieceKind, Position,
    DIAGONALS,
};

use crate::memory::RecentMoveMemory;

/// Piece values indexed by `PieceKind::idx()`.
/// Order: Pawn, Knight, Bishop, Rook, Queen, King
pub const PIECE_VALUES: [f64; 6] = [1.0, 3.0, 3.0, 5.0, 9.0, 10.0];

/// Score of a move that mates immediately.
pub const MATE_SCORE: f64 = 1_000_000.0;
/// Added when a move stalemates the opponent.
pub const STALEMATE_SCORE: f64 = -1_000_000.0;
/// Returned when there is no piece on the origin square.
pub const MISSING_PIECE_SCORE: f64 = -1000.0;

pub fn piece_value(kind: PieceKind) -> f64 {
    PIECE_VALUES[kind.idx()]
}

/// Scores `mv` for the side owning the piece on its origin square.
///
/// `mv` should be legal in `pos`; flags missing from a bare origin /
/// destination move are filled in before it is simulated.
pub fn score_move(pos: &Position, mv: Move, memory: &RecentMoveMemory) -> f64 {
    let piece = match pos.piece_at(mv.from) {
        Some(pc) => pc,
        None => return MISSING_PIECE_SCORE,
    };
    let mv = pos.annotate(mv);
    let color = piece.color;
    let opponent = color.other();
    let v = piece_value(piece.kind);

    let mut score = v;
    if let Some(captured) = pos.piece_at(mv.to) {
        score += 9.0 * piece_value(captured.kind);
    }
    score += memory.penalty(piece.kind);

    if rank_of(mv.from) == color.pawn_rank() {
        score += 5.0;
    }
    if piece.kind == PieceKind::King && (file_of(mv.from) - file_of(mv.to)).abs() == 2 {
        score += 15.0;
    }
    if Bitboard::CENTER.contains(mv.to) {
        score += 5.0;
    }
    if Bitboard::CENTER.contains(mv.from) && !Bitboard::CENTER.contains(mv.to) {
        score -= 5.0;
    }
    if Bitboard::EDGE.contains(mv.to) || Bitboard::EDGE.contains(mv.from) {
        score -= 5.0;
    }

    // Everything below that looks at the board after the move uses this clone.
    let mut after = pos.clone();
    after.make_move(mv);

    score += piece_terms(pos, &after, mv, piece);

    if let Some(promo) = mv.promo {
        score += (piece_value(promo) - 1.0) * 3.0;
    }

    let attackers = after.attackers_of(mv.to, opponent);
    let defenders = after.attackers_of(mv.to, color);
    if attackers > 1 {
        score -= 8.0 * v;
    }
    if attackers > defenders {
        score -= 5.0 * v;
    }
    if pos.is_square_attacked(mv.from, opponent) {
        score += 5.0 * v;
    }

    let replies = legal_moves(&after);
    let gives_check = after.in_check(opponent);
    if replies.is_empty() {
        if gives_check {
            return MATE_SCORE;
        }
        score += STALEMATE_SCORE;
    }
    if gives_check {
        score += 3.0;
    }

    let king_before = king_mobility(pos, opponent);
    let king_after = match after.king_sq(opponent) {
        Some(k) => replies.iter().filter(|m| m.from == k).count() as f64,
        None => 0.0,
    };
    let reduction = king_before - king_after;
    score += 5.0 * reduction;
    if gives_check {
        score += 5.0 * reduction;
    }

    score
}

fn piece_terms(pos: &Position, after: &Position, mv: Move, piece: Piece) -> f64 {
    let color = piece.color;
    match piece.kind {
        PieceKind::Pawn => {
            let mut s = 1.0;
            if Bitboard::PROMOTION_RANKS.contains(mv.to) {
                s += 5.0;
            }
            // Seventh rank or beyond, counted from the mover's side.
            let progress = match color {
                Color::White => rank_of(mv.to),
                Color::Black => 7 - rank_of(mv.to),
            };
            if progress >= 6 {
                s += 3.0;
            }
            if (rank_of(mv.from) - rank_of(mv.to)).abs() == 2 {
                s += 1.0;
            }
            if pos.count(color, PieceKind::Pawn) < 4 && pos.count(color, PieceKind::Queen) == 0 {
                s += 6.0;
            }
            s
        }
        PieceKind::Knight => {
            let mut s = 3.0;
            if Bitboard::EDGE.contains(mv.to) {
                s -= 6.0;
            }
            if Bitboard::EDGE.contains(mv.from) {
                s += 3.0;
            }
            s
        }
        PieceKind::Bishop => {
            let reach = after.ray_attacks(mv.to, &DIAGONALS).popcount() as f64;
            let mut s = 3.0 + reach / 3.0 + distance(mv.from, mv.to) as f64 / 4.5;
            if rank_of(mv.to) == color.back_rank() && (2..=5).contains(&file_of(mv.to)) {
                s -= 10.0;
            }
            s
        }
        PieceKind::Rook => {
            let mut s = 1.0 + distance(mv.from, mv.to) as f64 / 3.5;
            let home = color.back_rank() as u8 * 8;
            if mv.from == home && pos.castling.queenside(color) {
                s -= 20.0;
            }
            if mv.from == home + 7 && pos.castling.kingside(color) {
                s -= 20.0;
            }
            s
        }
        PieceKind::Queen => {
            let mut s = 0.0;
            if pos.fullmove_number < 15 {
                s -= 20.0;
            }
            let undeveloped = pos.occupied_by(color) & Bitboard::rank(color.back_rank());
            s - 3.0 * undeveloped.popcount() as f64
        }
        PieceKind::King => -50.0,
    }
}

/// Legal king moves `side` would have if it were its turn.
pub fn king_mobility(pos: &Position, side: Color) -> f64 {
    let turn = pos.with_side_to_move(side);
    match turn.king_sq(side) {
        Some(k) => legal_moves(&turn).iter().filter(|m| m.from == k).count() as f64,
        None => 0.0,
    }
}

/// Legal moves sorted by [`score_move`] with an empty memory.
///
/// See [`rank_moves_with_memory`] for how `top_n` is read.
pub fn rank_moves(pos: &Position, top_n: i32) -> Vec<Move> {
    rank_moves_with_memory(pos, top_n, &RecentMoveMemory::EMPTY)
}

/// Legal moves sorted best first; ties keep generator order.
///
/// A negative `top_n` returns only the best move (the first maximum),
/// otherwise at most `top_n` moves. Empty when there is no legal move.
pub fn rank_moves_with_memory(pos: &Position, top_n: i32, memory: &RecentMoveMemory) -> Vec<Move> {
    let mut scored: Vec<(Move, f64)> = legal_moves(pos)
        .into_iter()
        .map(|mv| (mv, score_move(pos, mv, memory)))
        .collect();
    // Stable, so equal scores stay in enumeration order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let keep = if top_n < 0 { 1 } else { top_n as usize };
    scored.into_iter().take(keep).map(|(mv, _)| mv).collect()
}

#[cfg(test)]
#[path = "scorer_tests.rs"]
mod scorer_tests;
