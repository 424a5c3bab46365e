//! Depth-limited rollouts of candidate moves and their scoring.
//!
//! Each sample opens its own [`Sandbox`], plays the candidate, lets agents
//! continue for a few plies and scores the result for the perspective
//! colour. Samples for one candidate run concurrently on the blocking pool
//! and are averaged by [`SampleStats`].

use std::sync::Arc;

use chess_core::{
    file_of, legal_moves, move_to_uci, rank_of, sq, sq_to_coord, Bitboard, Color, GameStatus, Move,
    PieceKind, PlayArgs, Position, RulesError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinSet;
use tracing::debug;

use crate::agent::AgentFactory;
use crate::aggregate::{SampleResult, SampleStats};
use crate::error::RolloutError;
use crate::memory::RecentMoveMemory;
use crate::sandbox::{RolloutDepth, RunEnd, Sandbox};
use crate::scorer::king_mobility;

/// Rollout score of a game won by the perspective colour.
pub const WIN_SCORE: f64 = 1_000_000.0;

/// Material weights for [`position_score`], indexed by `PieceKind::idx()`.
const MATERIAL: [i32; 6] = [15, 32, 33, 50, 90, 0];

/// A candidate move with its heuristic score and, once rolled out, its
/// aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMove {
    pub mv: Move,
    pub heuristic: f64,
    pub aggregate: Option<f64>,
    pub samples: usize,
    pub failed: usize,
}

impl CandidateMove {
    pub fn new(mv: Move, heuristic: f64) -> Self {
        Self {
            mv,
            heuristic,
            aggregate: None,
            samples: 0,
            failed: 0,
        }
    }
}

#[derive(Clone)]
pub struct RolloutDriver {
    factory: Arc<dyn AgentFactory>,
    depth: RolloutDepth,
    breadth: i32,
}

impl RolloutDriver {
    /// `breadth` is the `top_n` agents get inside rollouts.
    pub fn new(factory: Arc<dyn AgentFactory>, depth: RolloutDepth, breadth: i32) -> Self {
        Self {
            factory,
            depth,
            breadth,
        }
    }

    pub fn factory(&self) -> Arc<dyn AgentFactory> {
        Arc::clone(&self.factory)
    }

    /// One rollout of `candidate` from `base`, scored for `perspective`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        base: &Position,
        candidate: Move,
        perspective: Color,
        rng: &mut R,
    ) -> Result<f64, RolloutError> {
        let mover = base
            .piece_at(candidate.from)
            .ok_or_else(|| RulesError::NoPieceAt {
                square: sq_to_coord(candidate.from),
            })?;

        let mut sandbox = Sandbox::open_with_status(base, GameStatus::Ongoing);
        sandbox.apply(candidate)?;
        let args = PlayArgs {
            top_n: self.breadth,
        };
        let outcome = sandbox.run(self.factory.as_ref(), self.depth, &args, rng)?;

        if let RunEnd::GameOver(status) = outcome.end {
            return Ok(match status.winner() {
                Some(winner) if winner == perspective => WIN_SCORE,
                Some(_) => -WIN_SCORE,
                None => 0.0,
            });
        }

        let mut score = position_score(sandbox.position(), perspective);
        if Bitboard::EDGE.contains(candidate.to)
            && mover.kind != PieceKind::Bishop
            && base.piece_at(candidate.to).is_none()
        {
            score -= 100.0;
        }
        if is_castling_king_move(candidate, mover.kind) {
            score += 200.0;
        }
        Ok(score)
    }

    /// Rolls `candidate` out `samples` times concurrently and averages the
    /// successful samples, then applies the repetition penalty for the moved
    /// kind once.
    ///
    /// With a `seed`, sample `i` always uses the same RNG stream.
    pub async fn evaluate(
        &self,
        base: &Arc<Position>,
        candidate: CandidateMove,
        perspective: Color,
        memory: &RecentMoveMemory,
        samples: usize,
        seed: Option<u64>,
    ) -> Result<CandidateMove, RolloutError> {
        let kind = base
            .piece_at(candidate.mv.from)
            .map(|pc| pc.kind)
            .ok_or_else(|| RulesError::NoPieceAt {
                square: sq_to_coord(candidate.mv.from),
            })?;

        let mut set: JoinSet<SampleResult> = JoinSet::new();
        for index in 0..samples {
            let driver = self.clone();
            let base = Arc::clone(base);
            let mv = candidate.mv;
            let mut rng = sample_rng(seed, index as u64);
            set.spawn_blocking(move || (index, driver.sample(&base, mv, perspective, &mut rng)));
        }
        let stats = SampleStats::collect(&mut set).await;

        let uci = move_to_uci(candidate.mv);
        let mean = stats.mean().ok_or_else(|| RolloutError::AllSamplesFailed {
            uci: uci.clone(),
            samples,
        })?;
        let aggregate = mean + memory.penalty(kind);
        debug!(
            candidate = %uci,
            heuristic = candidate.heuristic,
            aggregate,
            failed = stats.failed(),
            "candidate rolled out"
        );

        Ok(CandidateMove {
            aggregate: Some(aggregate),
            samples: stats.succeeded(),
            failed: stats.failed(),
            ..candidate
        })
    }
}

fn is_castling_king_move(mv: Move, kind: PieceKind) -> bool {
    kind == PieceKind::King && matches!((mv.from, mv.to), (4, 6) | (4, 2) | (60, 62) | (60, 58))
}

/// RNG for sample `stream` under an optional base seed.
pub fn sample_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(derive_seed(seed, stream)),
        None => StdRng::from_entropy(),
    }
}

/// Mixes a stream index into a seed (splitmix64 finaliser).
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Static evaluation of a rollout's final position for `perspective`.
///
/// Material (doubled), mobility of the perspective side, pressure on the
/// opposing king and own king safety.
pub fn position_score(pos: &Position, perspective: Color) -> f64 {
    let opponent = perspective.other();
    let mut score = 0i32;

    for kind in PieceKind::ALL {
        let diff = pos.count(perspective, kind) as i32 - pos.count(opponent, kind) as i32;
        score += MATERIAL[kind.idx()] * diff;
    }
    score *= 2;

    let mine = pos.with_side_to_move(perspective);
    let second_ranks = Bitboard::RANK_2 | Bitboard::RANK_7;
    let third_ranks = Bitboard::RANK_3 | Bitboard::RANK_6;
    for mv in legal_moves(&mine) {
        let kind = match mine.piece_at(mv.from) {
            Some(pc) => pc.kind,
            None => continue,
        };
        match kind {
            PieceKind::Pawn => {
                if Bitboard::CENTER.contains(mv.to) {
                    score += 5;
                }
                if Bitboard::PROMOTION_RANKS.contains(mv.to) {
                    score += 30;
                }
                if second_ranks.contains(mv.from) {
                    score += 1;
                }
                if third_ranks.contains(mv.to) {
                    score += 1;
                }
            }
            PieceKind::King => {}
            _ => {
                if Bitboard::CENTER.contains(mv.to) {
                    score += 3;
                }
                if second_ranks.contains(mv.from) {
                    score += 5;
                }
            }
        }
    }

    if let Some(k) = pos.king_sq(opponent) {
        if Bitboard::CENTER.contains(k) {
            score += 100;
        }
    }
    score -= 2 * king_mobility(pos, opponent) as i32;

    if let Some(k) = pos.king_sq(perspective) {
        score += if pos.castling.any(perspective) { 20 } else { -20 };
        let shield_rank = rank_of(k) + perspective.forward();
        for df in [-1, 1] {
            let shielded = sq(file_of(k) + df, shield_rank).and_then(|s| pos.piece_at(s));
            if matches!(shielded, Some(pc) if pc.color == perspective && pc.kind == PieceKind::Pawn)
            {
                score += 10;
            }
        }
    }

    score as f64
}

#[cfg(test)]
#[path = "rollout_tests.rs"]
mod rollout_tests;
