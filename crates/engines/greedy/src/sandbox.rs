//! Isolated, disposable game state for simulations.
//!
//! A [`Sandbox`] owns a private clone of a position. Nothing done inside it is
//! visible to the position it was opened from, and every rollout task opens
//! its own.

use std::collections::HashMap;

use chess_core::{Agent, Color, GameStatus, Move, PlayArgs, Position, Proposal, RulesError};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::agent::AgentFactory;

/// How far [`Sandbox::run`] plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloutDepth {
    Plies(u32),
    /// Until the game is over or an agent resigns.
    Unlimited,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    DepthReached,
    GameOver(GameStatus),
    /// The side to move had nothing to propose.
    Resigned(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub plies: u32,
    pub end: RunEnd,
}

#[derive(Debug, Clone)]
struct Snapshot {
    position: Position,
    status: GameStatus,
    history: Vec<u64>,
}

impl Snapshot {
    fn capture(position: &Position, status: GameStatus) -> Self {
        Self {
            position: position.clone(),
            status,
            history: vec![position.position_hash()],
        }
    }
}

#[derive(Debug)]
pub struct Sandbox {
    opening: Snapshot,
    current: Snapshot,
    checkpoints: HashMap<String, Snapshot>,
}

impl Sandbox {
    pub fn open(source: &Position) -> Self {
        Self::open_with_status(source, source.status())
    }

    /// Opens with a status the caller already computed for `source`.
    pub fn open_with_status(source: &Position, status: GameStatus) -> Self {
        let opening = Snapshot::capture(source, status);
        Self {
            current: opening.clone(),
            opening,
            checkpoints: HashMap::new(),
        }
    }

    pub fn position(&self) -> &Position {
        &self.current.position
    }

    pub fn status(&self) -> GameStatus {
        self.current.status
    }

    pub fn fen(&self) -> String {
        self.current.position.to_fen()
    }

    /// Plays a legal move and returns the new status, including fivefold
    /// repetition over the moves played in this sandbox.
    pub fn apply(&mut self, mv: Move) -> Result<GameStatus, RulesError> {
        let applied = self.current.position.apply(mv)?;
        let hash = applied.position.position_hash();
        // Captures and pawn moves make earlier positions unreachable.
        if applied.position.halfmove_clock == 0 {
            self.current.history.clear();
        }
        self.current.history.push(hash);
        let occurrences = self.current.history.iter().filter(|&&h| h == hash).count();

        self.current.status = applied.status().with_repetitions(occurrences);
        self.current.position = applied.position;
        Ok(self.current.status)
    }

    pub fn checkpoint(&mut self, name: impl Into<String>) {
        self.checkpoints.insert(name.into(), self.current.clone());
    }

    /// Restores a named checkpoint. Unknown names leave the state untouched
    /// and return false.
    pub fn rollback(&mut self, name: &str) -> bool {
        match self.checkpoints.get(name) {
            Some(snapshot) => {
                self.current = snapshot.clone();
                true
            }
            None => false,
        }
    }

    /// Back to the state right after opening. Checkpoints are kept.
    pub fn reset(&mut self) {
        self.current = self.opening.clone();
    }

    /// Ends the sandbox explicitly; dropping it has the same effect.
    pub fn release(self) {}

    /// Plays agent moves for both sides, starting with the side to move.
    ///
    /// `Choices` proposals are resolved uniformly at random with `rng`.
    /// A resignation or an empty choice list ends the run normally; only an
    /// illegal proposal is an error.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        factory: &dyn AgentFactory,
        depth: RolloutDepth,
        args: &PlayArgs,
        rng: &mut R,
    ) -> Result<RunOutcome, RulesError> {
        let mut plies = 0;
        if self.current.status.is_over() {
            return Ok(RunOutcome {
                plies,
                end: RunEnd::GameOver(self.current.status),
            });
        }

        let mut agents: [Box<dyn Agent>; 2] =
            [factory.create(Color::White), factory.create(Color::Black)];
        loop {
            if let RolloutDepth::Plies(limit) = depth {
                if plies >= limit {
                    return Ok(RunOutcome {
                        plies,
                        end: RunEnd::DepthReached,
                    });
                }
            }

            let side = self.current.position.side_to_move;
            let proposal = agents[side.idx()].propose(&self.current.position, args);
            let mv = match proposal {
                Proposal::Move(mv) => mv,
                Proposal::Choices(moves) => match moves.choose(rng) {
                    Some(&mv) => mv,
                    None => return Ok(resigned(plies, side)),
                },
                Proposal::Resign => return Ok(resigned(plies, side)),
            };

            let status = self.apply(mv)?;
            plies += 1;
            if status.is_over() {
                return Ok(RunOutcome {
                    plies,
                    end: RunEnd::GameOver(status),
                });
            }
        }
    }
}

fn resigned(plies: u32, side: Color) -> RunOutcome {
    RunOutcome {
        plies,
        end: RunEnd::Resigned(side),
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        if !self.checkpoints.is_empty() {
            trace!(checkpoints = self.checkpoints.len(), "releasing sandbox");
        }
        self.checkpoints.clear();
    }
}

#[cfg(test)]
#[path = "sandbox_tests.rs"]
mod sandbox_tests;
