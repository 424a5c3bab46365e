//! Match runner for playing games between engines

use chess_core::{Color, DrawReason, Engine, GameStatus, Position};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Result of a single game
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    fn flipped(self) -> Self {
        match self {
            GameResult::Win => GameResult::Loss,
            GameResult::Loss => GameResult::Win,
            GameResult::Draw => GameResult::Draw,
        }
    }

    /// Result for White given the winning side, if any.
    fn for_white(winner: Option<Color>) -> Self {
        match winner {
            Some(Color::White) => GameResult::Win,
            Some(Color::Black) => GameResult::Loss,
            None => GameResult::Draw,
        }
    }
}

/// Why a game stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
    /// An engine returned no move while legal moves existed.
    Resigned,
    EngineError { reason: String },
    IllegalMove { uci: String },
    MaxPlies,
}

impl Termination {
    fn from_draw(reason: DrawReason) -> Self {
        match reason {
            DrawReason::Stalemate => Termination::Stalemate,
            DrawReason::InsufficientMaterial => Termination::InsufficientMaterial,
            DrawReason::SeventyFiveMoves => Termination::SeventyFiveMoves,
            DrawReason::FivefoldRepetition => Termination::FivefoldRepetition,
        }
    }
}

/// One finished game, from engine1's point of view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub engine1_white: bool,
    pub result: GameResult,
    pub plies: u32,
    pub termination: Termination,
    pub final_fen: String,
}

/// Result of a match (multiple games)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchResult {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games: Vec<GameRecord>,
}

impl MatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Score from engine1's perspective (1 for win, 0.5 for draw, 0 for loss)
    pub fn score(&self) -> f64 {
        let total = self.total_games() as f64;
        if total == 0.0 {
            return 0.5;
        }
        (self.wins as f64 + 0.5 * self.draws as f64) / total
    }

    fn add(&mut self, record: GameRecord) {
        match record.result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::Draw => self.draws += 1,
        }
        self.games.push(record);
    }
}

/// Configuration for a match
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Number of games to play
    pub num_games: u32,
    /// Plies per game before declaring a draw
    pub max_plies: u32,
    /// Whether to alternate colors each game
    pub alternate_colors: bool,
    /// Position every game starts from
    pub opening: Position,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            num_games: 10,
            max_plies: 300,
            alternate_colors: true,
            opening: Position::startpos(),
        }
    }
}

/// A game seen from White's side, before it is credited to an engine.
struct Finished {
    result: GameResult,
    plies: u32,
    termination: Termination,
    final_fen: String,
}

/// Runs matches between two engines
pub struct MatchRunner {
    config: MatchConfig,
}

impl MatchRunner {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Run a match between two engines
    ///
    /// Returns the result from engine1's perspective
    pub async fn run_match(&self, engine1: &mut dyn Engine, engine2: &mut dyn Engine) -> MatchResult {
        let mut result = MatchResult::new();

        for game_num in 0..self.config.num_games {
            let engine1_white = !self.config.alternate_colors || game_num % 2 == 0;

            let game = if engine1_white {
                self.play_game(engine1, engine2).await
            } else {
                self.play_game(engine2, engine1).await
            };
            let outcome = if engine1_white {
                game.result
            } else {
                game.result.flipped()
            };

            result.add(GameRecord {
                engine1_white,
                result: outcome,
                plies: game.plies,
                termination: game.termination,
                final_fen: game.final_fen,
            });
            let colour = if engine1_white { "white" } else { "black" };
            info!(
                game = game_num + 1,
                of = self.config.num_games,
                engine1 = colour,
                result = ?outcome,
                plies = game.plies,
                wins = result.wins,
                losses = result.losses,
                draws = result.draws,
                "game finished"
            );
        }

        result
    }

    /// Play a single game, result from White's perspective
    async fn play_game(&self, white: &mut dyn Engine, black: &mut dyn Engine) -> Finished {
        let mut pos = self.config.opening.clone();
        white.new_game();
        black.new_game();

        // Hashes since the last irreversible move, for fivefold repetition.
        let mut history = vec![pos.position_hash()];
        let mut status = pos.status();

        for ply in 0..self.config.max_plies {
            if status.is_over() {
                return finished(&pos, status, ply);
            }
            let mover = pos.side_to_move;
            let engine: &mut dyn Engine = match mover {
                Color::White => &mut *white,
                Color::Black => &mut *black,
            };

            let decision = match engine.select_move(&pos).await {
                Ok(decision) => decision,
                Err(err) => {
                    warn!(engine = engine.name(), side = ?mover, error = %err, "engine failed");
                    return forfeit(&pos, mover, ply, Termination::EngineError {
                        reason: err.to_string(),
                    });
                }
            };
            let Some(mv) = decision.best_move() else {
                let status = pos.status();
                if status.is_over() {
                    return finished(&pos, status, ply);
                }
                return forfeit(&pos, mover, ply, Termination::Resigned);
            };

            let applied = match pos.apply(mv) {
                Ok(applied) => applied,
                Err(err) => {
                    warn!(engine = engine.name(), error = %err, "illegal move");
                    return forfeit(&pos, mover, ply, Termination::IllegalMove {
                        uci: chess_core::move_to_uci(mv),
                    });
                }
            };
            let next_status = applied.status();
            pos = applied.position;

            if pos.halfmove_clock == 0 {
                history.clear();
            }
            let hash = pos.position_hash();
            history.push(hash);
            let repetitions = history.iter().filter(|h| **h == hash).count();
            status = next_status.with_repetitions(repetitions);
        }

        if status.is_over() {
            return finished(&pos, status, self.config.max_plies);
        }
        Finished {
            result: GameResult::Draw,
            plies: self.config.max_plies,
            termination: Termination::MaxPlies,
            final_fen: pos.to_fen(),
        }
    }
}

fn finished(pos: &Position, status: GameStatus, plies: u32) -> Finished {
    let (result, termination) = match status {
        GameStatus::Checkmate { winner } => (GameResult::for_white(Some(winner)), Termination::Checkmate),
        GameStatus::Draw(reason) => (GameResult::Draw, Termination::from_draw(reason)),
        GameStatus::Ongoing => (GameResult::Draw, Termination::MaxPlies),
    };
    Finished {
        result,
        plies,
        termination,
        final_fen: pos.to_fen(),
    }
}

/// `loser` gave the game away without it ending on the board.
fn forfeit(pos: &Position, loser: Color, plies: u32, termination: Termination) -> Finished {
    Finished {
        result: GameResult::for_white(Some(loser.other())),
        plies,
        termination,
        final_fen: pos.to_fen(),
    }
}

/// Quick utility to run a match from the standard start position
pub async fn quick_match(
    engine1: &mut dyn Engine,
    engine2: &mut dyn Engine,
    num_games: u32,
    max_plies: u32,
) -> MatchResult {
    let config = MatchConfig {
        num_games,
        max_plies,
        ..Default::default()
    };
    MatchRunner::new(config).run_match(engine1, engine2).await
}

#[cfg(test)]
#[path = "match_runner_tests.rs"]
mod match_runner_tests;
