use super::*;
use async_trait::async_trait;
use chess_core::{parse_uci_squares, Decision, EngineError, Move};
use greedy_engine::GreedyEngine;
use random_engine::RandomEngine;

/// Plays its moves in a loop, ignoring the position.
struct CycleEngine {
    moves: Vec<Move>,
    next: usize,
}

impl CycleEngine {
    fn new(moves: &[&str]) -> Self {
        Self {
            moves: moves.iter().map(|m| parse_uci_squares(m).unwrap()).collect(),
            next: 0,
        }
    }
}

#[async_trait]
impl Engine for CycleEngine {
    async fn select_move(&mut self, _pos: &Position) -> Result<Decision, EngineError> {
        let mv = self.moves[self.next % self.moves.len()];
        self.next += 1;
        Ok(Decision::Move(mv))
    }

    fn name(&self) -> &str {
        "cycle"
    }

    fn new_game(&mut self) {
        self.next = 0;
    }
}

struct BrokenEngine;

#[async_trait]
impl Engine for BrokenEngine {
    async fn select_move(&mut self, _pos: &Position) -> Result<Decision, EngineError> {
        Err(EngineError::DecisionFailed {
            reason: "no candidates".into(),
        })
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn single_game(opening: &str) -> MatchConfig {
    MatchConfig {
        num_games: 1,
        max_plies: 20,
        alternate_colors: false,
        opening: Position::from_fen(opening).unwrap(),
    }
}

#[tokio::test]
async fn test_self_play() {
    let mut engine1 = RandomEngine::seeded(1);
    let mut engine2 = RandomEngine::seeded(2);

    let config = MatchConfig {
        num_games: 2,
        max_plies: 40,
        ..Default::default()
    };

    let result = MatchRunner::new(config).run_match(&mut engine1, &mut engine2).await;

    assert_eq!(result.total_games(), 2);
    assert_eq!(result.games.len(), 2);
    assert!(result.games[0].engine1_white);
    assert!(!result.games[1].engine1_white);
    assert!(result.games.iter().all(|g| g.plies <= 40));
}

#[tokio::test]
async fn checkmate_is_a_win() {
    let mut white = GreedyEngine::new();
    let mut black = GreedyEngine::new();
    let runner = MatchRunner::new(single_game("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1"));

    let result = runner.run_match(&mut white, &mut black).await;

    assert_eq!(result.wins, 1);
    assert_eq!(result.games[0].termination, Termination::Checkmate);
    assert_eq!(result.games[0].plies, 1);
}

#[tokio::test]
async fn stalemate_start_is_an_immediate_draw() {
    let mut white = RandomEngine::seeded(3);
    let mut black = RandomEngine::seeded(4);
    let runner = MatchRunner::new(single_game("k7/8/1Q6/8/8/8/8/1K6 b - - 0 1"));

    let result = runner.run_match(&mut white, &mut black).await;

    assert_eq!(result.draws, 1);
    assert_eq!(result.games[0].termination, Termination::Stalemate);
    assert_eq!(result.games[0].plies, 0);
}

#[tokio::test]
async fn engine_error_loses_with_either_colour() {
    let mut broken = BrokenEngine;
    let mut random = RandomEngine::seeded(5);
    let config = MatchConfig {
        num_games: 2,
        max_plies: 10,
        ..Default::default()
    };

    let result = MatchRunner::new(config).run_match(&mut broken, &mut random).await;

    assert_eq!(result.losses, 2);
    assert!(result
        .games
        .iter()
        .all(|g| matches!(g.termination, Termination::EngineError { .. })));
    // As Black it fails on its first turn, after White's opening move.
    assert_eq!(result.games[1].plies, 1);
}

#[tokio::test]
async fn knight_shuffle_is_fivefold_repetition() {
    let mut white = CycleEngine::new(&["g1f3", "f3g1"]);
    let mut black = CycleEngine::new(&["g8f6", "f6g8"]);
    let config = MatchConfig {
        num_games: 1,
        max_plies: 100,
        alternate_colors: false,
        opening: Position::startpos(),
    };

    let result = MatchRunner::new(config).run_match(&mut white, &mut black).await;

    assert_eq!(result.draws, 1);
    assert_eq!(result.games[0].termination, Termination::FivefoldRepetition);
    // The start position recurs every four plies.
    assert_eq!(result.games[0].plies, 16);
}

#[tokio::test]
async fn ply_limit_is_a_draw() {
    let mut white = CycleEngine::new(&["g1f3", "f3g1"]);
    let mut black = CycleEngine::new(&["g8f6", "f6g8"]);

    let result = quick_match(&mut white, &mut black, 1, 6).await;

    assert_eq!(result.draws, 1);
    assert_eq!(result.games[0].termination, Termination::MaxPlies);
    assert_eq!(result.games[0].plies, 6);
}

#[tokio::test]
async fn illegal_move_forfeits() {
    let mut white = CycleEngine::new(&["e2e5"]);
    let mut black = RandomEngine::seeded(6);
    let runner = MatchRunner::new(single_game(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ));

    let result = runner.run_match(&mut white, &mut black).await;

    assert_eq!(result.losses, 1);
    assert_eq!(
        result.games[0].termination,
        Termination::IllegalMove { uci: "e2e5".into() }
    );
}

#[test]
fn score_counts_draws_as_half() {
    let result = MatchResult {
        wins: 2,
        losses: 1,
        draws: 1,
        games: Vec::new(),
    };
    assert_eq!(result.total_games(), 4);
    assert!((result.score() - 0.625).abs() < 1e-9);
    assert_eq!(MatchResult::new().score(), 0.5);
}
