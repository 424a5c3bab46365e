use super::*;
use crate::agent::{greedy_factory, scripted_factory};
use chess_core::{parse_uci_squares, DrawReason, START_FEN};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn moves(list: &[&str]) -> Vec<Move> {
    list.iter().map(|m| parse_uci_squares(m).unwrap()).collect()
}

#[test]
fn open_is_isolated_from_source() {
    let mut source = Position::startpos();
    let sandbox = Sandbox::open(&source);
    source.make_move(moves(&["e2e4"])[0]);
    assert_eq!(sandbox.fen(), START_FEN);
    assert_eq!(sandbox.status(), GameStatus::Ongoing);
}

#[test]
fn apply_does_not_touch_source() {
    let source = Position::startpos();
    let mut sandbox = Sandbox::open(&source);
    sandbox.apply(moves(&["e2e4"])[0]).unwrap();
    assert_eq!(source, Position::startpos());
    assert_ne!(sandbox.fen(), START_FEN);
}

#[test]
fn illegal_move_is_rejected_and_state_kept() {
    let mut sandbox = Sandbox::open(&Position::startpos());
    let err = sandbox.apply(moves(&["e2e5"])[0]).unwrap_err();
    assert!(matches!(err, RulesError::IllegalMove { .. }));
    assert_eq!(sandbox.fen(), START_FEN);
}

#[test]
fn reset_restores_opening_state() {
    let start = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1").unwrap();
    let mut sandbox = Sandbox::open(&start);
    let opened_fen = sandbox.fen();
    let status = sandbox.apply(moves(&["e1e8"])[0]).unwrap();
    assert_eq!(status, GameStatus::Checkmate { winner: Color::White });

    sandbox.reset();
    assert_eq!(sandbox.fen(), opened_fen);
    assert_eq!(sandbox.status(), GameStatus::Ongoing);
}

#[test]
fn checkpoint_and_rollback() {
    let mut sandbox = Sandbox::open(&Position::startpos());
    for mv in moves(&["e2e4", "e7e5"]) {
        sandbox.apply(mv).unwrap();
    }
    sandbox.checkpoint("open game");
    let saved = sandbox.fen();
    sandbox.apply(moves(&["g1f3"])[0]).unwrap();

    assert!(!sandbox.rollback("missing"));
    assert_ne!(sandbox.fen(), saved);
    assert!(sandbox.rollback("open game"));
    assert_eq!(sandbox.fen(), saved);
    sandbox.release();
}

#[test]
fn fivefold_repetition_ends_the_game() {
    let mut sandbox = Sandbox::open(&Position::startpos());
    let shuffle = moves(&["g1f3", "g8f6", "f3g1", "f6g8"]);
    let mut last = GameStatus::Ongoing;
    for round in 0..4 {
        for mv in &shuffle {
            assert_eq!(last, GameStatus::Ongoing, "round {round}");
            last = sandbox.apply(*mv).unwrap();
        }
    }
    assert_eq!(last, GameStatus::Draw(DrawReason::FivefoldRepetition));
}

#[test]
fn run_stops_at_depth() {
    let factory = scripted_factory(moves(&["g1f3"]), moves(&["e7e5"]));
    let mut sandbox = Sandbox::open(&Position::startpos());
    sandbox.apply(moves(&["e2e4"])[0]).unwrap();

    let mut rng = StdRng::seed_from_u64(1);
    let outcome = sandbox
        .run(factory.as_ref(), RolloutDepth::Plies(2), &PlayArgs::default(), &mut rng)
        .unwrap();
    assert_eq!(
        outcome,
        RunOutcome {
            plies: 2,
            end: RunEnd::DepthReached
        }
    );
    assert_eq!(
        sandbox.fen(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
    );
}

#[test]
fn zero_breadth_greedy_run_keeps_playing() {
    let mut sandbox = Sandbox::open(&Position::startpos());
    let mut rng = StdRng::seed_from_u64(1);
    let outcome = sandbox
        .run(greedy_factory().as_ref(), RolloutDepth::Plies(4), &PlayArgs { top_n: 0 }, &mut rng)
        .unwrap();
    assert_eq!(
        outcome,
        RunOutcome {
            plies: 4,
            end: RunEnd::DepthReached
        }
    );
}

#[test]
fn run_ends_on_resignation() {
    let factory = scripted_factory(moves(&["e2e4"]), Vec::new());
    let mut sandbox = Sandbox::open(&Position::startpos());
    let mut rng = StdRng::seed_from_u64(1);
    let outcome = sandbox
        .run(factory.as_ref(), RolloutDepth::Plies(6), &PlayArgs::default(), &mut rng)
        .unwrap();
    assert_eq!(outcome.plies, 1);
    assert_eq!(outcome.end, RunEnd::Resigned(Color::Black));
}

#[test]
fn unlimited_run_plays_to_mate() {
    let factory = scripted_factory(moves(&["f2f3", "g2g4"]), moves(&["e7e5", "d8h4"]));
    let mut sandbox = Sandbox::open(&Position::startpos());
    let mut rng = StdRng::seed_from_u64(1);
    let outcome = sandbox
        .run(factory.as_ref(), RolloutDepth::Unlimited, &PlayArgs::default(), &mut rng)
        .unwrap();
    assert_eq!(outcome.plies, 4);
    assert_eq!(
        outcome.end,
        RunEnd::GameOver(GameStatus::Checkmate { winner: Color::Black })
    );
}

#[test]
fn run_on_finished_game_plays_nothing() {
    let mated =
        Position::from_fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")
            .unwrap();
    let mut sandbox = Sandbox::open(&mated);
    let mut rng = StdRng::seed_from_u64(1);
    let outcome = sandbox
        .run(greedy_factory().as_ref(), RolloutDepth::Plies(4), &PlayArgs::default(), &mut rng)
        .unwrap();
    assert_eq!(outcome.plies, 0);
    assert!(matches!(outcome.end, RunEnd::GameOver(_)));
}

#[test]
fn illegal_proposal_fails_the_run() {
    let factory = scripted_factory(moves(&["e2e5"]), Vec::new());
    let mut sandbox = Sandbox::open(&Position::startpos());
    let mut rng = StdRng::seed_from_u64(1);
    let result = sandbox.run(factory.as_ref(), RolloutDepth::Plies(2), &PlayArgs::default(), &mut rng);
    assert!(result.is_err());
}

#[test]
fn seeded_choice_runs_are_reproducible() {
    let args = PlayArgs { top_n: 3 };
    let play = |seed: u64| {
        let mut sandbox = Sandbox::open(&Position::startpos());
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = sandbox
            .run(greedy_factory().as_ref(), RolloutDepth::Plies(4), &args, &mut rng)
            .unwrap();
        assert_eq!(outcome.end, RunEnd::DepthReached);
        sandbox.fen()
    };
    assert_eq!(play(9), play(9));
}
