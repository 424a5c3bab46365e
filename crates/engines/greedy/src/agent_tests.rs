use super::*;
use chess_core::{parse_uci_squares, PieceKind};

#[test]
fn greedy_agent_best_move_updates_memory() {
    let mut agent = GreedyAgent::new();
    let pos = Position::startpos();
    let proposal = agent.propose(&pos, &PlayArgs { top_n: -1 });
    assert_eq!(proposal, Proposal::Move(parse_uci_squares("d2d4").unwrap()));
    assert_eq!(agent.memory().last(), Some(PieceKind::Pawn));
}

#[test]
fn greedy_agent_zero_breadth_plays_best_move() {
    let mut agent = GreedyAgent::new();
    let proposal = agent.propose(&Position::startpos(), &PlayArgs { top_n: 0 });
    assert_eq!(proposal, Proposal::Move(parse_uci_squares("d2d4").unwrap()));
    assert_eq!(agent.memory().last(), Some(PieceKind::Pawn));
}

#[test]
fn greedy_agent_choices_leave_memory_alone() {
    let mut agent = GreedyAgent::new();
    let pos = Position::startpos();
    match agent.propose(&pos, &PlayArgs { top_n: 3 }) {
        Proposal::Choices(moves) => assert_eq!(moves.len(), 3),
        other => panic!("expected choices, got {other:?}"),
    }
    assert_eq!(agent.memory().last(), None);
}

#[test]
fn greedy_agent_resigns_without_moves() {
    let mut agent = GreedyAgent::new();
    let pos = Position::from_fen("k7/8/1Q6/8/8/8/8/1K6 b - - 0 1").unwrap();
    assert_eq!(agent.propose(&pos, &PlayArgs::default()), Proposal::Resign);
}

#[test]
fn scripted_agent_replays_then_resigns() {
    let e4 = parse_uci_squares("e2e4").unwrap();
    let mut agent = ScriptedAgent::new(vec![e4]);
    let pos = Position::startpos();
    assert_eq!(agent.propose(&pos, &PlayArgs::default()), Proposal::Move(e4));
    assert_eq!(agent.propose(&pos, &PlayArgs::default()), Proposal::Resign);
}

#[test]
fn scripted_factory_splits_by_color() {
    let e4 = parse_uci_squares("e2e4").unwrap();
    let e5 = parse_uci_squares("e7e5").unwrap();
    let factory = scripted_factory(vec![e4], vec![e5]);
    let pos = Position::startpos();
    let mut black = factory.create(Color::Black);
    assert_eq!(black.propose(&pos, &PlayArgs::default()), Proposal::Move(e5));
    // Agents are independent: a second one starts its script over.
    let mut again = factory.create(Color::Black);
    assert_eq!(again.propose(&pos, &PlayArgs::default()), Proposal::Move(e5));
}
