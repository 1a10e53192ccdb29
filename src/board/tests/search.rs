//! Search behavior tests: mates, draws, limits, determinism.

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use crate::board::{Board, EMPTY_MOVE, MAX_PLY};
use crate::nnue::Accumulator;
use crate::search::constants::{MATE_SCORE, SCORE_INFINITE};
use crate::search::{run_search, SearchBudget, SearchContext, SearchState};

fn search_depth(board: &mut Board, depth: u32) -> crate::search::SearchResult {
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);
    let budget = SearchBudget {
        max_depth: depth,
        ..SearchBudget::default()
    };
    run_search(board, &mut state, None, &budget, &stop, None)
}

#[test]
fn test_mate_in_one_is_found() {
    // Ra8 is a back-rank mate
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    let result = search_depth(&mut board, 2);
    assert!(
        result.score >= MATE_SCORE - 2,
        "expected mate score, got {}",
        result.score
    );
    assert_eq!(result.best_move.map(|m| m.to_string()), Some("a1a8".into()));
}

#[test]
fn test_mated_side_sees_negative_mate() {
    // Black to move, the forced Kh7 runs into Qg7 mate
    let mut board = Board::from_fen("7k/8/5K2/8/8/8/8/6Q1 b - - 0 1");
    let result = search_depth(&mut board, 4);
    assert!(
        result.score <= -(MATE_SCORE - 4),
        "expected to be mated, got {}",
        result.score
    );
}

#[test]
fn test_rook_up_endgame_is_winning() {
    // Side to move (black) is a rook up
    let mut board = Board::from_fen("6k1/5p1p/5Pp1/8/8/6PK/8/r7 b - - 0 1");
    let result = search_depth(&mut board, 6);
    assert!(
        result.score > 200,
        "expected a winning score, got {}",
        result.score
    );
    assert!(result.best_move.is_some());
}

#[test]
fn test_stalemate_scores_zero() {
    let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    let result = search_depth(&mut board, 4);
    assert_eq!(result.score, 0);
    assert_eq!(result.best_move, None);
}

#[test]
fn test_repetition_scores_zero_in_search() {
    // Knight shuffle back to the start position: its key now appears twice in
    // the history, so a non-root node on it is a draw
    let mut board = Board::new();
    for notation in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        let m = board.parse_move(notation).unwrap();
        board.make_move(m);
    }
    assert_eq!(board.repetition_count(), 2);

    let mut state = SearchState::new(1);
    let stop = AtomicBool::new(false);
    let mut ctx = SearchContext {
        board: &mut board,
        state: &mut state,
        network: None,
        acc: Accumulator::new(),
        stop: &stop,
        start: Instant::now(),
        hard_time_ms: u64::MAX,
        node_limit: u64::MAX,
        nodes: 0,
        pv: vec![[EMPTY_MOVE; MAX_PLY]; MAX_PLY].into_boxed_slice(),
        pv_len: [0; MAX_PLY],
        root_best: None,
    };
    assert_eq!(ctx.negamax(4, -SCORE_INFINITE, SCORE_INFINITE, 1), 0);
}

#[test]
fn test_threefold_repetition_is_a_board_draw() {
    let mut board = Board::new();
    for notation in [
        "g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8",
    ] {
        let m = board.parse_move(notation).unwrap();
        board.make_move(m);
    }
    assert_eq!(board.repetition_count(), 3);
    assert!(board.is_draw());
}

#[test]
fn test_fifty_move_rule_saves_the_defender() {
    // White is hopelessly behind but the only legal move reaches halfmove 100
    let mut board = Board::from_fen("7k/8/8/2q5/1r6/8/8/K7 w - - 99 70");
    let result = search_depth(&mut board, 3);
    assert_eq!(result.score, 0);
    assert_eq!(result.best_move.map(|m| m.to_string()), Some("a1a2".into()));
}

#[test]
fn test_node_limit_stops_search() {
    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let stop = AtomicBool::new(false);
    let budget = SearchBudget {
        node_limit: 2_000,
        ..SearchBudget::default()
    };
    let result = run_search(&mut board, &mut state, None, &budget, &stop, None);
    // Terminates, and with a move from whatever depth completed
    assert!(state.nodes <= 4_096);
    assert!(result.best_move.is_some());
}

#[test]
fn test_search_is_deterministic() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut first = Board::from_fen(fen);
    let mut second = Board::from_fen(fen);
    let a = search_depth(&mut first, 4);
    let b = search_depth(&mut second, 4);
    assert_eq!(a.best_move, b.best_move);
    assert_eq!(a.score, b.score);
    assert_eq!(a.pv, b.pv);
}

#[test]
fn test_pv_starts_with_best_move() {
    let mut board = Board::new();
    let result = search_depth(&mut board, 4);
    assert!(!result.pv.is_empty());
    assert_eq!(result.pv.first().copied(), result.best_move);
    // Every PV move must be legal when replayed
    let mut replay = Board::new();
    for &m in &result.pv {
        assert!(replay.legal_moves().contains(m), "PV move {m} not legal");
        replay.make_move(m);
    }
}

#[test]
fn test_search_with_tt_disabled_still_works() {
    let mut board = Board::new();
    let mut state = SearchState::new(0);
    let stop = AtomicBool::new(false);
    let budget = SearchBudget {
        max_depth: 3,
        ..SearchBudget::default()
    };
    let result = run_search(&mut board, &mut state, None, &budget, &stop, None);
    assert!(result.best_move.is_some());
}
