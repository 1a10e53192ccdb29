//! Property tests: randomized playouts preserve the board invariants.

use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng as _;

use crate::board::{Board, Color, Move, Piece, Square, UnmakeInfo};

/// Play up to `plies` random legal moves from the start position, driven by
/// `seed`, returning the move/undo trail.
fn random_playout(board: &mut Board, seed: u64, plies: usize) -> Vec<(Move, UnmakeInfo)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut trail = Vec::new();
    for _ in 0..plies {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        let info = board.make_move(mv);
        trail.push((mv, info));
    }
    trail
}

/// Mailbox and bitboards must describe the same position.
fn check_coherence(board: &Board) {
    let mut occupied = [0u64; 2];
    for idx in 0..64 {
        let sq = Square::from_index(idx);
        match board.piece_at(sq) {
            Some((color, piece)) => {
                assert!(
                    board.pieces[color.index()][piece.index()].contains(sq),
                    "mailbox claims {color:?} {piece:?} on {sq}"
                );
                occupied[color.index()] |= 1 << idx;
            }
            None => {
                assert!(!board.all_occupied.contains(sq));
            }
        }
    }
    assert_eq!(occupied[0], board.occupied[0].0);
    assert_eq!(occupied[1], board.occupied[1].0);
    assert_eq!(occupied[0] | occupied[1], board.all_occupied.0);
    for color in [Color::White, Color::Black] {
        assert_eq!(
            board.pieces[color.index()][Piece::King.index()].popcount(),
            1
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_hash_stays_consistent(seed in any::<u64>()) {
        let mut board = Board::new();
        let trail = random_playout(&mut board, seed, 120);
        prop_assert_eq!(board.hash(), board.calculate_hash());
        for (mv, info) in trail.iter().rev() {
            board.unmake_move(*mv, info);
            prop_assert_eq!(board.hash(), board.calculate_hash());
        }
    }

    #[test]
    fn prop_unmake_restores_the_start_position(seed in any::<u64>()) {
        let mut board = Board::new();
        let initial_fen = board.to_fen();
        let initial_hash = board.hash();
        let trail = random_playout(&mut board, seed, 120);
        for (mv, info) in trail.iter().rev() {
            board.unmake_move(*mv, info);
        }
        prop_assert_eq!(board.to_fen(), initial_fen);
        prop_assert_eq!(board.hash(), initial_hash);
        prop_assert_eq!(board.repetition_count(), 1);
    }

    #[test]
    fn prop_boards_stay_coherent(seed in any::<u64>()) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..60 {
            let moves = board.legal_moves();
            if moves.is_empty() {
                break;
            }
            board.make_move(moves[rng.gen_range(0..moves.len())]);
            check_coherence(&board);
        }
    }

    #[test]
    fn prop_ep_square_only_after_double_push(seed in any::<u64>()) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..80 {
            let moves = board.legal_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            board.make_move(mv);
            match board.en_passant_square() {
                Some(sq) => {
                    prop_assert!(mv.is_double_pawn_push());
                    prop_assert!(sq.rank() == 2 || sq.rank() == 5);
                }
                None => prop_assert!(!mv.is_double_pawn_push()),
            }
        }
    }
}
