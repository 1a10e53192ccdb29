//! Chess board representation and game logic.
//!
//! Bitboards plus a square->piece mailbox, pseudo-legal move generation over
//! magic attack tables, and fully reversible make/unmake with incremental
//! Zobrist and NNUE accumulator updates.
//!
//! # Example
//! ```
//! use lodestone::board::Board;
//!
//! let board = Board::new();
//! let moves = board.generate_moves();
//! println!("starting position has {} pseudo-legal moves", moves.len());
//! ```

mod attack_tables;
mod error;
mod eval;
mod fen;
mod make_unmake;
mod movegen;
mod pst;
mod state;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use error::{FenError, MoveParseError, SquareError};
pub use state::{Board, UnmakeInfo};
pub use types::{Bitboard, Color, Move, MoveList, Piece, Square};

pub(crate) use types::{
    bit_for_square, castling_rights_mask, ScoredMoveList, ALL_CASTLING_RIGHTS, ALL_PIECES,
    CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q, EMPTY_MOVE, MAX_PLY,
    PROMOTION_PIECES,
};
