use crate::zobrist::{EP_NONE, ZOBRIST};

use super::{
    bit_for_square, Bitboard, Color, Piece, Square, ALL_CASTLING_RIGHTS, CASTLE_BLACK_K,
    CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};

/// Capacity of the Zobrist key history stack. One slot per ply of the current
/// game line; overflowing it means the caller fed a pathological game and is a
/// fatal usage error.
const HISTORY_CAPACITY: usize = 1024;

/// Bounded stack of Zobrist keys for threefold-repetition detection.
#[derive(Clone, Debug)]
pub(crate) struct KeyHistory {
    keys: Box<[u64; HISTORY_CAPACITY]>,
    len: usize,
}

impl KeyHistory {
    fn new() -> Self {
        KeyHistory {
            keys: Box::new([0; HISTORY_CAPACITY]),
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, key: u64) {
        assert!(
            self.len < HISTORY_CAPACITY,
            "position history overflow ({HISTORY_CAPACITY} plies)"
        );
        self.keys[self.len] = key;
        self.len += 1;
    }

    pub(crate) fn pop(&mut self) {
        debug_assert!(self.len > 0, "position history underflow");
        self.len -= 1;
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Number of times `key` appears in the stack.
    pub(crate) fn repetitions(&self, key: u64) -> u32 {
        let mut count = 0;
        for &k in &self.keys[..self.len] {
            if k == key {
                count += 1;
            }
        }
        count
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// Minimal tape required to invert a move.
#[derive(Clone, Copy, Debug)]
pub struct UnmakeInfo {
    pub(crate) captured: Option<Piece>,
    pub(crate) previous_en_passant: Option<Square>,
    pub(crate) previous_castling_rights: u8,
    pub(crate) previous_halfmove_clock: u32,
    pub(crate) previous_hash: u64,
    /// Whether make rebuilt the NNUE accumulator from scratch instead of
    /// applying deltas, so unmake knows how to restore it.
    pub(crate) nnue_refreshed: bool,
}

/// A chess position: bitboards plus a square->piece mailbox, with an
/// incrementally maintained Zobrist key.
#[derive(Clone, Debug)]
pub struct Board {
    /// Colored piece occupying each square, or None
    pub(crate) squares: [Option<(Color, Piece)>; 64],
    /// `pieces[color][piece_type]`
    pub(crate) pieces: [[Bitboard; 6]; 2],
    /// Union of a color's six piece bitboards
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) white_to_move: bool,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) castling_rights: u8,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) key_history: KeyHistory,
}

impl Board {
    /// The standard initial position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.iter().enumerate() {
            board.set_piece(Square::new(0, file), Color::White, *piece);
            board.set_piece(Square::new(1, file), Color::White, Piece::Pawn);
            board.set_piece(Square::new(6, file), Color::Black, Piece::Pawn);
            board.set_piece(Square::new(7, file), Color::Black, *piece);
        }

        board.castling_rights = ALL_CASTLING_RIGHTS;
        board.fullmove_number = 1;
        board.hash = board.calculate_hash();
        board.key_history.push(board.hash);
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            squares: [None; 64],
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            white_to_move: true,
            en_passant_target: None,
            castling_rights: 0,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            key_history: KeyHistory::new(),
        }
    }

    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = bit_for_square(sq);
        self.squares[sq.as_index()] = Some((color, piece));
        self.pieces[color.index()][piece.index()].0 |= bit;
        self.occupied[color.index()].0 |= bit;
        self.all_occupied.0 |= bit;
    }

    pub(crate) fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = bit_for_square(sq);
        self.squares[sq.as_index()] = None;
        self.pieces[color.index()][piece.index()].0 &= !bit;
        self.occupied[color.index()].0 &= !bit;
        self.all_occupied.0 &= !bit;
    }

    /// The colored piece on a square, if any.
    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.squares[sq.as_index()]
    }

    #[inline]
    pub(crate) fn is_empty_square(&self, sq: Square) -> bool {
        self.squares[sq.as_index()].is_none()
    }

    pub(crate) fn has_castling_right(&self, color: Color, kingside: bool) -> bool {
        let bit = match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        };
        self.castling_rights & bit != 0
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn white_to_move(&self) -> bool {
        self.white_to_move
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        if self.white_to_move {
            Color::White
        } else {
            Color::Black
        }
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[must_use]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Total number of pieces on the board (both colors, kings included).
    #[must_use]
    pub fn piece_count(&self) -> u32 {
        self.all_occupied.popcount()
    }

    /// Number of times the current position has occurred in the game line,
    /// the current occurrence included.
    #[must_use]
    pub fn repetition_count(&self) -> u32 {
        self.key_history.repetitions(self.hash)
    }

    /// Draw by the 50-move rule or threefold repetition.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.halfmove_clock >= 100 || self.repetition_count() >= 3
    }

    /// Full Zobrist recompute from the piece placement and flags. Make/unmake
    /// maintains the key incrementally; the two must always agree.
    #[must_use]
    pub(crate) fn calculate_hash(&self) -> u64 {
        let mut hash: u64 = 0;

        for idx in 0..64 {
            if let Some((color, piece)) = self.squares[idx] {
                hash ^= ZOBRIST.piece_keys[piece.index()][color.index()][idx];
            }
        }

        hash ^= ZOBRIST.castling_keys[self.castling_rights as usize];

        let ep_idx = self
            .en_passant_target
            .map_or(EP_NONE, Square::as_index);
        if ep_idx != EP_NONE {
            hash ^= ZOBRIST.en_passant_keys[ep_idx];
        }

        if !self.white_to_move {
            hash ^= ZOBRIST.side_key;
        }

        hash
    }

    /// Debug-build coherence check: mailbox and bitboards must describe the
    /// same position, and each side must have exactly one king.
    #[cfg(debug_assertions)]
    pub(crate) fn assert_coherent(&self) {
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            match self.squares[idx] {
                Some((color, piece)) => {
                    debug_assert!(
                        self.pieces[color.index()][piece.index()].contains(sq),
                        "mailbox has {color:?} {piece:?} on {sq} but bitboard does not"
                    );
                }
                None => {
                    debug_assert!(
                        !self.all_occupied.contains(sq),
                        "bitboard occupied on {sq} but mailbox is empty"
                    );
                }
            }
        }
        for color in [Color::White, Color::Black] {
            let mut union = Bitboard::EMPTY;
            for piece in super::ALL_PIECES {
                union.0 |= self.pieces[color.index()][piece.index()].0;
            }
            debug_assert_eq!(union, self.occupied[color.index()]);
            debug_assert_eq!(
                self.pieces[color.index()][Piece::King.index()].popcount(),
                1,
                "{color} must have exactly one king"
            );
        }
        debug_assert_eq!(
            Bitboard(self.occupied[0].0 | self.occupied[1].0),
            self.all_occupied
        );
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
