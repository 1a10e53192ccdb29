//! Move execution and reversal.
//!
//! `apply_move` performs every board mutation for a move in one uniform
//! function: mailbox and bitboard updates, incremental Zobrist maintenance,
//! castling-rights and en-passant bookkeeping, clocks, side flip, history
//! push, and the NNUE accumulator update. `revert_move` restores every field
//! bit-exactly, the Zobrist key included.

use crate::nnue::{Accumulator, Network};
use crate::zobrist::ZOBRIST;

use super::{castling_rights_mask, Board, Color, Move, Piece, Square, UnmakeInfo};

#[inline]
fn piece_key(piece: Piece, color: Color, sq: Square) -> u64 {
    ZOBRIST.piece_keys[piece.index()][color.index()][sq.as_index()]
}

impl Board {
    /// Make a move without an NNUE accumulator (perft, classical-eval search).
    pub fn make_move(&mut self, m: Move) -> UnmakeInfo {
        self.apply_move(m, None)
    }

    /// Make a move, keeping `acc` in sync with the new position.
    pub fn make_move_nnue(
        &mut self,
        m: Move,
        acc: &mut Accumulator,
        net: &Network,
    ) -> UnmakeInfo {
        self.apply_move(m, Some((acc, net)))
    }

    /// Undo a move made without an accumulator.
    pub fn unmake_move(&mut self, m: Move, info: &UnmakeInfo) {
        self.revert_move(m, info, None);
    }

    /// Undo a move, restoring `acc` to its pre-make state.
    pub fn unmake_move_nnue(
        &mut self,
        m: Move,
        info: &UnmakeInfo,
        acc: &mut Accumulator,
        net: &Network,
    ) {
        self.revert_move(m, info, Some((acc, net)));
    }

    fn apply_move(&mut self, m: Move, nnue: Option<(&mut Accumulator, &Network)>) -> UnmakeInfo {
        let previous_hash = self.hash;
        let previous_en_passant = self.en_passant_target;
        let previous_castling_rights = self.castling_rights;
        let previous_halfmove_clock = self.halfmove_clock;

        let color = self.side_to_move();
        let is_white = color == Color::White;
        let from = m.from();
        let to = m.to();
        let mut hash = self.hash;

        let (moving_color, piece) = self.piece_at(from).expect("make: from-square empty");
        debug_assert_eq!(moving_color, color, "make: moving opponent's piece");

        // Lift the mover off its from-square
        self.remove_piece(from, color, piece);
        hash ^= piece_key(piece, color, from);

        // Captures. En passant removes the pawn behind the target square.
        let mut captured: Option<Piece> = None;
        let mut capture_sq = to;
        if m.is_en_passant() {
            capture_sq = to.pawn_forward(!is_white);
            let (cap_color, cap_piece) = self
                .piece_at(capture_sq)
                .expect("make: en passant without a pawn to take");
            self.remove_piece(capture_sq, cap_color, cap_piece);
            hash ^= piece_key(cap_piece, cap_color, capture_sq);
            captured = Some(cap_piece);
        } else if m.is_capture() {
            let (cap_color, cap_piece) =
                self.piece_at(to).expect("make: capture without a target");
            self.remove_piece(to, cap_color, cap_piece);
            hash ^= piece_key(cap_piece, cap_color, to);
            captured = Some(cap_piece);
        }

        // Drop the mover (or its promotion) on the to-square
        let placed = m.promotion_piece().unwrap_or(piece);
        self.set_piece(to, color, placed);
        hash ^= piece_key(placed, color, to);

        // Castling additionally relocates the rook
        if m.is_castling() {
            let (rook_from_file, rook_to_file) = if m.is_castle_kingside() {
                (7, 5)
            } else {
                (0, 3)
            };
            let rook_from = Square::new(to.rank(), rook_from_file);
            let rook_to = Square::new(to.rank(), rook_to_file);
            self.remove_piece(rook_from, color, Piece::Rook);
            self.set_piece(rook_to, color, Piece::Rook);
            hash ^= piece_key(Piece::Rook, color, rook_from);
            hash ^= piece_key(Piece::Rook, color, rook_to);
        }

        // Castling rights survive only if neither endpoint touches a king or
        // rook origin square
        let new_rights = self.castling_rights
            & castling_rights_mask(from.as_index())
            & castling_rights_mask(to.as_index());
        if new_rights != self.castling_rights {
            hash ^= ZOBRIST.castling_keys[self.castling_rights as usize];
            hash ^= ZOBRIST.castling_keys[new_rights as usize];
            self.castling_rights = new_rights;
        }

        // En passant target: set on a double push, cleared otherwise
        if let Some(old_ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_keys[old_ep.as_index()];
        }
        self.en_passant_target = if m.is_double_pawn_push() {
            let ep = from.pawn_forward(is_white);
            hash ^= ZOBRIST.en_passant_keys[ep.as_index()];
            Some(ep)
        } else {
            None
        };

        if piece == Piece::Pawn || m.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if !is_white {
            self.fullmove_number += 1;
        }

        self.white_to_move = !self.white_to_move;
        hash ^= ZOBRIST.side_key;

        self.hash = hash;
        self.key_history.push(hash);

        // Accumulator: king moves, promotions and castling change the feature
        // frame (king bucket, mirror) or several pieces at once; a refresh is
        // simpler and they are rare. Everything else updates incrementally.
        let mut nnue_refreshed = false;
        if let Some((acc, net)) = nnue {
            if piece == Piece::King || m.is_promotion() || m.is_castling() {
                acc.refresh(self, net);
                nnue_refreshed = true;
            } else {
                acc.move_piece(color, piece, from, to, self, net);
                if let Some(cap_piece) = captured {
                    acc.sub_piece(color.opponent(), cap_piece, capture_sq, self, net);
                }
            }
        }

        UnmakeInfo {
            captured,
            previous_en_passant,
            previous_castling_rights,
            previous_halfmove_clock,
            previous_hash,
            nnue_refreshed,
        }
    }

    fn revert_move(
        &mut self,
        m: Move,
        info: &UnmakeInfo,
        nnue: Option<(&mut Accumulator, &Network)>,
    ) {
        self.key_history.pop();
        self.white_to_move = !self.white_to_move;

        let color = self.side_to_move();
        let is_white = color == Color::White;
        let from = m.from();
        let to = m.to();

        self.en_passant_target = info.previous_en_passant;
        self.castling_rights = info.previous_castling_rights;
        self.halfmove_clock = info.previous_halfmove_clock;
        self.hash = info.previous_hash;
        if !is_white {
            self.fullmove_number -= 1;
        }

        let capture_sq = if m.is_en_passant() {
            to.pawn_forward(!is_white)
        } else {
            to
        };

        let mut mover = Piece::King;
        if m.is_castling() {
            self.remove_piece(to, color, Piece::King);
            self.set_piece(from, color, Piece::King);
            let (rook_from_file, rook_to_file) = if m.is_castle_kingside() {
                (7, 5)
            } else {
                (0, 3)
            };
            self.remove_piece(Square::new(to.rank(), rook_to_file), color, Piece::Rook);
            self.set_piece(Square::new(to.rank(), rook_from_file), color, Piece::Rook);
        } else {
            let (_, placed) = self.piece_at(to).expect("unmake: to-square empty");
            self.remove_piece(to, color, placed);
            mover = if m.is_promotion() { Piece::Pawn } else { placed };
            self.set_piece(from, color, mover);
            if let Some(cap_piece) = info.captured {
                self.set_piece(capture_sq, color.opponent(), cap_piece);
            }
        }

        if let Some((acc, net)) = nnue {
            if info.nnue_refreshed {
                acc.refresh(self, net);
            } else {
                acc.move_piece(color, mover, to, from, self, net);
                if let Some(cap_piece) = info.captured {
                    acc.add_piece(color.opponent(), cap_piece, capture_sq, self, net);
                }
            }
        }
    }
}
