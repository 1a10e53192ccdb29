use super::super::attack_tables::KING_ATTACKS;
use super::super::{Bitboard, Color, Move, MoveList, Piece, Square};
use crate::board::Board;

impl Board {
    pub(crate) fn generate_king_moves(
        &self,
        from: Square,
        moves: &mut MoveList,
        captures_only: bool,
    ) {
        let color = self.side_to_move();
        let mut targets =
            Bitboard(KING_ATTACKS[from.as_index()] & !self.occupied[color.index()].0);
        if captures_only {
            targets.0 &= self.occupied[color.opponent().index()].0;
        }
        for to in targets.iter() {
            if self.is_empty_square(to) {
                moves.push(Move::quiet(from, to));
            } else {
                moves.push(Move::capture(from, to));
            }
        }

        if !captures_only {
            self.generate_castling_moves(from, color, moves);
        }
    }

    /// Castling requires the right, empty squares between king and rook, the
    /// rook on its origin, and that the king neither starts on, crosses, nor
    /// lands on an attacked square.
    fn generate_castling_moves(&self, from: Square, color: Color, moves: &mut MoveList) {
        let back_rank = if color == Color::White { 0 } else { 7 };
        if from != Square::new(back_rank, 4) {
            return;
        }
        let opponent = color.opponent();

        if self.has_castling_right(color, true)
            && self.is_empty_square(Square::new(back_rank, 5))
            && self.is_empty_square(Square::new(back_rank, 6))
            && self.piece_at(Square::new(back_rank, 7)) == Some((color, Piece::Rook))
            && !self.is_square_attacked(from, opponent)
            && !self.is_square_attacked(Square::new(back_rank, 5), opponent)
            && !self.is_square_attacked(Square::new(back_rank, 6), opponent)
        {
            moves.push(Move::castle_kingside(from, Square::new(back_rank, 6)));
        }

        if self.has_castling_right(color, false)
            && self.is_empty_square(Square::new(back_rank, 1))
            && self.is_empty_square(Square::new(back_rank, 2))
            && self.is_empty_square(Square::new(back_rank, 3))
            && self.piece_at(Square::new(back_rank, 0)) == Some((color, Piece::Rook))
            && !self.is_square_attacked(from, opponent)
            && !self.is_square_attacked(Square::new(back_rank, 3), opponent)
            && !self.is_square_attacked(Square::new(back_rank, 2), opponent)
        {
            moves.push(Move::castle_queenside(from, Square::new(back_rank, 2)));
        }
    }
}
