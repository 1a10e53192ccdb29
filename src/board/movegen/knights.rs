use super::super::attack_tables::KNIGHT_ATTACKS;
use super::super::{Bitboard, Move, MoveList, Square};
use crate::board::Board;

impl Board {
    pub(crate) fn generate_knight_moves(
        &self,
        from: Square,
        moves: &mut MoveList,
        captures_only: bool,
    ) {
        let color = self.side_to_move();
        let mut targets =
            Bitboard(KNIGHT_ATTACKS[from.as_index()] & !self.occupied[color.index()].0);
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
    }
}
