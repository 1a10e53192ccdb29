use super::super::attack_tables::{bishop_attacks, queen_attacks, rook_attacks};
use super::super::{Bitboard, Move, MoveList, Square};
use crate::board::Board;

#[derive(Clone, Copy)]
pub(crate) enum SliderType {
    Bishop,
    Rook,
    Queen,
}

impl Board {
    pub(crate) fn generate_slider_moves(
        &self,
        from: Square,
        slider: SliderType,
        moves: &mut MoveList,
        captures_only: bool,
    ) {
        let color = self.side_to_move();
        let occ = self.all_occupied.0;
        let attacks = match slider {
            SliderType::Bishop => bishop_attacks(from.as_index(), occ),
            SliderType::Rook => rook_attacks(from.as_index(), occ),
            SliderType::Queen => queen_attacks(from.as_index(), occ),
        };
        let mut targets = Bitboard(attacks & !self.occupied[color.index()].0);
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
