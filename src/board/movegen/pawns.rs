use super::super::attack_tables::PAWN_ATTACKS;
use super::super::{Bitboard, Color, Move, MoveList, Square, PROMOTION_PIECES};
use crate::board::Board;

impl Board {
    pub(crate) fn generate_pawn_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.side_to_move();
        let is_white = color == Color::White;
        let start_rank = if is_white { 1 } else { 6 };
        let promotion_rank = if is_white { 7 } else { 0 };

        let forward = from.pawn_forward(is_white);
        if self.is_empty_square(forward) {
            if forward.rank() == promotion_rank {
                for promo in PROMOTION_PIECES {
                    moves.push(Move::promotion(from, forward, promo, false));
                }
            } else {
                moves.push(Move::quiet(from, forward));
                if from.rank() == start_rank {
                    let double = forward.pawn_forward(is_white);
                    if self.is_empty_square(double) {
                        moves.push(Move::double_pawn_push(from, double));
                    }
                }
            }
        }

        self.generate_pawn_captures(from, color, promotion_rank, moves);
    }

    /// Quiescence variant: captures, en passant, and every promotion.
    pub(crate) fn generate_pawn_tactical_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.side_to_move();
        let is_white = color == Color::White;
        let promotion_rank = if is_white { 7 } else { 0 };

        let forward = from.pawn_forward(is_white);
        if forward.rank() == promotion_rank && self.is_empty_square(forward) {
            for promo in PROMOTION_PIECES {
                moves.push(Move::promotion(from, forward, promo, false));
            }
        }

        self.generate_pawn_captures(from, color, promotion_rank, moves);
    }

    fn generate_pawn_captures(
        &self,
        from: Square,
        color: Color,
        promotion_rank: usize,
        moves: &mut MoveList,
    ) {
        let targets = Bitboard(PAWN_ATTACKS[color.index()][from.as_index()]);
        for to in targets.iter() {
            if let Some((target_color, _)) = self.piece_at(to) {
                if target_color != color {
                    if to.rank() == promotion_rank {
                        for promo in PROMOTION_PIECES {
                            moves.push(Move::promotion(from, to, promo, true));
                        }
                    } else {
                        moves.push(Move::capture(from, to));
                    }
                }
            } else if Some(to) == self.en_passant_target {
                moves.push(Move::en_passant(from, to));
            }
        }
    }
}
