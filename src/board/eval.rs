//! Classical fallback evaluation: tapered material + piece-square tables.
//!
//! Used when no NNUE network is loaded. Exactly antisymmetric under vertical
//! mirror with colors swapped, because black indexes the same tables through
//! `sq ^ 56`.

use super::pst::{MATERIAL_EG, MATERIAL_MG, PHASE_TOTAL, PHASE_WEIGHTS, PST_EG, PST_MG};
use super::{Board, Color, ALL_PIECES};

impl Board {
    /// Static evaluation in centipawns from the side-to-move's perspective.
    #[must_use]
    pub fn classical_eval(&self) -> i32 {
        let mut mg = [0i32; 2];
        let mut eg = [0i32; 2];
        let mut phase = 0i32;

        for color in [Color::White, Color::Black] {
            let c = color.index();
            for piece in ALL_PIECES {
                let p = piece.index();
                for sq in self.pieces[c][p].iter() {
                    let pst_sq = if color == Color::White {
                        sq.as_index()
                    } else {
                        sq.as_index() ^ 56
                    };
                    mg[c] += MATERIAL_MG[p] + PST_MG[p][pst_sq];
                    eg[c] += MATERIAL_EG[p] + PST_EG[p][pst_sq];
                    phase += PHASE_WEIGHTS[p];
                }
            }
        }

        let phase = phase.min(PHASE_TOTAL);
        let mg_score = mg[0] - mg[1];
        let eg_score = eg[0] - eg[1];
        let white_score =
            (mg_score * phase + eg_score * (PHASE_TOTAL - phase)) / PHASE_TOTAL;

        if self.white_to_move {
            white_score
        } else {
            -white_score
        }
    }
}
