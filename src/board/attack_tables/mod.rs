//! Attack tables for move generation.
//!
//! Sliding pieces use magic bitboards: per-square perfect-hash tables built at
//! startup by a randomized magic-number search, with on-the-fly ray walking as
//! a correctness fallback for any square whose search fails. Leaper attacks
//! (pawn, knight, king) are precomputed by direct geometry.

mod magics;
mod tables;

pub(crate) use magics::{bishop_attacks, bishop_rays, queen_attacks, rook_attacks, rook_rays};
pub(crate) use tables::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};
