//! Board squares.

use std::fmt;
use std::str::FromStr;

use crate::board::error::SquareError;

/// A board square packed into a 0-63 index, rank-major from white's side:
/// a1 is 0, h1 is 7, a8 is 56, h8 is 63.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Square(u8);

impl Square {
    /// Build a square from rank and file, both 0-7. Out-of-range inputs are
    /// the caller's bug.
    #[inline]
    #[must_use]
    pub const fn new(rank: usize, file: usize) -> Self {
        Square((rank * 8 + file) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        Square(idx as u8)
    }

    #[inline]
    #[must_use]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }

    /// Rank 0-7, where 0 is white's back rank.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        (self.0 >> 3) as usize
    }

    /// File 0-7, where 0 is the a-file.
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 & 7) as usize
    }

    /// Swap the first and eighth ranks (a1 <-> a8).
    #[inline]
    #[must_use]
    pub const fn flip_vertical(self) -> Self {
        Square(self.0 ^ 56)
    }

    /// Swap the a- and h-files within a rank (a1 <-> h1).
    #[inline]
    #[must_use]
    pub const fn mirror_horizontal(self) -> Self {
        Square(self.0 ^ 7)
    }

    /// One rank towards the opponent for a pawn of the given color. Callers
    /// guarantee the pawn is not standing on its promotion rank.
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_forward(self, is_white: bool) -> Self {
        if is_white {
            Square(self.0 + 8)
        } else {
            Square(self.0 - 8)
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + (self.0 & 7)) as char;
        let rank = (b'1' + (self.0 >> 3)) as char;
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match *s.as_bytes() {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Ok(Square::new(
                (rank - b'1') as usize,
                (file - b'a') as usize,
            )),
            _ => Err(SquareError::InvalidNotation {
                notation: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_match_the_rank_major_layout() {
        assert_eq!(Square::new(0, 0).as_index(), 0); // a1
        assert_eq!(Square::new(0, 7).as_index(), 7); // h1
        assert_eq!(Square::new(7, 0).as_index(), 56); // a8
        assert_eq!(Square::from_index(63), Square::new(7, 7)); // h8
        assert_eq!(Square::new(3, 4).rank(), 3);
        assert_eq!(Square::new(3, 4).file(), 4);
    }

    #[test]
    fn flips_are_involutions() {
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            assert_eq!(sq.flip_vertical().flip_vertical(), sq);
            assert_eq!(sq.mirror_horizontal().mirror_horizontal(), sq);
            assert_eq!(sq.flip_vertical().file(), sq.file());
            assert_eq!(sq.mirror_horizontal().rank(), sq.rank());
        }
        assert_eq!(Square::new(0, 2).flip_vertical(), Square::new(7, 2));
        assert_eq!(Square::new(4, 1).mirror_horizontal(), Square::new(4, 6));
    }

    #[test]
    fn pawn_forward_depends_on_color() {
        let e2 = Square::new(1, 4);
        assert_eq!(e2.pawn_forward(true), Square::new(2, 4));
        let d7 = Square::new(6, 3);
        assert_eq!(d7.pawn_forward(false), Square::new(5, 3));
    }

    #[test]
    fn algebraic_notation_round_trips() {
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            assert_eq!(sq.to_string().parse::<Square>().unwrap(), sq);
        }
    }

    #[test]
    fn bad_notation_is_rejected() {
        for bad in ["", "e", "e4x", "i4", "e9", "44", "ee"] {
            assert!(bad.parse::<Square>().is_err(), "accepted '{bad}'");
        }
    }
}
