//! FEN parsing and printing, and long-algebraic move parsing.

use super::error::{FenError, MoveParseError};
use super::{
    Board, Color, Move, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K,
    CASTLE_WHITE_Q,
};

impl Board {
    /// Parse a board position from FEN notation.
    ///
    /// Returns an error if the FEN string is invalid; no board is produced in
    /// that case.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        // Piece placement, rank 8 first
        for (rank_idx, rank_str) in parts[0].split('/').enumerate() {
            if rank_idx >= 8 {
                return Err(FenError::InvalidRank { rank: rank_idx });
            }
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let color = if c.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::TooManyFiles {
                            rank: rank_idx,
                            files: file + 1,
                        });
                    }
                    board.set_piece(Square::new(7 - rank_idx, file), color, piece);
                    file += 1;
                }
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = board.pieces[color.index()][Piece::King.index()].popcount();
            if kings != 1 {
                return Err(FenError::BadKingCount {
                    color: if color == Color::White { "white" } else { "black" },
                    count: kings,
                });
            }
        }

        match parts[1] {
            "w" => board.white_to_move = true,
            "b" => board.white_to_move = false,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        }

        for c in parts[2].chars() {
            match c {
                'K' => board.castling_rights |= CASTLE_WHITE_K,
                'Q' => board.castling_rights |= CASTLE_WHITE_Q,
                'k' => board.castling_rights |= CASTLE_BLACK_K,
                'q' => board.castling_rights |= CASTLE_BLACK_Q,
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }

        board.en_passant_target = if parts[3] == "-" {
            None
        } else {
            match parts[3].parse::<Square>() {
                Ok(sq) => Some(sq),
                Err(_) => {
                    return Err(FenError::InvalidEnPassant {
                        found: parts[3].to_string(),
                    })
                }
            }
        };

        if parts.len() >= 5 {
            board.halfmove_clock = parts[4].parse().unwrap_or(0);
        }
        if parts.len() >= 6 {
            board.fullmove_number = parts[5].parse().unwrap_or(1).max(1);
        }

        board.hash = board.calculate_hash();
        board.key_history.clear();
        board.key_history.push(board.hash);
        Ok(board)
    }

    /// Parse a board position from FEN notation, panicking on invalid input.
    /// Intended for tests and fixed positions; use `try_from_fen` elsewhere.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        match Board::try_from_fen(fen) {
            Ok(board) => board,
            Err(err) => panic!("invalid FEN '{fen}': {err}"),
        }
    }

    /// Render the position as a six-field FEN string.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(Square::new(rank, file)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            fen.push(char::from_digit(empty, 10).unwrap());
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from_digit(empty, 10).unwrap());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.white_to_move { 'w' } else { 'b' });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            if self.castling_rights & CASTLE_WHITE_K != 0 {
                fen.push('K');
            }
            if self.castling_rights & CASTLE_WHITE_Q != 0 {
                fen.push('Q');
            }
            if self.castling_rights & CASTLE_BLACK_K != 0 {
                fen.push('k');
            }
            if self.castling_rights & CASTLE_BLACK_Q != 0 {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant_target {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    /// Parse a long-algebraic move ("e2e4", "e7e8q") against the current
    /// legal move set.
    pub fn parse_move(&mut self, notation: &str) -> Result<Move, MoveParseError> {
        let len = notation.len();
        if !(4..=5).contains(&len) || !notation.is_ascii() {
            return Err(MoveParseError::InvalidLength { len });
        }

        let from: Square =
            notation[0..2]
                .parse()
                .map_err(|_| MoveParseError::InvalidSquare {
                    notation: notation.to_string(),
                })?;
        let to: Square = notation[2..4]
            .parse()
            .map_err(|_| MoveParseError::InvalidSquare {
                notation: notation.to_string(),
            })?;

        let promotion = match notation.chars().nth(4) {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(p @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
        };

        for &m in &self.legal_moves() {
            if m.from() == from && m.to() == to && m.promotion_piece() == promotion {
                return Ok(m);
            }
        }

        Err(MoveParseError::IllegalMove {
            notation: notation.to_string(),
        })
    }
}
