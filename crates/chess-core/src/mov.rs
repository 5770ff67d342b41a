//! Move representation.

use crate::{ParseError, Piece, Square};
use std::fmt;
use std::str::FromStr;

/// A chess move: source, destination and optional promotion piece.
///
/// Encoded in 16 bits: 6 bits source, 6 bits destination, 3 bits promotion
/// (the promoted piece's index, 0 when there is none). Castling is written as
/// the king's two-square move and en passant as the pawn's diagonal step;
/// the position decides what a move means.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// "No move played". Source and destination are the same square, which
    /// no real move has.
    pub const NULL: Move = Move(0);

    /// Creates a move with an optional promotion piece.
    #[inline]
    pub const fn new(from: Square, to: Square, promotion: Option<Piece>) -> Self {
        let promo = match promotion {
            Some(piece) => piece.index() as u16,
            None => 0,
        };
        Move((from.index() as u16) | ((to.index() as u16) << 6) | (promo << 12))
    }

    /// Creates a move without promotion.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, None)
    }

    /// Creates a promotion move.
    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: Piece) -> Self {
        Self::new(from, to, Some(piece))
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        // SAFETY: masked to 6 bits
        unsafe { Square::from_index_unchecked((self.0 & 0x3F) as u8) }
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        // SAFETY: masked to 6 bits
        unsafe { Square::from_index_unchecked(((self.0 >> 6) & 0x3F) as u8) }
    }

    /// Returns the piece a pawn promotes to, if any.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match (self.0 >> 12) & 0x7 {
            1 => Some(Piece::Knight),
            2 => Some(Piece::Bishop),
            3 => Some(Piece::Rook),
            4 => Some(Piece::Queen),
            _ => None,
        }
    }

    /// Returns true for the null move.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.from().index() == self.to().index()
    }

    /// Returns the coordinate notation (e.g. "e2e4", "e7e8q", "0000").
    pub fn to_uci(self) -> String {
        self.to_string()
    }

    /// Parses coordinate notation: `<file><rank><file><rank>[nbrq]`, or
    /// `0000` for the null move.
    pub fn from_uci(s: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidMove(s.to_string());
        if s == "0000" {
            return Ok(Move::NULL);
        }
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(invalid());
        }
        let from = Square::from_algebraic(&s[0..2]).ok_or_else(invalid)?;
        let to = Square::from_algebraic(&s[2..4]).ok_or_else(invalid)?;
        if from == to {
            return Err(invalid());
        }
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(piece) if piece.is_promotion_target() => Some(piece),
                _ => return Err(invalid()),
            },
        };
        Ok(Move::new(from, to, promotion))
    }
}

impl Default for Move {
    fn default() -> Self {
        Move::NULL
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_uci(s)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(piece) = self.promotion_piece() {
            write!(f, "{}", piece.to_char())?;
        }
        Ok(())
    }
}
