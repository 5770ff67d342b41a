//! Piece placement.

use crate::movegen::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use crate::Bitboard;
use chess_core::{Color, File, Move, Piece, Square};

/// Piece placement as twelve bitboards indexed by `[color][piece]`.
///
/// No square is set in more than one bitboard. This is the only part of a
/// position the legality probe copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    pieces: [[Bitboard; 6]; 2],
}

/// What a move did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MoveEffect {
    pub moved: Piece,
    pub captured: Option<Piece>,
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
        }
    }

    /// Returns the squares holding `color`'s pieces of type `piece`.
    #[inline]
    pub fn pieces(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Returns every square holding a `color` piece.
    #[inline]
    pub fn color(&self, color: Color) -> Bitboard {
        self.pieces[color.index()]
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb)
    }

    /// Returns every occupied square.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.color(Color::White) | self.color(Color::Black)
    }

    /// Returns the piece and color at the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        Color::ALL.into_iter().find_map(|color| {
            Piece::ALL
                .into_iter()
                .find(|&piece| self.pieces(piece, color).contains(sq))
                .map(|piece| (piece, color))
        })
    }

    /// Places a piece on a square assumed to be empty.
    #[inline]
    pub fn put(&mut self, piece: Piece, color: Color, sq: Square) {
        self.pieces[color.index()][piece.index()].set(sq);
    }

    /// Empties a square, returning what stood there.
    pub fn remove(&mut self, sq: Square) -> Option<(Piece, Color)> {
        let found = self.piece_at(sq)?;
        self.pieces[found.1.index()][found.0.index()].clear(sq);
        Some(found)
    }

    /// Returns the square of `color`'s king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(Piece::King, color).lsb()
    }

    /// Returns true if any `by` piece attacks `sq`.
    ///
    /// Pawn attackers are found by looking from `sq` with the defender's
    /// capture mask, since pawn captures are not symmetric.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        if (king_attacks(sq) & self.pieces(Piece::King, by)).is_not_empty() {
            return true;
        }
        if (knight_attacks(sq) & self.pieces(Piece::Knight, by)).is_not_empty() {
            return true;
        }
        if (pawn_attacks(sq, by.opposite()) & self.pieces(Piece::Pawn, by)).is_not_empty() {
            return true;
        }

        let occupied = self.occupied();
        let queens = self.pieces(Piece::Queen, by);
        let diagonal = self.pieces(Piece::Bishop, by) | queens;
        if (bishop_attacks(sq, occupied) & diagonal).is_not_empty() {
            return true;
        }
        let straight = self.pieces(Piece::Rook, by) | queens;
        (rook_attacks(sq, occupied) & straight).is_not_empty()
    }

    /// Returns true if `color`'s king is attacked. A board without that
    /// king is never in check.
    #[inline]
    pub fn is_king_attacked(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|sq| self.is_attacked(sq, color.opposite()))
    }

    /// Moves pieces for `m` played by `us`.
    ///
    /// Handles captures, the rook hop of castling (a king moving two files),
    /// the en-passant victim behind the destination and promotion. Returns
    /// `None` and leaves the board alone when `us` has no piece on the
    /// source square.
    pub(crate) fn apply(
        &mut self,
        m: Move,
        us: Color,
        en_passant: Option<Square>,
    ) -> Option<MoveEffect> {
        let from = m.from();
        let to = m.to();
        let moved = match self.piece_at(from) {
            Some((piece, color)) if color == us && from != to => piece,
            _ => return None,
        };
        let them = us.opposite();

        let captured = match self.remove(to) {
            Some((piece, color)) if color == them => Some(piece),
            _ => None,
        };

        let path = Bitboard::from_square(from) | Bitboard::from_square(to);
        self.pieces[us.index()][moved.index()] ^= path;

        match moved {
            Piece::Pawn => {
                let captured = if captured.is_none()
                    && Some(to) == en_passant
                    && from.file() != to.file()
                {
                    let behind = to.offset(0, -us.pawn_push().signum());
                    behind.map(|victim| {
                        self.pieces[them.index()][Piece::Pawn.index()].clear(victim);
                        Piece::Pawn
                    })
                } else {
                    captured
                };

                if let Some(promoted) = m.promotion_piece() {
                    if to.rank().index() == them.back_rank() {
                        self.pieces[us.index()][Piece::Pawn.index()].clear(to);
                        self.put(promoted, us, to);
                    }
                }

                Some(MoveEffect { moved, captured })
            }
            Piece::King if from.file().index().abs_diff(to.file().index()) == 2 => {
                let rank = to.rank();
                let (rook_from, rook_to) = if to.file() == File::G {
                    (Square::new(File::H, rank), Square::new(File::F, rank))
                } else {
                    (Square::new(File::A, rank), Square::new(File::D, rank))
                };
                if self.pieces(Piece::Rook, us).contains(rook_from) {
                    self.pieces[us.index()][Piece::Rook.index()] ^=
                        Bitboard::from_square(rook_from) | Bitboard::from_square(rook_to);
                }
                Some(MoveEffect { moved, captured })
            }
            _ => Some(MoveEffect { moved, captured }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn put_remove_and_lookup() {
        let mut board = Board::empty();
        board.put(Piece::Queen, Color::Black, sq("d8"));
        assert_eq!(board.piece_at(sq("d8")), Some((Piece::Queen, Color::Black)));
        assert_eq!(board.occupied().count(), 1);
        assert_eq!(board.remove(sq("d8")), Some((Piece::Queen, Color::Black)));
        assert_eq!(board.remove(sq("d8")), None);
        assert!(board.occupied().is_empty());
    }

    #[test]
    fn attacks_by_each_piece_type() {
        let mut board = Board::empty();
        board.put(Piece::Pawn, Color::Black, sq("e5"));
        board.put(Piece::Knight, Color::Black, sq("b1"));
        board.put(Piece::Rook, Color::Black, sq("h8"));
        board.put(Piece::Bishop, Color::Black, sq("a8"));

        // Black pawns capture downward, so e5 hits d4/f4 but not d6.
        assert!(board.is_attacked(sq("d4"), Color::Black));
        assert!(board.is_attacked(sq("f4"), Color::Black));
        assert!(!board.is_attacked(sq("d6"), Color::Black));

        assert!(board.is_attacked(sq("c3"), Color::Black));
        assert!(board.is_attacked(sq("h1"), Color::Black));
        assert!(board.is_attacked(sq("g2"), Color::Black));
        assert!(!board.is_attacked(sq("g2"), Color::White));
    }

    #[test]
    fn sliders_are_blocked() {
        let mut board = Board::empty();
        board.put(Piece::Rook, Color::White, sq("a1"));
        board.put(Piece::Pawn, Color::White, sq("a4"));
        assert!(board.is_attacked(sq("a4"), Color::White));
        assert!(!board.is_attacked(sq("a5"), Color::White));
    }

    #[test]
    fn apply_ignores_empty_source() {
        let mut board = Board::empty();
        board.put(Piece::King, Color::White, sq("e1"));
        let before = board;
        assert_eq!(
            board.apply(Move::normal(sq("e2"), sq("e4")), Color::White, None),
            None
        );
        assert_eq!(
            board.apply(Move::normal(sq("e1"), sq("e2")), Color::Black, None),
            None
        );
        assert_eq!(board, before);
    }

    #[test]
    fn apply_en_passant_removes_pawn_behind() {
        let mut board = Board::empty();
        board.put(Piece::Pawn, Color::White, sq("e5"));
        board.put(Piece::Pawn, Color::Black, sq("d5"));
        let effect = board.apply(
            Move::normal(sq("e5"), sq("d6")),
            Color::White,
            Some(sq("d6")),
        );
        assert_eq!(
            effect,
            Some(MoveEffect {
                moved: Piece::Pawn,
                captured: Some(Piece::Pawn)
            })
        );
        assert_eq!(board.piece_at(sq("d5")), None);
        assert_eq!(board.piece_at(sq("d6")), Some((Piece::Pawn, Color::White)));
    }

    #[test]
    fn apply_castling_moves_rook() {
        let mut board = Board::empty();
        board.put(Piece::King, Color::Black, Square::E8);
        board.put(Piece::Rook, Color::Black, Square::A8);
        board.apply(Move::normal(Square::E8, Square::C8), Color::Black, None);
        assert_eq!(board.piece_at(Square::C8), Some((Piece::King, Color::Black)));
        assert_eq!(board.piece_at(Square::D8), Some((Piece::Rook, Color::Black)));
        assert_eq!(board.piece_at(Square::A8), None);
    }

    #[test]
    fn apply_underpromotion_with_capture() {
        let mut board = Board::empty();
        board.put(Piece::Pawn, Color::White, sq("g7"));
        board.put(Piece::Rook, Color::Black, Square::H8);
        let effect = board.apply(
            Move::promotion(sq("g7"), Square::H8, Piece::Knight),
            Color::White,
            None,
        );
        assert_eq!(effect.and_then(|e| e.captured), Some(Piece::Rook));
        assert_eq!(board.piece_at(Square::H8), Some((Piece::Knight, Color::White)));
        assert!(board.pieces(Piece::Pawn, Color::White).is_empty());
    }
}
