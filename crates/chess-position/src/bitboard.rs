//! 64-bit square sets.
//!
//! Bit `i` stands for the square with index `i`, so a1 is the lowest bit and
//! h8 the highest. Bit scans return [`Square::NONE_INDEX`] on an empty set,
//! which every lookup table accepts as an index.

use chess_core::Square;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// A set of squares.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);
    pub const RANK_2: Bitboard = Bitboard(0x0000_0000_0000_FF00);
    pub const RANK_7: Bitboard = Bitboard(0x00FF_0000_0000_0000);

    /// Squares sharing h1's color.
    pub const LIGHT_SQUARES: Bitboard = Bitboard(0x55AA_55AA_55AA_55AA);

    #[inline]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(sq.bitboard())
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Number of squares in the set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & sq.bitboard() != 0
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= sq.bitboard();
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !sq.bitboard();
    }

    /// Index of the lowest set bit, or [`Square::NONE_INDEX`] when empty.
    #[inline]
    pub const fn forward_scan(self) -> usize {
        // trailing_zeros of 0 is 64, which is the sentinel.
        self.0.trailing_zeros() as usize
    }

    /// Index of the highest set bit, or [`Square::NONE_INDEX`] when empty.
    #[inline]
    pub const fn reverse_scan(self) -> usize {
        match self.0 {
            0 => Square::NONE_INDEX,
            bits => 63 - bits.leading_zeros() as usize,
        }
    }

    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        Square::from_index(self.forward_scan() as u8)
    }

    /// Removes and returns the lowest square.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    /// One rank up; rank 8 falls off.
    #[inline]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    /// One rank down; rank 1 falls off.
    #[inline]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    /// One file towards h; the h-file falls off instead of wrapping.
    #[inline]
    pub const fn east(self) -> Bitboard {
        Bitboard((self.0 & !Self::FILE_H.0) << 1)
    }

    /// One file towards a; the a-file falls off instead of wrapping.
    #[inline]
    pub const fn west(self) -> Bitboard {
        Bitboard((self.0 & !Self::FILE_A.0) >> 1)
    }
}

macro_rules! impl_bit_op {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $tok:tt) => {
        impl $op for Bitboard {
            type Output = Bitboard;
            #[inline]
            fn $method(self, rhs: Bitboard) -> Bitboard {
                Bitboard(self.0 $tok rhs.0)
            }
        }

        impl $assign for Bitboard {
            #[inline]
            fn $assign_method(&mut self, rhs: Bitboard) {
                *self = $op::$method(*self, rhs);
            }
        }
    };
}

impl_bit_op!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
impl_bit_op!(BitOr, bitor, BitOrAssign, bitor_assign, |);
impl_bit_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#018x})", self.0)?;
        for rank in (0..8u8).rev() {
            let row: String = (0..8u8)
                .map(|file| {
                    let set = Square::from_index(rank * 8 + file).is_some_and(|sq| self.contains(sq));
                    if set {
                        " X"
                    } else {
                        " ."
                    }
                })
                .collect();
            writeln!(f, "{}{row}", rank + 1)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

/// Iterator over the squares of a bitboard, lowest index first.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> BitboardIter {
        BitboardIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Bitboard::EMPTY, |bb, sq| bb | Bitboard::from_square(sq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};

    #[test]
    fn count_masks() {
        assert_eq!(Bitboard::EMPTY.count(), 0);
        assert_eq!((!Bitboard::EMPTY).count(), 64);
        assert_eq!(Bitboard::FILE_A.count(), 8);
        assert_eq!(Bitboard::RANK_7.count(), 8);
        assert_eq!(Bitboard::LIGHT_SQUARES.count(), 32);
    }

    #[test]
    fn light_squares_match_square_color() {
        for index in 0..64 {
            let sq = Square::from_index(index).unwrap();
            assert_eq!(Bitboard::LIGHT_SQUARES.contains(sq), sq.is_light());
        }
    }

    #[test]
    fn scans_return_sentinel_when_empty() {
        assert_eq!(Bitboard::EMPTY.forward_scan(), Square::NONE_INDEX);
        assert_eq!(Bitboard::EMPTY.reverse_scan(), Square::NONE_INDEX);
        assert_eq!(Bitboard::EMPTY.lsb(), None);
    }

    #[test]
    fn scans_find_extreme_bits() {
        let bb = Bitboard::new(0b1010_0100);
        assert_eq!(bb.forward_scan(), 2);
        assert_eq!(bb.reverse_scan(), 7);
        assert_eq!(bb.lsb(), Some(Square::C1));
    }

    #[test]
    fn shifts_drop_squares_at_the_edge() {
        let a1 = Bitboard::from_square(Square::A1);
        let h1 = Bitboard::from_square(Square::H1);
        assert!(a1.north().contains(Square::new(File::A, Rank::R2)));
        assert!(a1.east().contains(Square::B1));
        assert!(a1.west().is_empty());
        assert!(h1.east().is_empty());
        assert!(Bitboard::from_square(Square::A8).north().is_empty());
        assert!(a1.south().is_empty());
        assert_eq!(Bitboard::FILE_H.west().count(), 8);
    }

    #[test]
    fn set_and_clear() {
        let mut bb = Bitboard::EMPTY;
        bb.set(Square::E8);
        bb.set(Square::E8);
        assert_eq!(bb.count(), 1);
        bb.clear(Square::E8);
        assert!(bb.is_empty());
    }

    #[test]
    fn operators() {
        let a = Bitboard::new(0b1100);
        let b = Bitboard::new(0b1010);
        assert_eq!(a & b, Bitboard::new(0b1000));
        assert_eq!(a | b, Bitboard::new(0b1110));
        assert_eq!(a ^ b, Bitboard::new(0b0110));
        assert_eq!((!a).count(), 62);

        let mut c = a;
        c ^= b;
        c |= Bitboard::new(1);
        c &= Bitboard::new(0b0111);
        assert_eq!(c, Bitboard::new(0b0111));
    }

    #[test]
    fn iterate_pop_and_collect() {
        let squares: Vec<Square> = Bitboard::FILE_A.into_iter().collect();
        assert_eq!(squares.len(), 8);
        assert_eq!(squares[0], Square::A1);
        assert_eq!(squares[7], Square::A8);
        assert_eq!(squares.into_iter().collect::<Bitboard>(), Bitboard::FILE_A);

        let mut bb = Bitboard::new(0b1010);
        assert_eq!(bb.pop_lsb().map(|s| s.index()), Some(1));
        assert_eq!(bb.pop_lsb().map(|s| s.index()), Some(3));
        assert_eq!(bb.pop_lsb(), None);
    }

    #[test]
    fn debug_grid() {
        let text = format!("{:?}", Bitboard::from_square(Square::H8));
        assert!(text.contains("8 . . . . . . . X"));
    }
}
