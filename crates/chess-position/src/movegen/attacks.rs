//! Precomputed attack and ray tables.
//!
//! Every table has 65 entries: one per square plus an empty entry at
//! [`Square::NONE_INDEX`], so the result of a bit-scan over an empty mask can
//! be used as an index directly.

use crate::Bitboard;
use chess_core::{Color, Square};
use std::sync::OnceLock;

const ENTRIES: usize = Square::COUNT + 1;

/// The eight compass directions a sliding piece can travel in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    /// Rook directions.
    pub const STRAIGHT: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Bishop directions.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// (file, rank) step.
    const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    /// Returns true if squares along this ray have increasing indices.
    ///
    /// The nearest blocker on such a ray is the lowest set bit; on the
    /// others it is the highest.
    #[inline]
    pub const fn is_increasing(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::NorthEast | Direction::East | Direction::NorthWest
        )
    }
}

/// Read-only movement masks, built once per process.
pub struct AttackTables {
    knight: [Bitboard; ENTRIES],
    king: [Bitboard; ENTRIES],
    pawn_push: [[Bitboard; ENTRIES]; 2],
    pawn_double_push: [[Bitboard; ENTRIES]; 2],
    pawn_captures: [[Bitboard; ENTRIES]; 2],
    spawn_rank: [Bitboard; 2],
    rays: [[Bitboard; ENTRIES]; 8],
}

static ATTACK_TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Gets the global attack tables, initializing if necessary.
pub fn tables() -> &'static AttackTables {
    ATTACK_TABLES.get_or_init(AttackTables::new)
}

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

fn step_mask(sq: Square, steps: &[(i8, i8)]) -> Bitboard {
    steps
        .iter()
        .filter_map(|&(df, dr)| sq.offset(df, dr))
        .fold(Bitboard::EMPTY, |bb, to| bb | Bitboard::from_square(to))
}

fn full_ray(sq: Square, dir: Direction) -> Bitboard {
    let (df, dr) = dir.delta();
    let mut ray = Bitboard::EMPTY;
    let mut cursor = sq.offset(df, dr);
    while let Some(next) = cursor {
        ray.set(next);
        cursor = next.offset(df, dr);
    }
    ray
}

impl AttackTables {
    fn new() -> Self {
        let mut tables = AttackTables {
            knight: [Bitboard::EMPTY; ENTRIES],
            king: [Bitboard::EMPTY; ENTRIES],
            pawn_push: [[Bitboard::EMPTY; ENTRIES]; 2],
            pawn_double_push: [[Bitboard::EMPTY; ENTRIES]; 2],
            pawn_captures: [[Bitboard::EMPTY; ENTRIES]; 2],
            spawn_rank: [Bitboard::RANK_2, Bitboard::RANK_7],
            rays: [[Bitboard::EMPTY; ENTRIES]; 8],
        };

        for index in 0..Square::COUNT as u8 {
            let Some(sq) = Square::from_index(index) else {
                continue;
            };
            let i = index as usize;
            let bb = Bitboard::from_square(sq);

            tables.knight[i] = step_mask(sq, &KNIGHT_STEPS);
            tables.king[i] = step_mask(sq, &KING_STEPS);

            let white_push = bb.north();
            let black_push = bb.south();
            tables.pawn_push[Color::White.index()][i] = white_push;
            tables.pawn_push[Color::Black.index()][i] = black_push;
            if Bitboard::RANK_2.contains(sq) {
                tables.pawn_double_push[Color::White.index()][i] = white_push.north();
            }
            if Bitboard::RANK_7.contains(sq) {
                tables.pawn_double_push[Color::Black.index()][i] = black_push.south();
            }
            tables.pawn_captures[Color::White.index()][i] = white_push.east() | white_push.west();
            tables.pawn_captures[Color::Black.index()][i] = black_push.east() | black_push.west();

            for dir in Direction::STRAIGHT.into_iter().chain(Direction::DIAGONAL) {
                tables.rays[dir as usize][i] = full_ray(sq, dir);
            }
        }

        tables
    }

    /// Knight destinations from `sq`.
    #[inline]
    pub fn knight(&self, sq: Square) -> Bitboard {
        self.knight[sq.index() as usize]
    }

    /// King destinations from `sq` (castling excluded).
    #[inline]
    pub fn king(&self, sq: Square) -> Bitboard {
        self.king[sq.index() as usize]
    }

    /// The square one step ahead of a `color` pawn on `sq`.
    #[inline]
    pub fn pawn_push(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_push[color.index()][sq.index() as usize]
    }

    /// The square two steps ahead of a `color` pawn on its spawn rank;
    /// empty anywhere else.
    #[inline]
    pub fn pawn_double_push(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_double_push[color.index()][sq.index() as usize]
    }

    /// The two diagonal squares a `color` pawn on `sq` captures on.
    #[inline]
    pub fn pawn_captures(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn_captures[color.index()][sq.index() as usize]
    }

    /// The rank `color` pawns start on. A pawn standing on the opponent's
    /// spawn rank promotes with its next step.
    #[inline]
    pub fn spawn_rank(&self, color: Color) -> Bitboard {
        self.spawn_rank[color.index()]
    }

    /// Full ray from `sq` (exclusive) to the board edge.
    #[inline]
    pub fn ray(&self, dir: Direction, sq: Square) -> Bitboard {
        self.rays[dir as usize][sq.index() as usize]
    }

    /// Index of the first occupied square along the ray, or
    /// [`Square::NONE_INDEX`] when the ray is clear.
    #[inline]
    pub fn nearest_blocker(&self, dir: Direction, sq: Square, occupied: Bitboard) -> usize {
        let blockers = self.ray(dir, sq) & occupied;
        if dir.is_increasing() {
            blockers.forward_scan()
        } else {
            blockers.reverse_scan()
        }
    }

    /// Squares reachable along one ray: everything up to and including the
    /// nearest blocker.
    #[inline]
    pub fn ray_attacks(&self, dir: Direction, sq: Square, occupied: Bitboard) -> Bitboard {
        let blocker = self.nearest_blocker(dir, sq, occupied);
        self.ray(dir, sq) ^ self.rays[dir as usize][blocker]
    }

    /// Bishop attacks for the given occupancy.
    pub fn bishop(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        Direction::DIAGONAL
            .into_iter()
            .fold(Bitboard::EMPTY, |bb, dir| bb | self.ray_attacks(dir, sq, occupied))
    }

    /// Rook attacks for the given occupancy.
    pub fn rook(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        Direction::STRAIGHT
            .into_iter()
            .fold(Bitboard::EMPTY, |bb, dir| bb | self.ray_attacks(dir, sq, occupied))
    }
}

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    tables().knight(sq)
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    tables().king(sq)
}

/// Returns the squares a `color` pawn on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    tables().pawn_captures(color, sq)
}

/// Returns bishop attacks from `sq` given the board occupancy.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().bishop(sq, occupied)
}

/// Returns rook attacks from `sq` given the board occupancy.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    tables().rook(sq, occupied)
}

/// Returns queen attacks from `sq` given the board occupancy.
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn squares(names: &[&str]) -> Bitboard {
        names
            .iter()
            .fold(Bitboard::EMPTY, |bb, s| bb | Bitboard::from_square(sq(s)))
    }

    #[test]
    fn knight_counts() {
        assert_eq!(knight_attacks(sq("d4")).count(), 8);
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(knight_attacks(sq("a4")).count(), 4);
        assert_eq!(
            knight_attacks(sq("e4")),
            squares(&["d6", "f6", "g5", "g3", "f2", "d2", "c3", "c5"])
        );
    }

    #[test]
    fn king_counts() {
        assert_eq!(king_attacks(sq("d4")).count(), 8);
        assert_eq!(king_attacks(Square::A1).count(), 3);
        assert_eq!(king_attacks(sq("a4")).count(), 5);
    }

    #[test]
    fn pawn_masks_are_directional() {
        let t = tables();
        let d4 = sq("d4");
        assert_eq!(pawn_attacks(d4, Color::White), squares(&["c5", "e5"]));
        assert_eq!(pawn_attacks(d4, Color::Black), squares(&["c3", "e3"]));
        assert_eq!(pawn_attacks(sq("a4"), Color::White), squares(&["b5"]));
        assert!(pawn_attacks(sq("d8"), Color::White).is_empty());

        assert_eq!(t.pawn_push(Color::White, sq("e2")), squares(&["e3"]));
        assert_eq!(t.pawn_push(Color::Black, sq("e7")), squares(&["e6"]));
        assert_eq!(t.pawn_double_push(Color::White, sq("e2")), squares(&["e4"]));
        assert_eq!(t.pawn_double_push(Color::Black, sq("e7")), squares(&["e5"]));
        assert!(t.pawn_double_push(Color::White, sq("e3")).is_empty());
        assert!(t.pawn_double_push(Color::Black, sq("e2")).is_empty());
    }

    #[test]
    fn spawn_ranks() {
        let t = tables();
        assert!(t.spawn_rank(Color::White).contains(sq("a2")));
        assert!(t.spawn_rank(Color::Black).contains(sq("h7")));
    }

    #[test]
    fn rays_run_to_the_edge() {
        let t = tables();
        let d4 = Square::new(File::D, Rank::R4);
        assert_eq!(t.ray(Direction::North, d4), squares(&["d5", "d6", "d7", "d8"]));
        assert_eq!(t.ray(Direction::SouthWest, d4), squares(&["c3", "b2", "a1"]));
        assert_eq!(t.ray(Direction::East, d4), squares(&["e4", "f4", "g4", "h4"]));
        assert!(t.ray(Direction::West, Square::A1).is_empty());
        assert!(t.ray(Direction::NorthEast, Square::H8).is_empty());
    }

    #[test]
    fn ray_direction_matches_scan_order() {
        let t = tables();
        for index in 0..64 {
            let from = Square::from_index(index).unwrap();
            for dir in Direction::STRAIGHT.into_iter().chain(Direction::DIAGONAL) {
                for to in t.ray(dir, from) {
                    assert_eq!(to.index() > from.index(), dir.is_increasing());
                }
            }
        }
    }

    #[test]
    fn nearest_blocker_per_direction() {
        let t = tables();
        let occupied = squares(&["d6", "d8", "b4", "a4", "f2"]);
        let d4 = sq("d4");
        assert_eq!(
            t.nearest_blocker(Direction::North, d4, occupied),
            sq("d6").index() as usize
        );
        assert_eq!(
            t.nearest_blocker(Direction::West, d4, occupied),
            sq("b4").index() as usize
        );
        assert_eq!(
            t.nearest_blocker(Direction::SouthEast, d4, occupied),
            sq("f2").index() as usize
        );
        assert_eq!(
            t.nearest_blocker(Direction::South, d4, occupied),
            Square::NONE_INDEX
        );
    }

    #[test]
    fn slider_attacks_stop_at_blockers() {
        let occupied = squares(&["d6", "b4", "f2", "g7"]);
        let d4 = sq("d4");
        assert_eq!(
            rook_attacks(d4, occupied),
            squares(&["d5", "d6", "c4", "b4", "e4", "f4", "g4", "h4", "d3", "d2", "d1"])
        );
        assert_eq!(
            bishop_attacks(d4, occupied),
            squares(&["e5", "f6", "g7", "c5", "b6", "a7", "c3", "b2", "a1", "e3", "f2"])
        );
        assert_eq!(queen_attacks(d4, Bitboard::EMPTY).count(), 27);
    }

    #[test]
    fn sentinel_entries_are_empty() {
        let t = tables();
        assert!(t.knight[Square::NONE_INDEX].is_empty());
        assert!(t.king[Square::NONE_INDEX].is_empty());
        for dir in 0..8 {
            assert!(t.rays[dir][Square::NONE_INDEX].is_empty());
        }
    }
}
