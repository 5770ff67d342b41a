//! Move generation.
//!
//! Pseudo-legal moves come straight from the attack tables. Legal moves are
//! the pseudo-legal ones whose resulting board leaves the mover's king
//! unattacked; there is no pin or check-evasion logic.

pub mod attacks;
pub mod perft;

use crate::position::CastleSide;
use crate::{Bitboard, Position};
use attacks::{queen_attacks, tables, Direction};
use chess_core::{File, Move, Piece, Rank, Square};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Upper bound on pseudo-legal moves in any reachable position.
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates all legal moves for the side to move.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut moves = generate_pseudo_legal(position);
    moves.retain(|m| !leaves_king_attacked(position, m));
    moves
}

/// Generates every move that obeys piece movement rules, including moves
/// that leave the mover's own king attacked.
pub fn generate_pseudo_legal(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    generate_pawn_moves(position, &mut moves);
    generate_piece_moves(position, &mut moves);
    generate_castling_moves(position, &mut moves);
    moves
}

/// Plays `m` on a scratch copy of the board and reports whether the
/// mover's king is attacked afterwards.
pub fn leaves_king_attacked(position: &Position, m: Move) -> bool {
    let us = position.side_to_move();
    let mut board = *position.board();
    board.apply(m, us, position.en_passant());
    board.is_king_attacked(us)
}

fn push_targets(moves: &mut MoveList, from: Square, targets: Bitboard) {
    for to in targets {
        moves.push(Move::normal(from, to));
    }
}

fn generate_pawn_moves(position: &Position, moves: &mut MoveList) {
    let t = tables();
    let us = position.side_to_move();
    let board = position.board();
    let occupied = board.occupied();
    let en_passant = position
        .en_passant()
        .map_or(Bitboard::EMPTY, Bitboard::from_square);
    let capturable = board.color(us.opposite()) | en_passant;
    let promotion_rank = t.spawn_rank(us.opposite());

    for from in board.pieces(Piece::Pawn, us) {
        let single = t.pawn_push(us, from) & !occupied;
        let mut targets = single | (t.pawn_captures(us, from) & capturable);
        if single.is_not_empty() {
            targets |= t.pawn_double_push(us, from) & !occupied;
        }

        if promotion_rank.contains(from) {
            for to in targets {
                for piece in Piece::PROMOTIONS {
                    moves.push(Move::promotion(from, to, piece));
                }
            }
        } else {
            push_targets(moves, from, targets);
        }
    }
}

fn generate_piece_moves(position: &Position, moves: &mut MoveList) {
    let t = tables();
    let us = position.side_to_move();
    let board = position.board();
    let occupied = board.occupied();
    let not_own = !board.color(us);

    for from in board.pieces(Piece::Knight, us) {
        push_targets(moves, from, t.knight(from) & not_own);
    }
    for from in board.pieces(Piece::Bishop, us) {
        push_targets(moves, from, t.bishop(from, occupied) & not_own);
    }
    for from in board.pieces(Piece::Rook, us) {
        push_targets(moves, from, t.rook(from, occupied) & not_own);
    }
    for from in board.pieces(Piece::Queen, us) {
        push_targets(moves, from, queen_attacks(from, occupied) & not_own);
    }
    for from in board.pieces(Piece::King, us) {
        push_targets(moves, from, t.king(from) & not_own);
    }
}

/// Castling is emitted as the king's two-square move.
fn generate_castling_moves(position: &Position, moves: &mut MoveList) {
    let t = tables();
    let us = position.side_to_move();
    let them = us.opposite();
    let board = position.board();

    let Some(rank) = Rank::from_index(us.back_rank()) else {
        return;
    };
    let home = Square::new(File::E, rank);
    if !board.pieces(Piece::King, us).contains(home) {
        return;
    }
    let occupied = board.occupied();

    for side in CastleSide::ALL {
        if !position.castling().has(us, side) {
            continue;
        }
        let (dir, transit_file) = match side {
            CastleSide::King => (Direction::East, File::F),
            CastleSide::Queen => (Direction::West, File::D),
        };

        // The first piece met walking from the king to the corner must be
        // our own rook on that corner.
        let rook = Square::new(side.rook_file(), rank);
        if t.nearest_blocker(dir, home, occupied) != rook.index() as usize
            || !board.pieces(Piece::Rook, us).contains(rook)
        {
            continue;
        }

        let transit = Square::new(transit_file, rank);
        let target = Square::new(side.king_target(), rank);
        if [home, transit, target]
            .into_iter()
            .any(|sq| board.is_attacked(sq, them))
        {
            continue;
        }
        moves.push(Move::normal(home, target));
    }
}
