//! Chess position representation.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chess_core::{Color, FenError, FenParser, File, Move, Piece, Rank, Square};

use crate::board::Board;
use crate::movegen::{self, attacks::pawn_attacks, MoveList};
use crate::zobrist::{self, CastlingKey};
use crate::{Bitboard, GameConfig, GameStatus};

/// Which wing a castling move goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::King, CastleSide::Queen];

    /// File the king lands on.
    pub const fn king_target(self) -> File {
        match self {
            CastleSide::King => File::G,
            CastleSide::Queen => File::C,
        }
    }

    /// File the rook starts on.
    pub const fn rook_file(self) -> File {
        match self {
            CastleSide::King => File::H,
            CastleSide::Queen => File::A,
        }
    }
}

/// Castling rights flags.
///
/// Rights only ever turn off during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::King) => 0b0001,
            (Color::White, CastleSide::Queen) => 0b0010,
            (Color::Black, CastleSide::King) => 0b0100,
            (Color::Black, CastleSide::Queen) => 0b1000,
        }
    }

    /// Returns true if `color` may still castle towards `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    /// Grants a right. Only used while setting up a position.
    #[inline]
    pub fn grant(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::flag(color, side);
    }

    /// Removes one right.
    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    /// Removes both rights of `color`.
    #[inline]
    pub fn revoke_color(&mut self, color: Color) {
        self.revoke(color, CastleSide::King);
        self.revoke(color, CastleSide::Queen);
    }

    /// Removes whatever right depends on a piece standing on `sq`: a rook
    /// corner drops that wing, a king home square drops both.
    pub fn revoke_square(&mut self, sq: Square) {
        match sq {
            Square::H1 => self.revoke(Color::White, CastleSide::King),
            Square::A1 => self.revoke(Color::White, CastleSide::Queen),
            Square::E1 => self.revoke_color(Color::White),
            Square::H8 => self.revoke(Color::Black, CastleSide::King),
            Square::A8 => self.revoke(Color::Black, CastleSide::Queen),
            Square::E8 => self.revoke_color(Color::Black),
            _ => {}
        }
    }

    /// Returns true if no right is left.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parses the FEN castling field. Unknown characters are rejected.
    pub fn from_fen(field: &str) -> Result<Self, FenError> {
        let mut rights = CastlingRights::NONE;
        if field == "-" {
            return Ok(rights);
        }
        for c in field.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::King),
                'Q' => (Color::White, CastleSide::Queen),
                'k' => (Color::Black, CastleSide::King),
                'q' => (Color::Black, CastleSide::Queen),
                _ => return Err(FenError::InvalidCastlingRights(field.to_string())),
            };
            rights.grant(color, side);
        }
        Ok(rights)
    }

    /// Hash contribution of the rights still held.
    fn hash_key(self) -> u64 {
        [
            (Color::White, CastleSide::King, CastlingKey::WhiteKingside),
            (Color::White, CastleSide::Queen, CastlingKey::WhiteQueenside),
            (Color::Black, CastleSide::King, CastlingKey::BlackKingside),
            (Color::Black, CastleSide::Queen, CastlingKey::BlackQueenside),
        ]
        .into_iter()
        .filter(|&(color, side, _)| self.has(color, side))
        .fold(0, |key, (_, _, right)| key ^ zobrist::castling_key(right))
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (color, side, c) in [
            (Color::White, CastleSide::King, 'K'),
            (Color::White, CastleSide::Queen, 'Q'),
            (Color::Black, CastleSide::King, 'k'),
            (Color::Black, CastleSide::Queen, 'q'),
        ] {
            if self.has(color, side) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// Complete chess position state.
///
/// A value type: playing a move returns a new position and leaves the old
/// one intact. Copies share the repetition table until one of them writes
/// to it.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    last_move: Move,
    /// Occurrences of each position hash since the last irreversible move.
    repetitions: Arc<HashMap<u64, u32>>,
}

impl Position {
    /// Creates an empty board with White to move.
    pub fn empty() -> Self {
        let mut position = Position {
            board: Board::empty(),
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            last_move: Move::NULL,
            repetitions: Arc::default(),
        };
        position.reseed_history();
        position
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        let mut position = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in File::ALL.into_iter().zip(back_rank) {
            position.board.put(piece, Color::White, Square::new(file, Rank::R1));
            position.board.put(Piece::Pawn, Color::White, Square::new(file, Rank::R2));
            position.board.put(Piece::Pawn, Color::Black, Square::new(file, Rank::R7));
            position.board.put(piece, Color::Black, Square::new(file, Rank::R8));
        }
        position.castling = CastlingRights::ALL;
        position.reseed_history();
        position
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position::empty();

        for (sq, piece, color) in parsed.pieces() {
            position.board.put(piece, color, sq);
        }
        position.side_to_move = parsed.side_to_move;
        position.castling = CastlingRights::from_fen(&parsed.castling)?;
        position.en_passant = parsed.en_passant;
        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;

        position.reseed_history();
        Ok(position)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in Rank::ALL.into_iter().rev() {
            let mut empty_count = 0;
            for file in File::ALL {
                match self.board.piece_at(Square::new(file, rank)) {
                    Some((piece, color)) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank != Rank::R1 {
                fen.push('/');
            }
        }

        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());
        format!(
            "{fen} {} {} {en_passant} {} {}",
            self.side_to_move.fen_char(),
            self.castling,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Returns the piece placement.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// The square skipped by the last double pawn advance, whether or not a
    /// pawn can actually capture there.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// The move that produced this position, [`Move::NULL`] for a position
    /// that was set up rather than played into.
    #[inline]
    pub fn last_move(&self) -> Move {
        self.last_move
    }

    /// Returns the piece and color at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.board.piece_at(sq)
    }

    /// Places a piece, replacing whatever stood on `sq`. Repetition history
    /// restarts from the edited position.
    pub fn put(&mut self, piece: Piece, color: Color, sq: Square) {
        self.board.remove(sq);
        self.board.put(piece, color, sq);
        self.reseed_history();
    }

    /// Places a piece on a square assumed to be empty, without touching the
    /// repetition history.
    #[inline]
    pub fn quick_put(&mut self, piece: Piece, color: Color, sq: Square) {
        self.board.put(piece, color, sq);
    }

    /// Empties a square, returning what stood there. Repetition history
    /// restarts from the edited position.
    pub fn remove(&mut self, sq: Square) -> Option<(Piece, Color)> {
        let removed = self.board.remove(sq);
        self.reseed_history();
        removed
    }

    /// Generates pseudo-legal moves for the side to move.
    #[inline]
    pub fn moves(&self) -> MoveList {
        movegen::generate_pseudo_legal(self)
    }

    /// Generates legal moves for the side to move.
    #[inline]
    pub fn legal_moves(&self) -> MoveList {
        movegen::generate_moves(self)
    }

    /// Returns true if `m` is legal here.
    pub fn is_legal(&self, m: Move) -> bool {
        self.moves().contains(m) && !movegen::leaves_king_attacked(self, m)
    }

    /// Plays a move and returns the resulting position.
    ///
    /// The move is not validated. A move whose source does not hold a piece
    /// of the side to move only advances the turn and the clocks.
    pub fn make_move(&self, m: Move) -> Position {
        let mut next = self.play_unchecked(m);
        let hash = next.hash();
        if next.halfmove_clock == 0 {
            next.repetitions = Arc::new(HashMap::from([(hash, 1)]));
        } else {
            *Arc::make_mut(&mut next.repetitions).entry(hash).or_insert(0) += 1;
        }
        next
    }

    /// Plays a move without hashing or repetition bookkeeping.
    ///
    /// The returned position carries a stale repetition table; use it for
    /// move counting only.
    pub fn play_unchecked(&self, m: Move) -> Position {
        let us = self.side_to_move;
        let mut next = self.clone();

        let effect = next.board.apply(m, us, self.en_passant);
        next.en_passant = None;
        match effect {
            Some(effect) => {
                let irreversible = effect.moved == Piece::Pawn || effect.captured.is_some();
                next.halfmove_clock = if irreversible {
                    0
                } else {
                    self.halfmove_clock + 1
                };

                if effect.moved == Piece::King {
                    next.castling.revoke_color(us);
                }
                next.castling.revoke_square(m.from());
                next.castling.revoke_square(m.to());

                if effect.moved == Piece::Pawn
                    && m.from().rank().index().abs_diff(m.to().rank().index()) == 2
                {
                    next.en_passant = m.from().offset(0, us.pawn_push().signum());
                }
            }
            None => next.halfmove_clock = self.halfmove_clock + 1,
        }

        if us == Color::Black {
            next.fullmove_number += 1;
        }
        next.side_to_move = us.opposite();
        next.last_move = m;
        next
    }

    /// Returns true if `color`'s king is attacked.
    #[inline]
    pub fn is_check(&self, color: Color) -> bool {
        self.board.is_king_attacked(color)
    }

    /// Returns true if the side to move is in check.
    #[inline]
    pub fn is_in_check(&self) -> bool {
        self.is_check(self.side_to_move)
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && self.legal_moves().is_empty()
    }

    /// Returns true if neither side can ever deliver mate.
    ///
    /// Covers bare kings and king plus a single knight or bishop per side;
    /// two lone bishops must share a square color. More than one minor piece
    /// on a side, including extra bishops gained by underpromotion, counts
    /// as sufficient.
    pub fn is_insufficient_material(&self) -> bool {
        let board = &self.board;
        let heavy = Color::ALL.into_iter().any(|color| {
            (board.pieces(Piece::Pawn, color)
                | board.pieces(Piece::Rook, color)
                | board.pieces(Piece::Queen, color))
            .is_not_empty()
        });
        if heavy {
            return false;
        }

        let minors = |color| {
            board.pieces(Piece::Knight, color).count() + board.pieces(Piece::Bishop, color).count()
        };
        if minors(Color::White) > 1 || minors(Color::Black) > 1 {
            return false;
        }

        let white_bishops = board.pieces(Piece::Bishop, Color::White);
        let black_bishops = board.pieces(Piece::Bishop, Color::Black);
        if white_bishops.is_not_empty() && black_bishops.is_not_empty() {
            let white_light = (white_bishops & Bitboard::LIGHT_SQUARES).is_not_empty();
            let black_light = (black_bishops & Bitboard::LIGHT_SQUARES).is_not_empty();
            return white_light == black_light;
        }
        true
    }

    /// The en passant square if a pawn of the side to move can capture on
    /// it.
    pub fn capturable_en_passant(&self) -> Option<Square> {
        let target = self.en_passant?;
        let capturers = pawn_attacks(target, self.side_to_move.opposite())
            & self.board.pieces(Piece::Pawn, self.side_to_move);
        capturers.is_not_empty().then_some(target)
    }

    /// Polyglot hash of placement, castling rights, capturable en passant
    /// square and side to move, usable as an opening-book key. Independent
    /// of the clocks.
    pub fn hash(&self) -> u64 {
        let mut key = 0;
        for color in Color::ALL {
            for piece in Piece::ALL {
                for sq in self.board.pieces(piece, color) {
                    key ^= zobrist::piece_key(piece, color, sq);
                }
            }
        }
        key ^= self.castling.hash_key();
        if let Some(target) = self.capturable_en_passant() {
            key ^= zobrist::en_passant_key(target.file());
        }
        if self.side_to_move == Color::White {
            key ^= zobrist::white_to_move_key();
        }
        key
    }

    /// How often this position has occurred since the last capture or pawn
    /// move, this occurrence included.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.get(&self.hash()).copied().unwrap_or(0)
    }

    /// Status under the default rules.
    pub fn status(&self) -> GameStatus {
        self.status_with(&GameConfig::default())
    }

    /// Status under `config`. Repetition and fifty-move draws are only
    /// reported when `config.auto_draw` is set.
    pub fn status_with(&self, config: &GameConfig) -> GameStatus {
        if self.legal_moves().is_empty() {
            return if self.is_in_check() {
                GameStatus::checkmated(self.side_to_move)
            } else {
                GameStatus::Stalemate
            };
        }
        if self.is_insufficient_material() {
            return GameStatus::InsufficientMaterial;
        }
        if config.auto_draw {
            if self.repetition_count() >= config.repetition_limit {
                return GameStatus::ThreefoldRepetition;
            }
            if self.halfmove_clock >= config.fifty_move_limit {
                return GameStatus::FiftyMoveRule;
            }
        }
        GameStatus::InProgress
    }

    fn reseed_history(&mut self) {
        self.repetitions = Arc::new(HashMap::from([(Position::hash(self), 1)]));
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.side_to_move == other.side_to_move
            && self.board == other.board
            && self.castling == other.castling
            && self.capturable_en_passant() == other.capturable_en_passant()
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(Position::hash(self));
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            write!(f, "{} ", rank)?;
            for file in File::ALL {
                let c = self
                    .piece_at(Square::new(file, rank))
                    .map_or('.', |(piece, color)| piece.to_fen_char(color));
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{} to move", self.side_to_move)
    }
}
