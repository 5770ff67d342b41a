//! Game outcome.

use chess_core::Color;
use std::fmt;

/// Where a game stands.
///
/// Checkmate, stalemate and the draw rules are read off the position;
/// resignation, time-outs and illegal moves are reported from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    #[default]
    InProgress,
    WhiteCheckmated,
    BlackCheckmated,
    WhiteResigned,
    BlackResigned,
    WhiteTimedOut,
    BlackTimedOut,
    WhiteIllegalMove,
    BlackIllegalMove,
    ThreefoldRepetition,
    FiftyMoveRule,
    Stalemate,
    InsufficientMaterial,
}

impl GameStatus {
    /// `color` is checkmated.
    pub const fn checkmated(color: Color) -> Self {
        match color {
            Color::White => GameStatus::WhiteCheckmated,
            Color::Black => GameStatus::BlackCheckmated,
        }
    }

    /// `color` resigned.
    pub const fn resigned(color: Color) -> Self {
        match color {
            Color::White => GameStatus::WhiteResigned,
            Color::Black => GameStatus::BlackResigned,
        }
    }

    /// `color` ran out of time.
    pub const fn timed_out(color: Color) -> Self {
        match color {
            Color::White => GameStatus::WhiteTimedOut,
            Color::Black => GameStatus::BlackTimedOut,
        }
    }

    /// `color` attempted an illegal move.
    pub const fn illegal_move(color: Color) -> Self {
        match color {
            Color::White => GameStatus::WhiteIllegalMove,
            Color::Black => GameStatus::BlackIllegalMove,
        }
    }

    /// The side that lost, if the game was decided.
    pub const fn loser(self) -> Option<Color> {
        match self {
            GameStatus::WhiteCheckmated
            | GameStatus::WhiteResigned
            | GameStatus::WhiteTimedOut
            | GameStatus::WhiteIllegalMove => Some(Color::White),
            GameStatus::BlackCheckmated
            | GameStatus::BlackResigned
            | GameStatus::BlackTimedOut
            | GameStatus::BlackIllegalMove => Some(Color::Black),
            _ => None,
        }
    }

    /// The side that won, if the game was decided.
    pub const fn winner(self) -> Option<Color> {
        match self.loser() {
            Some(color) => Some(color.opposite()),
            None => None,
        }
    }

    /// Black was mated, resigned, flagged or played an illegal move.
    pub const fn white_won(self) -> bool {
        matches!(self.winner(), Some(Color::White))
    }

    /// White was mated, resigned, flagged or played an illegal move.
    pub const fn black_won(self) -> bool {
        matches!(self.winner(), Some(Color::Black))
    }

    /// The game ended without a winner.
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::ThreefoldRepetition
                | GameStatus::FiftyMoveRule
                | GameStatus::Stalemate
                | GameStatus::InsufficientMaterial
        )
    }

    /// The game has ended.
    pub const fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::InProgress => "in progress",
            GameStatus::WhiteCheckmated => "white checkmated",
            GameStatus::BlackCheckmated => "black checkmated",
            GameStatus::WhiteResigned => "white resigned",
            GameStatus::BlackResigned => "black resigned",
            GameStatus::WhiteTimedOut => "white timed out",
            GameStatus::BlackTimedOut => "black timed out",
            GameStatus::WhiteIllegalMove => "white made an illegal move",
            GameStatus::BlackIllegalMove => "black made an illegal move",
            GameStatus::ThreefoldRepetition => "draw by threefold repetition",
            GameStatus::FiftyMoveRule => "draw by fifty-move rule",
            GameStatus::Stalemate => "draw by stalemate",
            GameStatus::InsufficientMaterial => "draw by insufficient material",
        };
        f.write_str(text)
    }
}
