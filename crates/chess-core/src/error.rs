//! Text parsing errors for squares and moves.

use thiserror::Error;

/// Errors produced when coordinate text cannot be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("cannot parse square: '{0}'")]
    InvalidSquare(String),

    #[error("cannot parse move: '{0}'")]
    InvalidMove(String),
}
