//! Core types for chess.
//!
//! This crate provides the value types shared by the position engine and
//! its collaborators:
//! - [`Piece`] and [`Color`]
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and its coordinate notation
//! - FEN tokenizing

mod color;
mod error;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use error::ParseError;
pub use fen::{FenError, FenParser};
pub use mov::Move;
pub use piece::Piece;
pub use square::{File, Rank, Square};
