//! Chess position engine with bitboard representation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets with scan and shift operations
//! - [`Position`] - Full game state: placement, castling rights, en passant,
//!   clocks and repetition history
//! - Pseudo-legal and legal move generation, backed by precomputed attack
//!   and ray tables
//! - Check, checkmate, stalemate and draw detection, summarized as a
//!   [`GameStatus`]
//! - The Polyglot opening-book position hash
//! - [`Game`] - Move history with an illegal-move guard, resignation,
//!   time-outs and draw claims, tuned by a [`GameConfig`]
//!
//! # Architecture
//!
//! Each piece type/color combination has a 64-bit integer where each bit
//! represents a square. Sliding attacks walk precomputed rays and cut them
//! at the nearest blocker. Legality is checked by playing a move on a copy
//! of the board and asking whether the mover's king is attacked.
//!
//! # Example
//!
//! ```
//! use chess_position::{Game, GameStatus, Position};
//!
//! let position = Position::startpos();
//! assert_eq!(position.legal_moves().len(), 20);
//!
//! let mut game = Game::new();
//! for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     game.make_move_uci(uci).unwrap();
//! }
//! assert_eq!(game.status(), GameStatus::WhiteCheckmated);
//! ```

mod bitboard;
mod board;
mod config;
mod game;
pub mod movegen;
mod position;
mod status;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use board::Board;
pub use config::{ConfigError, GameConfig};
pub use game::{Game, GameError};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{generate_moves, generate_pseudo_legal, MoveList};
pub use position::{CastleSide, CastlingRights, Position};
pub use status::GameStatus;
