//! A single game: position history, move list and outcome.
//!
//! [`Game`] is the guarded layer on top of [`Position::make_move`]: it only
//! ever records legal moves, and it is where resignations, time-outs and
//! draw claims enter.

use crate::{GameConfig, GameStatus, MoveList, Position};
use chess_core::{Color, FenError, Move, ParseError};
use thiserror::Error;

/// Error type for game operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    /// The move text could not be parsed.
    #[error(transparent)]
    InvalidMove(#[from] ParseError),

    /// The game has already ended.
    #[error("game is over: {0}")]
    GameOver(GameStatus),

    /// The starting FEN could not be parsed.
    #[error(transparent)]
    InvalidFen(#[from] FenError),

    /// Neither a repetition nor a fifty-move draw is available.
    #[error("cannot claim draw: conditions not met")]
    CannotClaimDraw,
}

/// A chess game with history tracking.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    /// Every position reached, starting position first.
    positions: Vec<Position>,
    moves: Vec<Move>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Creates a game from a custom starting position. The position may
    /// already be decided (mate, stalemate, dead draw).
    pub fn from_position(position: Position) -> Self {
        let config = GameConfig::default();
        let status = position.status_with(&config);
        Game {
            config,
            positions: vec![position],
            moves: Vec::new(),
            status,
        }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Replaces the rules and re-evaluates the current position under them.
    /// Outcomes reported from outside (resignation, time-out, illegal move)
    /// are kept.
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        if !self.is_externally_decided() {
            self.status = self.position().status_with(&config);
        }
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The current position.
    pub fn position(&self) -> &Position {
        // `positions` is never empty: every constructor seeds it.
        &self.positions[self.positions.len() - 1]
    }

    /// Every position reached so far, starting position first.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Moves played so far.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Legal moves in the current position.
    pub fn legal_moves(&self) -> MoveList {
        self.position().legal_moves()
    }

    /// Plays a move and returns the resulting status.
    ///
    /// Illegal moves are never recorded. When the configuration makes them
    /// forfeit, the mover loses before the error is returned.
    pub fn make_move(&mut self, m: Move) -> Result<GameStatus, GameError> {
        self.ensure_in_progress()?;

        let position = self.position();
        let mover = position.side_to_move();
        if !position.is_legal(m) {
            tracing::debug!(mv = %m, side = %mover, fen = %position.to_fen(), "illegal move rejected");
            if self.config.illegal_move_forfeits {
                self.set_status(GameStatus::illegal_move(mover));
            }
            return Err(GameError::IllegalMove(m));
        }

        let next = position.make_move(m);
        let status = next.status_with(&self.config);
        tracing::debug!(mv = %m, side = %mover, hash = next.hash(), "move played");

        self.positions.push(next);
        self.moves.push(m);
        self.set_status(status);
        Ok(status)
    }

    /// Plays a move given in coordinate notation.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<GameStatus, GameError> {
        let m = Move::from_uci(uci)?;
        self.make_move(m)
    }

    /// `color` resigns.
    pub fn resign(&mut self, color: Color) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        self.set_status(GameStatus::resigned(color));
        Ok(())
    }

    /// `color` ran out of time.
    pub fn time_out(&mut self, color: Color) -> Result<(), GameError> {
        self.ensure_in_progress()?;
        self.set_status(GameStatus::timed_out(color));
        Ok(())
    }

    /// Returns true if a repetition or fifty-move draw could be claimed now.
    pub fn can_claim_draw(&self) -> bool {
        !self.is_over() && self.claimable_draw().is_some()
    }

    /// Ends the game with an available repetition or fifty-move draw.
    /// Repetition wins when both apply.
    pub fn claim_draw(&mut self) -> Result<GameStatus, GameError> {
        self.ensure_in_progress()?;
        let status = self.claimable_draw().ok_or(GameError::CannotClaimDraw)?;
        self.set_status(status);
        Ok(status)
    }

    fn claimable_draw(&self) -> Option<GameStatus> {
        let position = self.position();
        if position.repetition_count() >= self.config.repetition_limit {
            Some(GameStatus::ThreefoldRepetition)
        } else if position.halfmove_clock() >= self.config.fifty_move_limit {
            Some(GameStatus::FiftyMoveRule)
        } else {
            None
        }
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver(self.status));
        }
        Ok(())
    }

    fn is_externally_decided(&self) -> bool {
        matches!(
            self.status,
            GameStatus::WhiteResigned
                | GameStatus::BlackResigned
                | GameStatus::WhiteTimedOut
                | GameStatus::BlackTimedOut
                | GameStatus::WhiteIllegalMove
                | GameStatus::BlackIllegalMove
        )
    }

    fn set_status(&mut self, status: GameStatus) {
        if status != self.status {
            tracing::debug!(from = %self.status, to = %status, ply = self.moves.len(), "game status changed");
            self.status = status;
        }
    }
}
