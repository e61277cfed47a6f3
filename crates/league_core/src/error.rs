//! Error taxonomy for the league core.
//!
//! Validation failures are recoverable and reported back to whoever
//! submitted the change. Arithmetic failures reject the operation that
//! triggered them. Consistency failures mean the ledger and roster have
//! drifted apart and nothing should be trusted until that is fixed.

use thiserror::Error;

use crate::types::{LeagueKind, MatchId};

pub type LeagueResult<T> = Result<T, LeagueError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("player name must not be empty")]
    EmptyName,

    #[error("player name {0:?} must not contain whitespace")]
    InvalidName(String),

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    #[error("player {0} appears more than once in the match")]
    DuplicatePlayer(String),

    #[error("player {0} is already registered")]
    PlayerExists(String),

    #[error("goal balance {0} is outside 0..=10")]
    GoalBalanceOutOfRange(i64),

    #[error("starting rating {0} must be a positive finite number")]
    InvalidRating(f64),

    #[error("form factor {0} must be a finite number")]
    InvalidFormFactor(f64),

    #[error("no {0} match with id {1}")]
    UnknownMatch(LeagueKind, MatchId),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArithmeticError {
    #[error("ratio of {a} and {b} divides by zero")]
    DivisionByZero { a: f64, b: f64 },

    #[error("rating gap {diff} gives a negative base for the transfer curve")]
    NegativeBase { diff: f64 },

    #[error("computation produced a non-finite value")]
    NonFinite,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeagueError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("arithmetic domain error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    #[error("ledger and roster are out of sync: {0}")]
    Consistency(String),
}

impl LeagueError {
    pub fn consistency(msg: impl Into<String>) -> Self {
        Self::Consistency(msg.into())
    }
}
