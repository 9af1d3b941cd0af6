//! Errors used throughout the quantum chess core.
//!
//! Only conditions that abort a move attempt live here. Ordinary outcomes
//! (ignored clicks, oracle rejections, quantum rule refusals) are returned as
//! values so the rollback path stays on normal control flow.
//!
//! - `InvalidNotation` / `InvalidCoordinate` are input problems and recoverable.
//! - `Desync` and `OracleFailure` mean the Board Index and the oracle's board
//!   no longer agree. They end the session: the controller freezes and keeps
//!   the diagnostic in its status message.
//! - `GameOver` is returned when an operation needs a game in progress.

use std::error::Error;
use std::fmt;

pub type QuantumResult<T> = Result<T, QuantumChessError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantumChessError {
    /// A square string could not be parsed (for example `"z9"`).
    InvalidNotation(String),
    /// File/rank pair outside `0..8`.
    ///
    /// Payload: the offending `(file, rank)`.
    InvalidCoordinate((i8, i8)),
    /// The two board representations disagree, or a quantum record points at
    /// a piece that is no longer on the board.
    Desync(String),
    /// The legality oracle failed to carry out a sync call.
    OracleFailure(String),
    /// The session already ended.
    GameOver,
}

impl fmt::Display for QuantumChessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantumChessError::InvalidNotation(s) => write!(f, "invalid square notation: {s}"),
            QuantumChessError::InvalidCoordinate((file, rank)) => {
                write!(f, "coordinate ({file}, {rank}) is off the board")
            }
            QuantumChessError::Desync(msg) => write!(f, "board desynchronised: {msg}"),
            QuantumChessError::OracleFailure(msg) => write!(f, "legality oracle failure: {msg}"),
            QuantumChessError::GameOver => write!(f, "the game is already over"),
        }
    }
}

impl Error for QuantumChessError {}

impl QuantumChessError {
    /// True for errors that must freeze the session.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            QuantumChessError::Desync(_) | QuantumChessError::OracleFailure(_)
        )
    }
}
