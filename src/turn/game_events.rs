//! Result events emitted when a session ends.
//!
//! Consumers (stats tracking and the like) receive them over an
//! `std::sync::mpsc` channel; the core does not wait for them.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::game_state::chess_types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEndReason {
    Checkmate,
    /// A king was taken after a collapse left it exposed.
    KingCaptured,
    Stalemate,
}

impl fmt::Display for GameEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEndReason::Checkmate => write!(f, "checkmate"),
            GameEndReason::KingCaptured => write!(f, "king captured"),
            GameEndReason::Stalemate => write!(f, "stalemate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// `None` for a draw.
    pub winner: Option<Color>,
    /// Side that made the final move.
    pub mover: Color,
    pub final_score: i32,
    pub reason: GameEndReason,
    pub finished_at: DateTime<Utc>,
}

impl GameResult {
    pub fn new(winner: Option<Color>, mover: Color, final_score: i32, reason: GameEndReason) -> Self {
        Self {
            winner,
            mover,
            final_score,
            reason,
            finished_at: Utc::now(),
        }
    }

    /// Status line shown to the player.
    pub fn status_message(&self) -> String {
        match (self.reason, self.winner) {
            (GameEndReason::Checkmate, _) => "Check Mate!".to_owned(),
            (GameEndReason::KingCaptured, Some(winner)) => format!("King captured, {winner} wins"),
            (GameEndReason::KingCaptured, None) => "King captured".to_owned(),
            (GameEndReason::Stalemate, _) => "Stalemate".to_owned(),
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Some(winner) => write!(
                f,
                "{} ({winner} wins, score {}, {})",
                self.reason,
                self.final_score,
                self.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => write!(
                f,
                "{} (draw, score {}, {})",
                self.reason,
                self.final_score,
                self.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        }
    }
}
