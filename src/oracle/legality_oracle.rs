//! Boundary to the external classical-chess legality engine.
//!
//! The engine is a black box that speaks algebraic square notation. It keeps
//! its own board, which the turn controller keeps in lockstep with the Board
//! Index through `submit_move`, `remove_piece` and `place_piece`.

use crate::game_state::chess_types::{Color, PieceKind};

/// Result of submitting a classical move. A rejection is a normal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleVerdict {
    Accepted,
    Rejected(String),
}

impl OracleVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, OracleVerdict::Accepted)
    }
}

/// Strength of the oracle's move suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiDifficulty {
    /// Uniform over legal moves.
    Random,
    /// Highest-value capture, ties broken at random.
    Greedy,
}

impl AiDifficulty {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random" | "easy" | "0" => Some(AiDifficulty::Random),
            "greedy" | "medium" | "1" => Some(AiDifficulty::Greedy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedMove {
    pub from: String,
    pub to: String,
}

/// A piece as the oracle sees it: no identity, just square, color and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub square: String,
    pub color: Color,
    pub kind: PieceKind,
}

pub trait LegalityOracle {
    /// Replace the oracle's board.
    fn load_position(&mut self, placements: &[Placement], side_to_move: Color) -> Result<(), String>;

    /// Check a move for the side to move without applying it.
    fn validate_move(&self, from: &str, to: &str) -> OracleVerdict;

    /// Validate and, on acceptance, apply a move for the side to move.
    /// A rejected move leaves the oracle untouched.
    fn submit_move(&mut self, from: &str, to: &str) -> OracleVerdict;

    fn is_in_check(&self) -> bool {
        false
    }

    fn is_in_checkmate(&self) -> bool;

    fn is_stalemate(&self) -> bool {
        false
    }

    /// `Ok(None)` when the side to move has no legal move.
    fn suggest_move(&mut self, difficulty: AiDifficulty) -> Result<Option<SuggestedMove>, String>;

    /// Sync a removal the oracle did not decide itself (collapse).
    fn remove_piece(&mut self, square: &str) -> Result<(), String>;

    /// Sync a placement (spawned clone, or undoing a removal on rollback).
    fn place_piece(&mut self, square: &str, color: Color, kind: PieceKind) -> Result<(), String>;
}
