//! Superposition records and collapse outcomes.

use crate::game_state::chess_types::{Color, Coordinate, Piece, PieceId};

/// One logical piece standing on two squares: the owner (original id) and
/// its clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperpositionRecord {
    pub owner_id: PieceId,
    pub clone_id: PieceId,
    pub color: Color,
    /// Pieces taken by either branch while the record was active.
    pub captured_victims: Vec<Piece>,
    pub moves_remaining_before_forced_collapse: u8,
    /// Set on the turn the clone was spawned; that turn does not count
    /// against the budget.
    pub(crate) spawned_this_turn: bool,
}

impl SuperpositionRecord {
    pub fn new(owner: &Piece, clone: &Piece, budget: u8) -> Self {
        Self {
            owner_id: owner.id.clone(),
            clone_id: clone.id.clone(),
            color: owner.color,
            captured_victims: Vec::new(),
            moves_remaining_before_forced_collapse: budget,
            spawned_this_turn: true,
        }
    }

    #[inline]
    pub fn involves(&self, id: &PieceId) -> bool {
        &self.owner_id == id || &self.clone_id == id
    }
}

/// Which half of a superposition survived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Owner,
    Clone,
}

/// What observed the superposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseCause {
    /// An enemy tried to capture one of the branches.
    Capture,
    /// The record ran out of turns.
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapseOutcome {
    pub owner_id: PieceId,
    pub cause: CollapseCause,
    pub survivor: Branch,
    /// Where the surviving piece (now carrying `owner_id`) stands.
    pub survivor_position: Coordinate,
    /// Snapshot of the branch taken off the board.
    pub removed: Piece,
    pub captured_victims: Vec<Piece>,
}
