//! Entanglement links between two pieces of the same color.

use crate::game_state::chess_types::{Piece, PieceId};

/// Symmetric link; `(a, b)` and `(b, a)` describe the same pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntanglementLink {
    pub piece_a: PieceId,
    pub piece_b: PieceId,
}

impl EntanglementLink {
    pub fn new(piece_a: PieceId, piece_b: PieceId) -> Self {
        Self { piece_a, piece_b }
    }

    #[inline]
    pub fn involves(&self, id: &PieceId) -> bool {
        &self.piece_a == id || &self.piece_b == id
    }

    pub fn partner_of(&self, id: &PieceId) -> Option<&PieceId> {
        if &self.piece_a == id {
            Some(&self.piece_b)
        } else if &self.piece_b == id {
            Some(&self.piece_a)
        } else {
            None
        }
    }
}

/// A capture that dissolved `link` and took the victim's partner off the
/// board with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFate {
    pub link: EntanglementLink,
    pub partner: Piece,
}
