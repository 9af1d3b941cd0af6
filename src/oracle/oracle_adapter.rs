//! Legality Oracle Adapter.
//!
//! Translates between grid coordinates and the oracle's algebraic notation
//! and turns the oracle's string errors into `OracleFailure`. Rejections of
//! submitted moves stay plain values.

use tracing::{debug, warn};

use crate::errors::{QuantumChessError, QuantumResult};
use crate::game_state::board_index::BoardIndex;
use crate::game_state::chess_types::{Color, Coordinate, Piece};
use crate::oracle::legality_oracle::{AiDifficulty, LegalityOracle, OracleVerdict, Placement};
use crate::utils::algebraic::{from_oracle_notation, to_oracle_notation};

/// Everything on `board`, as the oracle sees it. Clones are ordinary pieces
/// to the oracle.
pub fn placements_for(board: &BoardIndex) -> Vec<Placement> {
    board
        .pieces()
        .map(|piece| Placement {
            square: to_oracle_notation(piece.position),
            color: piece.color,
            kind: piece.kind,
        })
        .collect()
}

pub struct OracleAdapter {
    oracle: Box<dyn LegalityOracle>,
}

impl OracleAdapter {
    pub fn new(oracle: Box<dyn LegalityOracle>) -> Self {
        Self { oracle }
    }

    /// Replace the oracle's board with `board`.
    pub fn sync_board(&mut self, board: &BoardIndex, side_to_move: Color) -> QuantumResult<()> {
        let placements = placements_for(board);
        debug!(pieces = placements.len(), %side_to_move, "loading oracle position");
        self.oracle
            .load_position(&placements, side_to_move)
            .map_err(QuantumChessError::OracleFailure)
    }

    /// Ask whether `from`-`to` would be accepted, leaving the oracle's
    /// board unchanged.
    pub fn validate_move(&self, from: Coordinate, to: Coordinate) -> OracleVerdict {
        self.oracle
            .validate_move(&to_oracle_notation(from), &to_oracle_notation(to))
    }

    pub fn submit_move(&mut self, from: Coordinate, to: Coordinate) -> OracleVerdict {
        let verdict = self
            .oracle
            .submit_move(&to_oracle_notation(from), &to_oracle_notation(to));
        if let OracleVerdict::Rejected(reason) = &verdict {
            debug!(%from, %to, %reason, "oracle rejected move");
        }
        verdict
    }

    /// Suggested move translated back to grid coordinates.
    ///
    /// A suggestion in notation the adapter cannot read means the oracle is
    /// speaking about a different board, so it is reported as a desync.
    pub fn suggest_move(
        &mut self,
        difficulty: AiDifficulty,
    ) -> QuantumResult<Option<(Coordinate, Coordinate)>> {
        let Some(suggestion) = self
            .oracle
            .suggest_move(difficulty)
            .map_err(QuantumChessError::OracleFailure)?
        else {
            return Ok(None);
        };

        let parse = |square: &str| {
            from_oracle_notation(square).map_err(|err| {
                warn!(%square, "oracle suggested an unreadable square");
                QuantumChessError::Desync(format!("oracle suggestion unreadable: {err}"))
            })
        };
        Ok(Some((parse(&suggestion.from)?, parse(&suggestion.to)?)))
    }

    pub fn remove_piece(&mut self, square: Coordinate) -> QuantumResult<()> {
        self.oracle
            .remove_piece(&to_oracle_notation(square))
            .map_err(QuantumChessError::OracleFailure)
    }

    /// Mirror `piece` at its own position.
    pub fn place_piece(&mut self, piece: &Piece) -> QuantumResult<()> {
        self.oracle
            .place_piece(&to_oracle_notation(piece.position), piece.color, piece.kind)
            .map_err(QuantumChessError::OracleFailure)
    }

    pub fn is_in_check(&self) -> bool {
        self.oracle.is_in_check()
    }

    pub fn is_in_checkmate(&self) -> bool {
        self.oracle.is_in_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.oracle.is_stalemate()
    }
}
