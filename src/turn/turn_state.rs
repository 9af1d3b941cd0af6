//! Turn State and the read-only snapshot handed to renderers.

use crate::game_state::board_index::BoardIndex;
use crate::game_state::chess_types::{Color, Coordinate, PieceId};
use crate::moves::move_generator::Destinations;
use crate::quantum::entanglement::EntanglementLink;
use crate::quantum::superposition::SuperpositionRecord;
use crate::turn::game_events::GameResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub from: Coordinate,
    pub to: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    InProgress,
    Finished(GameResult),
    /// Frozen after an internal desync. Payload: diagnostic.
    Faulted(String),
}

impl GamePhase {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, GamePhase::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    pub current_player: Color,
    pub player_color: Color,
    pub selected_piece_id: Option<PieceId>,
    pub cached_legal_destinations: Destinations,
    pub last_move: Option<LastMove>,
    pub score: i32,
    pub status_message: Option<String>,
    pub phase: GamePhase,
}

impl TurnState {
    pub fn new(player_color: Color, side_to_move: Color) -> Self {
        Self {
            current_player: side_to_move,
            player_color,
            selected_piece_id: None,
            cached_legal_destinations: Destinations::new(),
            last_move: None,
            score: 0,
            status_message: None,
            phase: GamePhase::InProgress,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_piece_id = None;
        self.cached_legal_destinations.clear();
    }
}

/// Copy of everything a renderer may show. Mutations go through the
/// controller, never through a snapshot.
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    pub board: BoardIndex,
    pub turn: TurnState,
    pub superpositions: Vec<SuperpositionRecord>,
    pub entanglements: Vec<EntanglementLink>,
    pub armed: Vec<PieceId>,
    pub tokens: [u8; 2],
}

impl GameSnapshot {
    pub fn is_superposed(&self, id: &PieceId) -> bool {
        self.superpositions.iter().any(|record| record.involves(id))
    }

    pub fn is_entangled(&self, id: &PieceId) -> bool {
        self.entanglements.iter().any(|link| link.involves(id))
    }

    pub fn tokens(&self, color: Color) -> u8 {
        self.tokens[color.index()]
    }
}
