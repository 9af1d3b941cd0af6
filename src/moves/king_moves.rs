//! King destinations: the eight adjacent squares. No castling.

use crate::game_state::board_index::BoardIndex;
use crate::game_state::chess_types::Piece;
use crate::moves::move_generator::{step_targets, Destinations};

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub fn generate_king_moves(piece: &Piece, board: &BoardIndex, out: &mut Destinations) {
    step_targets(piece, board, &KING_OFFSETS, out);
}
