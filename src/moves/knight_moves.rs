//! Knight destinations: the eight L-shaped jumps.

use crate::game_state::board_index::BoardIndex;
use crate::game_state::chess_types::Piece;
use crate::moves::move_generator::{step_targets, Destinations};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub fn generate_knight_moves(piece: &Piece, board: &BoardIndex, out: &mut Destinations) {
    step_targets(piece, board, &KNIGHT_OFFSETS, out);
}
