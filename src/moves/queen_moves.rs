use crate::game_state::board_index::BoardIndex;
use crate::game_state::chess_types::Piece;
use crate::moves::move_generator::{
    trace_ray, Destinations, DIAGONAL_DIRECTIONS, ORTHOGONAL_DIRECTIONS,
};

pub fn generate_queen_moves(piece: &Piece, board: &BoardIndex, out: &mut Destinations) {
    for step in ORTHOGONAL_DIRECTIONS.into_iter().chain(DIAGONAL_DIRECTIONS) {
        trace_ray(piece, board, step, out);
    }
}
