use crate::game_state::board_index::BoardIndex;
use crate::game_state::chess_types::Piece;
use crate::moves::move_generator::{trace_ray, Destinations, ORTHOGONAL_DIRECTIONS};

pub fn generate_rook_moves(piece: &Piece, board: &BoardIndex, out: &mut Destinations) {
    for step in ORTHOGONAL_DIRECTIONS {
        trace_ray(piece, board, step, out);
    }
}
