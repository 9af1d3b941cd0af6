//! Pawn destinations: single push, double push from the start rank, and
//! diagonal captures. No en passant and no promotion.

use crate::game_state::board_index::BoardIndex;
use crate::game_state::chess_types::Piece;
use crate::moves::move_generator::Destinations;

pub fn generate_pawn_moves(piece: &Piece, board: &BoardIndex, out: &mut Destinations) {
    let forward = piece.color.forward();

    if let Some(one_step) = piece.position.offset(0, forward) {
        if board.is_empty(one_step) {
            out.insert(one_step);

            if piece.position.rank() == piece.color.pawn_start_rank() {
                if let Some(two_step) = one_step.offset(0, forward) {
                    if board.is_empty(two_step) {
                        out.insert(two_step);
                    }
                }
            }
        }
    }

    for d_file in [-1, 1] {
        if let Some(target) = piece.position.offset(d_file, forward) {
            if matches!(board.color_at(target), Some(color) if color != piece.color) {
                out.insert(target);
            }
        }
    }
}
