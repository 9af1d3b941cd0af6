//! Move Generator: reachable squares per piece from board occupancy alone.
//!
//! Dispatch is an exhaustive match on `PieceKind`, so adding a kind without a
//! generator fails to build. Nothing here knows about superposition,
//! entanglement or check; own-king safety is left to the legality oracle.

use std::collections::BTreeSet;

use crate::game_state::board_index::BoardIndex;
use crate::game_state::chess_types::{Color, Coordinate, Piece, PieceId, PieceKind};
use crate::moves::bishop_moves::generate_bishop_moves;
use crate::moves::king_moves::generate_king_moves;
use crate::moves::knight_moves::generate_knight_moves;
use crate::moves::pawn_moves::generate_pawn_moves;
use crate::moves::queen_moves::generate_queen_moves;
use crate::moves::rook_moves::generate_rook_moves;

pub type Destinations = BTreeSet<Coordinate>;

pub const ORTHOGONAL_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Destinations for `piece` given the current occupancy of `board`.
pub fn moves_for(piece: &Piece, board: &BoardIndex) -> Destinations {
    let mut out = Destinations::new();
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(piece, board, &mut out),
        PieceKind::Knight => generate_knight_moves(piece, board, &mut out),
        PieceKind::Bishop => generate_bishop_moves(piece, board, &mut out),
        PieceKind::Rook => generate_rook_moves(piece, board, &mut out),
        PieceKind::Queen => generate_queen_moves(piece, board, &mut out),
        PieceKind::King => generate_king_moves(piece, board, &mut out),
    }
    out
}

/// Every piece of `color` that has at least one destination.
pub fn moves_for_color(color: Color, board: &BoardIndex) -> Vec<(PieceId, Destinations)> {
    board
        .pieces()
        .filter(|piece| piece.color == color)
        .map(|piece| (piece.id.clone(), moves_for(piece, board)))
        .filter(|(_, destinations)| !destinations.is_empty())
        .collect()
}

/// Walk one direction until the edge or the first occupied square. That
/// square is included only when it holds an enemy.
pub(crate) fn trace_ray(piece: &Piece, board: &BoardIndex, step: (i8, i8), out: &mut Destinations) {
    let mut cursor = piece.position.offset(step.0, step.1);
    while let Some(square) = cursor {
        match board.color_at(square) {
            None => {
                out.insert(square);
            }
            Some(color) => {
                if color != piece.color {
                    out.insert(square);
                }
                break;
            }
        }
        cursor = square.offset(step.0, step.1);
    }
}

/// Single-step targets (knight jumps, king steps): kept unless a friendly
/// piece stands there.
pub(crate) fn step_targets(piece: &Piece, board: &BoardIndex, offsets: &[(i8, i8)], out: &mut Destinations) {
    for &(d_file, d_rank) in offsets {
        if let Some(square) = piece.position.offset(d_file, d_rank) {
            if board.color_at(square) != Some(piece.color) {
                out.insert(square);
            }
        }
    }
}
