//! Rule constants and the standard starting layout.

use crate::game_state::chess_types::{Color, Coordinate, Piece, PieceId, PieceKind};

/// Turns a superposition survives before it is forced to collapse.
pub const DEFAULT_SUPERPOSITION_BUDGET: u8 = 3;

/// Superpositions each side may start per game.
pub const DEFAULT_QUANTUM_TOKENS: u8 = 3;

/// Score magnitude applied per capture.
pub const DEFAULT_CAPTURE_SCORE: i32 = 100;

/// Appended to an owner id to mint its clone's id.
pub const CLONE_ID_SUFFIX: &str = "~q";

const BACK_RANK: [(PieceKind, &str); 8] = [
    (PieceKind::Rook, "R1"),
    (PieceKind::Knight, "N1"),
    (PieceKind::Bishop, "B1"),
    (PieceKind::Queen, "Q"),
    (PieceKind::King, "K"),
    (PieceKind::Bishop, "B2"),
    (PieceKind::Knight, "N2"),
    (PieceKind::Rook, "R2"),
];

/// Standard chess starting position with ids `wR1`..`wR2`, `wP1`..`wP8` and
/// the same with a `b` prefix for black.
pub fn standard_layout() -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(32);

    for color in Color::BOTH {
        let prefix = match color {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let back_rank = match color {
            Color::White => 0,
            Color::Black => 7,
        };
        let pawn_rank = color.pawn_start_rank();

        for (file, (kind, suffix)) in BACK_RANK.iter().enumerate() {
            if let Some(square) = Coordinate::new(file as u8, back_rank) {
                pieces.push(Piece::new(
                    PieceId::new(format!("{prefix}{suffix}")),
                    *kind,
                    color,
                    square,
                ));
            }
        }
        for file in 0..8u8 {
            if let Some(square) = Coordinate::new(file, pawn_rank) {
                pieces.push(Piece::new(
                    PieceId::new(format!("{prefix}P{}", file + 1)),
                    PieceKind::Pawn,
                    color,
                    square,
                ));
            }
        }
    }

    pieces
}
