//! Coordinate conversions to and from the oracle's algebraic notation.
//!
//! `(file, rank)` maps to `"<a-h><1-8>"`. The mapping is total over the
//! board and exactly inverted by `from_oracle_notation`.

use crate::errors::{QuantumChessError, QuantumResult};
use crate::game_state::chess_types::Coordinate;

/// Convert a coordinate to algebraic notation (for example: `(4, 3)` -> `"e4"`).
/// The spelling is `Coordinate`'s `Display`.
#[inline]
pub fn to_oracle_notation(square: Coordinate) -> String {
    square.to_string()
}

/// Parse algebraic notation (for example: `"e4"`) into a coordinate.
///
/// Upper-case files are accepted so that engines emitting `"E4"` work too.
pub fn from_oracle_notation(square: &str) -> QuantumResult<Coordinate> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(QuantumChessError::InvalidNotation(square.to_owned()));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(QuantumChessError::InvalidNotation(square.to_owned()));
    }

    Coordinate::new(file - b'a', rank - b'1')
        .ok_or_else(|| QuantumChessError::InvalidNotation(square.to_owned()))
}

/// Packed `0..64` square index for an algebraic string, used by bitboard code.
#[inline]
pub fn notation_to_index(square: &str) -> QuantumResult<u8> {
    from_oracle_notation(square).map(Coordinate::index)
}
