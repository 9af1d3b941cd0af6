//! Value types shared by every layer of the quantum chess core.
//!
//! Color and piece kind are closed enums so that every consumer (move
//! generation, oracle, rendering) is forced to handle all variants at build
//! time. Coordinates are bounds-checked at construction and never leave the
//! 8x8 grid afterwards.

use std::fmt;

use crate::errors::QuantumChessError;
use crate::game_state::chess_rules::CLONE_ID_SUFFIX;

pub const BOARD_SIZE: u8 = 8;

/// Side of a piece and side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Direction pawns of this color advance along the rank axis.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank pawns of this color start on (and may double-step from).
    #[inline]
    pub const fn pawn_start_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Piece kind; color is stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Upper-case letter used in piece ids and text output.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
}

/// A square on the 8x8 grid: `file` and `rank` are both in `0..8`.
///
/// Ordering is file-major, which gives deterministic iteration over
/// destination sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    file: u8,
    rank: u8,
}

impl Coordinate {
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < BOARD_SIZE && rank < BOARD_SIZE {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Packed `0..64` encoding (`rank * 8 + file`, so `0 == a1`, `63 == h8`).
    #[inline]
    pub const fn index(self) -> u8 {
        self.rank * BOARD_SIZE + self.file
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Self {
                file: index % BOARD_SIZE,
                rank: index / BOARD_SIZE,
            })
        } else {
            None
        }
    }

    /// Square reached by stepping `(d_file, d_rank)`, or `None` when that
    /// leaves the board.
    #[inline]
    pub fn offset(self, d_file: i8, d_rank: i8) -> Option<Self> {
        let file = self.file as i8 + d_file;
        let rank = self.rank as i8 + d_rank;
        Self::try_from((file, rank)).ok()
    }

    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_SIZE * BOARD_SIZE).filter_map(Coordinate::from_index)
    }
}

impl TryFrom<(i8, i8)> for Coordinate {
    type Error = QuantumChessError;

    fn try_from((file, rank): (i8, i8)) -> Result<Self, Self::Error> {
        if (0..BOARD_SIZE as i8).contains(&file) && (0..BOARD_SIZE as i8).contains(&rank) {
            Ok(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            Err(QuantumChessError::InvalidCoordinate((file, rank)))
        }
    }
}

/// Algebraic square name, `a1` through `h8`.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            char::from(b'a' + self.file),
            char::from(b'1' + self.rank)
        )
    }
}

/// Stable piece identity. Never changes across moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(String);

impl PieceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id minted for the superposition clone of this piece.
    pub fn clone_id(&self) -> PieceId {
        PieceId(format!("{}{}", self.0, CLONE_ID_SUFFIX))
    }
}

impl From<&str> for PieceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A piece on the board.
///
/// `clone_of` is set only on a superposition clone and names the owner it
/// shadows until collapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub position: Coordinate,
    pub clone_of: Option<PieceId>,
}

impl Piece {
    pub fn new(id: impl Into<PieceId>, kind: PieceKind, color: Color, position: Coordinate) -> Self {
        Self {
            id: id.into(),
            kind,
            color,
            position,
            clone_of: None,
        }
    }

    #[inline]
    pub fn is_clone(&self) -> bool {
        self.clone_of.is_some()
    }

    /// Build the clone branch of this piece standing on `position`.
    pub fn spawn_clone_at(&self, position: Coordinate) -> Piece {
        Piece {
            id: self.id.clone_id(),
            kind: self.kind,
            color: self.color,
            position,
            clone_of: Some(self.id.clone()),
        }
    }

    /// Same piece moved to `position`.
    pub fn moved_to(&self, position: Coordinate) -> Piece {
        Piece {
            position,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, Coordinate, Piece, PieceId, PieceKind};

    #[test]
    fn coordinate_rejects_off_board_values() {
        assert!(Coordinate::new(8, 0).is_none());
        assert!(Coordinate::new(0, 8).is_none());
        assert!(Coordinate::try_from((-1, 3)).is_err());
        assert_eq!(Coordinate::all().count(), 64);
    }

    #[test]
    fn packed_index_round_trips() {
        for coord in Coordinate::all() {
            assert_eq!(Coordinate::from_index(coord.index()), Some(coord));
        }
        assert!(Coordinate::from_index(64).is_none());
    }

    #[test]
    fn offset_stops_at_the_edge() {
        let h8 = Coordinate::new(7, 7).expect("h8 is on the board");
        assert!(h8.offset(1, 0).is_none());
        assert_eq!(h8.offset(-1, -1), Coordinate::new(6, 6));
    }

    #[test]
    fn clone_keeps_kind_and_color_and_links_back_to_owner() {
        let d2 = Coordinate::new(3, 1).expect("d2 is on the board");
        let d4 = Coordinate::new(3, 3).expect("d4 is on the board");
        let owner = Piece::new("wN1", PieceKind::Knight, Color::White, d4);
        let clone = owner.spawn_clone_at(d2);

        assert_eq!(clone.id, PieceId::new("wN1~q"));
        assert_eq!(clone.clone_of, Some(owner.id.clone()));
        assert_eq!(clone.kind, PieceKind::Knight);
        assert_eq!(clone.position, d2);
        assert!(!owner.is_clone());
    }

    #[test]
    fn display_uses_file_letter_and_rank_number() {
        let e4 = Coordinate::new(4, 3).expect("e4 is on the board");
        assert_eq!(e4.to_string(), "e4");
    }
}
