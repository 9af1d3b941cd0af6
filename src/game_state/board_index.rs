//! Board Index: the single source of truth for "what is where".
//!
//! A 64-slot mailbox keyed by the packed coordinate index. It is a plain
//! associative structure with no failure modes; callers (only the turn
//! controller and the quantum tracker it drives) are responsible for keeping
//! one square per piece, apart from the owner/clone pair of a superposition.

use crate::game_state::chess_rules::standard_layout;
use crate::game_state::chess_types::{Color, Coordinate, Piece, PieceId, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardIndex {
    squares: Vec<Option<Piece>>,
}

impl Default for BoardIndex {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl BoardIndex {
    pub fn new_empty() -> Self {
        Self {
            squares: vec![None; 64],
        }
    }

    pub fn standard() -> Self {
        Self::from_pieces(standard_layout())
    }

    /// Build an index from pieces placed at their own `position`.
    /// Later pieces overwrite earlier ones on the same square.
    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> Self {
        let mut board = Self::new_empty();
        for piece in pieces {
            let square = piece.position;
            board.set(square, piece);
        }
        board
    }

    #[inline]
    pub fn get(&self, square: Coordinate) -> Option<&Piece> {
        self.squares[square.index() as usize].as_ref()
    }

    /// Overwrite `square`. The piece's `position` is rewritten to match.
    pub fn set(&mut self, square: Coordinate, mut piece: Piece) -> Option<Piece> {
        piece.position = square;
        self.squares[square.index() as usize].replace(piece)
    }

    pub fn remove(&mut self, square: Coordinate) -> Option<Piece> {
        self.squares[square.index() as usize].take()
    }

    /// Remove-then-set in one step. Returns whatever stood on `to`.
    ///
    /// Does nothing when `from` is empty.
    pub fn relocate(&mut self, from: Coordinate, to: Coordinate) -> Option<Piece> {
        let piece = self.remove(from)?;
        self.set(to, piece)
    }

    #[inline]
    pub fn is_empty(&self, square: Coordinate) -> bool {
        self.get(square).is_none()
    }

    #[inline]
    pub fn color_at(&self, square: Coordinate) -> Option<Color> {
        self.get(square).map(|piece| piece.color)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().filter_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.pieces().count()
    }

    pub fn is_board_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: &PieceId) -> Option<&Piece> {
        self.pieces().find(|piece| &piece.id == id)
    }

    pub fn position_of(&self, id: &PieceId) -> Option<Coordinate> {
        self.find(id).map(|piece| piece.position)
    }

    pub fn king_position(&self, color: Color) -> Option<Coordinate> {
        self.pieces()
            .find(|piece| piece.kind == PieceKind::King && piece.color == color)
            .map(|piece| piece.position)
    }

    /// Give the piece on `square` a new identity (used when a clone survives
    /// a collapse and takes over the owner's id).
    pub(crate) fn reassign(&mut self, square: Coordinate, id: PieceId, clone_of: Option<PieceId>) {
        if let Some(piece) = self.squares[square.index() as usize].as_mut() {
            piece.id = id;
            piece.clone_of = clone_of;
        }
    }
}
