//! Reference legality oracle.
//!
//! A small bitboard engine standing in for the external classical-chess
//! service: it keeps its own board, filters self-check, detects checkmate and
//! stalemate, and suggests moves. Castling, en passant and promotion are not
//! modelled, matching the Move Generator, so the two boards cannot diverge
//! on those rules.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;

use crate::game_state::chess_types::{Color, Coordinate, PieceKind};
use crate::oracle::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use crate::oracle::legality_oracle::{
    AiDifficulty, LegalityOracle, OracleVerdict, Placement, SuggestedMove,
};
use crate::utils::algebraic::{notation_to_index, to_oracle_notation};

/// Move as the oracle enumerates it (packed square indices).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleMove {
    pub from: u8,
    pub to: u8,
    pub moved: PieceKind,
    pub captured: Option<PieceKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OracleBoard {
    // [color][piece_kind]
    pieces: [[u64; 6]; 2],
    side_to_move: Color,
}

impl OracleBoard {
    fn empty(side_to_move: Color) -> Self {
        Self {
            pieces: [[0; 6]; 2],
            side_to_move,
        }
    }

    fn occupancy(&self, color: Color) -> u64 {
        self.pieces[color.index()]
            .iter()
            .copied()
            .fold(0u64, |acc, bb| acc | bb)
    }

    fn occupancy_all(&self) -> u64 {
        self.occupancy(Color::White) | self.occupancy(Color::Black)
    }

    fn piece_on(&self, square: u8) -> Option<(Color, PieceKind)> {
        let mask = 1u64 << square;
        for color in Color::BOTH {
            for kind in PieceKind::ALL {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some((color, kind));
                }
            }
        }
        None
    }

    fn set_piece(&mut self, square: u8, color: Color, kind: PieceKind) {
        self.pieces[color.index()][kind.index()] |= 1u64 << square;
    }

    fn clear_square(&mut self, square: u8) -> Option<(Color, PieceKind)> {
        let found = self.piece_on(square)?;
        let mask = !(1u64 << square);
        for color in Color::BOTH {
            for kind in PieceKind::ALL {
                self.pieces[color.index()][kind.index()] &= mask;
            }
        }
        Some(found)
    }

    fn king_square(&self, color: Color) -> Option<u8> {
        let kings = self.pieces[color.index()][PieceKind::King.index()];
        if kings == 0 {
            None
        } else {
            Some(kings.trailing_zeros() as u8)
        }
    }

    fn is_square_attacked(&self, square: u8, attacker: Color) -> bool {
        let theirs = &self.pieces[attacker.index()];
        let occupancy = self.occupancy_all();

        // A pawn of `attacker` hits `square` iff a pawn of the other color on
        // `square` would hit the pawn.
        if pawn_attacks(attacker.opposite(), square) & theirs[PieceKind::Pawn.index()] != 0 {
            return true;
        }
        if knight_attacks(square) & theirs[PieceKind::Knight.index()] != 0 {
            return true;
        }
        if king_attacks(square) & theirs[PieceKind::King.index()] != 0 {
            return true;
        }
        let diagonal = theirs[PieceKind::Bishop.index()] | theirs[PieceKind::Queen.index()];
        if bishop_attacks(square, occupancy) & diagonal != 0 {
            return true;
        }
        let straight = theirs[PieceKind::Rook.index()] | theirs[PieceKind::Queen.index()];
        rook_attacks(square, occupancy) & straight != 0
    }

    fn king_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(square) => self.is_square_attacked(square, color.opposite()),
            None => false,
        }
    }

    fn pseudo_legal_moves(&self, color: Color) -> Vec<OracleMove> {
        let own = self.occupancy(color);
        let enemy = self.occupancy(color.opposite());
        let all = own | enemy;
        let mut out = Vec::with_capacity(64);

        for kind in PieceKind::ALL {
            let mut bits = self.pieces[color.index()][kind.index()];
            while bits != 0 {
                let from = bits.trailing_zeros() as u8;
                let targets = match kind {
                    PieceKind::Pawn => self.pawn_targets(color, from, enemy, all),
                    PieceKind::Knight => knight_attacks(from) & !own,
                    PieceKind::Bishop => bishop_attacks(from, all) & !own,
                    PieceKind::Rook => rook_attacks(from, all) & !own,
                    PieceKind::Queen => (bishop_attacks(from, all) | rook_attacks(from, all)) & !own,
                    PieceKind::King => king_attacks(from) & !own,
                };

                let mut targets = targets;
                while targets != 0 {
                    let to = targets.trailing_zeros() as u8;
                    let captured = if enemy & (1u64 << to) != 0 {
                        self.piece_on(to).map(|(_, kind)| kind)
                    } else {
                        None
                    };
                    out.push(OracleMove {
                        from,
                        to,
                        moved: kind,
                        captured,
                    });
                    targets &= targets - 1;
                }

                bits &= bits - 1;
            }
        }

        out
    }

    fn pawn_targets(&self, color: Color, from: u8, enemy: u64, all: u64) -> u64 {
        let rank = from / 8;
        let mut targets = pawn_attacks(color, from) & enemy;

        let one_step = match color {
            Color::White if rank < 7 => Some(from + 8),
            Color::Black if rank > 0 => Some(from - 8),
            _ => None,
        };
        if let Some(one) = one_step {
            if all & (1u64 << one) == 0 {
                targets |= 1u64 << one;
                if rank == color.pawn_start_rank() {
                    let two = match color {
                        Color::White => one + 8,
                        Color::Black => one - 8,
                    };
                    if all & (1u64 << two) == 0 {
                        targets |= 1u64 << two;
                    }
                }
            }
        }

        targets
    }

    fn apply(&self, mv: OracleMove) -> OracleBoard {
        let mut next = *self;
        let color = self.side_to_move;
        next.clear_square(mv.to);
        next.pieces[color.index()][mv.moved.index()] &= !(1u64 << mv.from);
        next.set_piece(mv.to, color, mv.moved);
        next.side_to_move = color.opposite();
        next
    }

    fn legal_moves(&self) -> Vec<OracleMove> {
        let side = self.side_to_move;
        self.pseudo_legal_moves(side)
            .into_iter()
            .filter(|mv| !self.apply(*mv).king_in_check(side))
            .collect()
    }
}

pub struct ClassicalOracle {
    board: OracleBoard,
    rng: StdRng,
}

impl ClassicalOracle {
    /// Empty board, white to move. Call `load_position` before use.
    pub fn new(rng: StdRng) -> Self {
        Self {
            board: OracleBoard::empty(Color::White),
            rng,
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move
    }

    pub fn legal_moves(&self) -> Vec<OracleMove> {
        self.board.legal_moves()
    }

    /// Color and kind on `square`, if any.
    pub fn piece_on(&self, square: &str) -> Option<(Color, PieceKind)> {
        notation_to_index(square)
            .ok()
            .and_then(|index| self.board.piece_on(index))
    }

    pub fn piece_count(&self) -> u32 {
        self.board.occupancy_all().count_ones()
    }

    /// Board after `from`-`to` by the side to move, or the rejection reason.
    fn board_after(&self, from: &str, to: &str) -> Result<OracleBoard, String> {
        let (Ok(from_index), Ok(to_index)) = (notation_to_index(from), notation_to_index(to)) else {
            return Err(format!("unreadable move {from}{to}"));
        };

        let side = self.board.side_to_move;
        match self.board.piece_on(from_index) {
            None => return Err(format!("no piece on {from}")),
            Some((color, _)) if color != side => return Err(format!("it is {side}'s move")),
            Some(_) => {}
        }

        let candidate = self
            .board
            .pseudo_legal_moves(side)
            .into_iter()
            .find(|mv| mv.from == from_index && mv.to == to_index)
            .ok_or_else(|| format!("{from}{to} is not a legal move"))?;

        let next = self.board.apply(candidate);
        if next.king_in_check(side) {
            return Err("move would expose the king".to_owned());
        }
        Ok(next)
    }

    fn piece_value(kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 20000,
        }
    }

    fn square_name(index: u8) -> Result<String, String> {
        Coordinate::from_index(index)
            .map(to_oracle_notation)
            .ok_or_else(|| format!("square index out of bounds: {index}"))
    }
}

impl LegalityOracle for ClassicalOracle {
    fn load_position(&mut self, placements: &[Placement], side_to_move: Color) -> Result<(), String> {
        let mut board = OracleBoard::empty(side_to_move);
        for placement in placements {
            let index = notation_to_index(&placement.square).map_err(|e| e.to_string())?;
            if board.piece_on(index).is_some() {
                return Err(format!("{} listed twice", placement.square));
            }
            board.set_piece(index, placement.color, placement.kind);
        }
        self.board = board;
        Ok(())
    }

    fn validate_move(&self, from: &str, to: &str) -> OracleVerdict {
        match self.board_after(from, to) {
            Ok(_) => OracleVerdict::Accepted,
            Err(reason) => OracleVerdict::Rejected(reason),
        }
    }

    fn submit_move(&mut self, from: &str, to: &str) -> OracleVerdict {
        match self.board_after(from, to) {
            Ok(next) => {
                self.board = next;
                OracleVerdict::Accepted
            }
            Err(reason) => OracleVerdict::Rejected(reason),
        }
    }

    fn is_in_check(&self) -> bool {
        self.board.king_in_check(self.board.side_to_move)
    }

    fn is_in_checkmate(&self) -> bool {
        self.is_in_check() && self.board.legal_moves().is_empty()
    }

    fn is_stalemate(&self) -> bool {
        self.board.king_square(self.board.side_to_move).is_some()
            && !self.is_in_check()
            && self.board.legal_moves().is_empty()
    }

    fn suggest_move(&mut self, difficulty: AiDifficulty) -> Result<Option<SuggestedMove>, String> {
        let legal = self.board.legal_moves();
        if legal.is_empty() {
            return Ok(None);
        }

        let picked = match difficulty {
            AiDifficulty::Random => legal.as_slice().choose(&mut self.rng).copied(),
            AiDifficulty::Greedy => {
                let value = |mv: &OracleMove| mv.captured.map(Self::piece_value).unwrap_or(0);
                let best_value = legal.iter().map(value).max().unwrap_or(0);
                let best: Vec<OracleMove> = legal
                    .iter()
                    .copied()
                    .filter(|mv| value(mv) == best_value)
                    .collect();
                best.as_slice().choose(&mut self.rng).copied()
            }
        };

        let mv = picked.ok_or("failed to choose a move")?;
        Ok(Some(SuggestedMove {
            from: Self::square_name(mv.from)?,
            to: Self::square_name(mv.to)?,
        }))
    }

    fn remove_piece(&mut self, square: &str) -> Result<(), String> {
        let index = notation_to_index(square).map_err(|e| e.to_string())?;
        self.board
            .clear_square(index)
            .map(|_| ())
            .ok_or_else(|| format!("no piece on {square} to remove"))
    }

    fn place_piece(&mut self, square: &str, color: Color, kind: PieceKind) -> Result<(), String> {
        let index = notation_to_index(square).map_err(|e| e.to_string())?;
        if self.board.piece_on(index).is_some() {
            return Err(format!("{square} is already occupied"));
        }
        self.board.set_piece(index, color, kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::ClassicalOracle;
    use crate::game_state::board_index::BoardIndex;
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::oracle::legality_oracle::{AiDifficulty, LegalityOracle, OracleVerdict, Placement};
    use crate::oracle::oracle_adapter::placements_for;

    fn oracle_with(placements: &[(&str, Color, PieceKind)], side: Color) -> ClassicalOracle {
        let placements: Vec<Placement> = placements
            .iter()
            .map(|(square, color, kind)| Placement {
                square: (*square).to_owned(),
                color: *color,
                kind: *kind,
            })
            .collect();
        let mut oracle = ClassicalOracle::new(StdRng::seed_from_u64(3));
        oracle
            .load_position(&placements, side)
            .expect("test position should load");
        oracle
    }

    fn standard_oracle() -> ClassicalOracle {
        let mut oracle = ClassicalOracle::new(StdRng::seed_from_u64(3));
        oracle
            .load_position(&placements_for(&BoardIndex::standard()), Color::White)
            .expect("standard position should load");
        oracle
    }

    #[test]
    fn twenty_legal_moves_from_the_start() {
        let mut oracle = standard_oracle();
        assert_eq!(oracle.legal_moves().len(), 20);
        assert_eq!(oracle.submit_move("e2", "e4"), OracleVerdict::Accepted);
        assert_eq!(oracle.side_to_move(), Color::Black);
        assert_eq!(oracle.legal_moves().len(), 20);
    }

    #[test]
    fn pinned_rook_cannot_leave_the_file() {
        let mut oracle = oracle_with(
            &[
                ("e1", Color::White, PieceKind::King),
                ("e2", Color::White, PieceKind::Rook),
                ("e8", Color::Black, PieceKind::Rook),
                ("a8", Color::Black, PieceKind::King),
            ],
            Color::White,
        );
        assert_eq!(
            oracle.submit_move("e2", "d2"),
            OracleVerdict::Rejected("move would expose the king".to_owned())
        );
        assert_eq!(oracle.side_to_move(), Color::White);
        assert_eq!(oracle.piece_on("e2"), Some((Color::White, PieceKind::Rook)));
        assert_eq!(oracle.submit_move("e2", "e5"), OracleVerdict::Accepted);
    }

    #[test]
    fn validation_leaves_the_board_alone() {
        let mut oracle = standard_oracle();
        assert_eq!(oracle.validate_move("e2", "e4"), OracleVerdict::Accepted);
        assert_eq!(oracle.side_to_move(), Color::White);
        assert_eq!(oracle.piece_on("e2"), Some((Color::White, PieceKind::Pawn)));
        assert!(!oracle.validate_move("e2", "e5").is_accepted());
        assert_eq!(oracle.submit_move("e2", "e4"), OracleVerdict::Accepted);
    }

    #[test]
    fn wrong_side_empty_square_and_nonsense_are_rejected() {
        let mut oracle = standard_oracle();
        assert!(!oracle.submit_move("e7", "e5").is_accepted());
        assert!(!oracle.submit_move("e4", "e5").is_accepted());
        assert!(!oracle.submit_move("e2", "e5").is_accepted());
        assert!(!oracle.submit_move("z2", "e5").is_accepted());
        assert_eq!(oracle.piece_count(), 32);
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut oracle = standard_oracle();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            assert_eq!(oracle.submit_move(from, to), OracleVerdict::Accepted, "{from}{to}");
        }
        assert!(oracle.is_in_check());
        assert!(oracle.is_in_checkmate());
        assert!(!oracle.is_stalemate());
        assert_eq!(oracle.suggest_move(AiDifficulty::Random), Ok(None));
    }

    #[test]
    fn boxed_in_king_without_check_is_stalemate() {
        let oracle = oracle_with(
            &[
                ("h8", Color::Black, PieceKind::King),
                ("g6", Color::White, PieceKind::Queen),
                ("f7", Color::White, PieceKind::King),
            ],
            Color::Black,
        );
        assert!(!oracle.is_in_check());
        assert!(oracle.is_stalemate());
        assert!(!oracle.is_in_checkmate());
    }

    #[test]
    fn greedy_prefers_the_most_valuable_capture() {
        let mut oracle = oracle_with(
            &[
                ("a1", Color::White, PieceKind::King),
                ("d4", Color::White, PieceKind::Rook),
                ("d7", Color::Black, PieceKind::Queen),
                ("h4", Color::Black, PieceKind::Pawn),
                ("h8", Color::Black, PieceKind::King),
            ],
            Color::White,
        );
        let suggestion = oracle
            .suggest_move(AiDifficulty::Greedy)
            .expect("suggestion should succeed")
            .expect("white has moves");
        assert_eq!((suggestion.from.as_str(), suggestion.to.as_str()), ("d4", "d7"));
    }

    #[test]
    fn random_suggestions_are_always_legal() {
        let mut oracle = standard_oracle();
        for _ in 0..20 {
            let suggestion = oracle
                .suggest_move(AiDifficulty::Random)
                .expect("suggestion should succeed")
                .expect("moves exist");
            assert_eq!(
                oracle.submit_move(&suggestion.from, &suggestion.to),
                OracleVerdict::Accepted
            );
            if oracle.is_in_checkmate() || oracle.is_stalemate() {
                break;
            }
        }
    }

    #[test]
    fn removal_and_placement_keep_the_board_in_step() {
        let mut oracle = standard_oracle();
        oracle.remove_piece("b1").expect("knight on b1");
        assert!(oracle.remove_piece("b1").is_err());
        assert_eq!(oracle.piece_count(), 31);

        oracle
            .place_piece("b1", Color::White, PieceKind::Knight)
            .expect("b1 is free");
        assert!(oracle.place_piece("b1", Color::White, PieceKind::Knight).is_err());
        assert_eq!(oracle.piece_on("b1"), Some((Color::White, PieceKind::Knight)));
    }
}
