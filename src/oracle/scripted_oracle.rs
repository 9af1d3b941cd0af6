//! Test oracle: the reference oracle with scriptable suggestions and
//! rejections, for driving the desync and rollback paths.

use std::collections::VecDeque;

use rand::rngs::StdRng;

use crate::game_state::chess_types::{Color, PieceKind};
use crate::oracle::classical_oracle::ClassicalOracle;
use crate::oracle::legality_oracle::{
    AiDifficulty, LegalityOracle, OracleVerdict, Placement, SuggestedMove,
};

pub struct ScriptedOracle {
    inner: ClassicalOracle,
    suggestions: VecDeque<SuggestedMove>,
    submitted: usize,
    rejections: Vec<(usize, String)>,
}

impl ScriptedOracle {
    pub fn new(rng: StdRng) -> Self {
        Self {
            inner: ClassicalOracle::new(rng),
            suggestions: VecDeque::new(),
            submitted: 0,
            rejections: Vec::new(),
        }
    }

    /// Queue a suggestion returned instead of the inner oracle's choice.
    pub fn force_suggestion(&mut self, from: &str, to: &str) {
        self.suggestions.push_back(SuggestedMove {
            from: from.to_owned(),
            to: to.to_owned(),
        });
    }

    /// Reject the `nth` upcoming submission (0 is the next one) with
    /// `reason`. Validation is not affected.
    pub fn reject_submission(&mut self, nth: usize, reason: &str) {
        self.rejections.push((self.submitted + nth, reason.to_owned()));
    }
}

impl LegalityOracle for ScriptedOracle {
    fn load_position(&mut self, placements: &[Placement], side_to_move: Color) -> Result<(), String> {
        self.inner.load_position(placements, side_to_move)
    }

    fn validate_move(&self, from: &str, to: &str) -> OracleVerdict {
        self.inner.validate_move(from, to)
    }

    fn submit_move(&mut self, from: &str, to: &str) -> OracleVerdict {
        let index = self.submitted;
        self.submitted += 1;
        match self.rejections.iter().position(|(at, _)| *at == index) {
            Some(found) => OracleVerdict::Rejected(self.rejections.swap_remove(found).1),
            None => self.inner.submit_move(from, to),
        }
    }

    fn is_in_check(&self) -> bool {
        self.inner.is_in_check()
    }

    fn is_in_checkmate(&self) -> bool {
        self.inner.is_in_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.inner.is_stalemate()
    }

    fn suggest_move(&mut self, difficulty: AiDifficulty) -> Result<Option<SuggestedMove>, String> {
        match self.suggestions.pop_front() {
            Some(forced) => Ok(Some(forced)),
            None => self.inner.suggest_move(difficulty),
        }
    }

    fn remove_piece(&mut self, square: &str) -> Result<(), String> {
        self.inner.remove_piece(square)
    }

    fn place_piece(&mut self, square: &str, color: Color, kind: PieceKind) -> Result<(), String> {
        self.inner.place_piece(square, color, kind)
    }
}
