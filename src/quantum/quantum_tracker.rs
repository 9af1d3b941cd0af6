//! Quantum State Tracker.
//!
//! Owns every superposition record and entanglement link and is the only
//! place that executes a collapse. Per piece, the quantum state machine is:
//!
//! ```text
//! Classical -> (arm) -> Armed -> (next move: spawn clone) -> Superposed
//! Superposed -> (capture observation | timeout) -> Classical
//! Classical -> (entangle) -> Entangled -> (disentangle) -> Classical
//! Entangled -> (either partner captured) -> both partners off the board
//! ```
//!
//! Entangled and Superposed (or Armed) never overlap on one piece, and kings
//! are never entangled. Board
//! mutations made here (clone placement, branch removal) are applied to the
//! `BoardIndex` the turn controller hands in; mirroring them to the legality
//! oracle is the controller's job.

use std::fmt;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

use crate::errors::{QuantumChessError, QuantumResult};
use crate::game_state::board_index::BoardIndex;
use crate::game_state::chess_types::{Color, Coordinate, Piece, PieceId, PieceKind};
use crate::quantum::entanglement::{EntanglementLink, SharedFate};
use crate::quantum::superposition::{Branch, CollapseCause, CollapseOutcome, SuperpositionRecord};

/// Why a quantum intent was refused. Refusals change no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantumRejection {
    AlreadySuperposed,
    AlreadyArmed,
    /// The piece is armed for superposition and cannot be entangled.
    Armed,
    Entangled,
    AlreadyEntangled,
    ColorMismatch,
    SamePiece,
    KingCannotSuperpose,
    KingCannotEntangle,
    NoQuantumTokens,
    /// The vacated square is no longer free for the clone.
    SquareOccupied,
    UnknownPiece,
    NotYourPiece,
    /// The game is over, or it is not a human's turn.
    InputLocked,
}

impl fmt::Display for QuantumRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            QuantumRejection::AlreadySuperposed => "piece is already in superposition",
            QuantumRejection::AlreadyArmed => "piece is already armed for superposition",
            QuantumRejection::Armed => "piece is armed for superposition",
            QuantumRejection::Entangled => "entangled pieces cannot enter superposition",
            QuantumRejection::AlreadyEntangled => "piece is already entangled",
            QuantumRejection::ColorMismatch => "only pieces of the same color can be entangled",
            QuantumRejection::SamePiece => "a piece cannot be entangled with itself",
            QuantumRejection::KingCannotSuperpose => "kings cannot enter superposition",
            QuantumRejection::KingCannotEntangle => "kings cannot be entangled",
            QuantumRejection::NoQuantumTokens => "no quantum tokens left",
            QuantumRejection::SquareOccupied => "the vacated square is occupied",
            QuantumRejection::UnknownPiece => "no such piece on the board",
            QuantumRejection::NotYourPiece => "that piece belongs to the other side",
            QuantumRejection::InputLocked => "input is locked",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone)]
pub struct QuantumTracker {
    superpositions: Vec<SuperpositionRecord>,
    entanglements: Vec<EntanglementLink>,
    armed: Vec<(PieceId, Color)>,
    tokens: [u8; 2],
    budget: u8,
    rng: StdRng,
    next_branch: Option<Branch>,
}

impl QuantumTracker {
    /// `budget` seeds every record's turn counter; `tokens_per_side` limits
    /// how many superpositions each color may arm.
    pub fn new(budget: u8, tokens_per_side: u8, rng: StdRng) -> Self {
        Self {
            superpositions: Vec::new(),
            entanglements: Vec::new(),
            armed: Vec::new(),
            tokens: [tokens_per_side; 2],
            budget: budget.max(1),
            rng,
            next_branch: None,
        }
    }

    pub fn superpositions(&self) -> &[SuperpositionRecord] {
        &self.superpositions
    }

    pub fn entanglements(&self) -> &[EntanglementLink] {
        &self.entanglements
    }

    pub fn tokens(&self, color: Color) -> u8 {
        self.tokens[color.index()]
    }

    /// Record in which `id` is either the owner or the clone.
    pub fn record_involving(&self, id: &PieceId) -> Option<&SuperpositionRecord> {
        self.superpositions.iter().find(|record| record.involves(id))
    }

    pub fn is_superposed(&self, id: &PieceId) -> bool {
        self.record_involving(id).is_some()
    }

    pub fn link_involving(&self, id: &PieceId) -> Option<&EntanglementLink> {
        self.entanglements.iter().find(|link| link.involves(id))
    }

    pub fn is_entangled(&self, id: &PieceId) -> bool {
        self.link_involving(id).is_some()
    }

    /// Pieces whose next move will branch.
    pub fn armed(&self) -> impl Iterator<Item = &PieceId> {
        self.armed.iter().map(|(id, _)| id)
    }

    pub fn is_armed(&self, id: &PieceId) -> bool {
        self.armed.iter().any(|(armed, _)| armed == id)
    }

    /// Spend a token so that `piece`'s next move branches instead of
    /// relocating.
    pub fn arm_superposition(&mut self, piece: &Piece) -> Result<(), QuantumRejection> {
        if piece.kind == PieceKind::King {
            return Err(QuantumRejection::KingCannotSuperpose);
        }
        if piece.is_clone() || self.is_superposed(&piece.id) {
            return Err(QuantumRejection::AlreadySuperposed);
        }
        if self.is_entangled(&piece.id) {
            return Err(QuantumRejection::Entangled);
        }
        if self.is_armed(&piece.id) {
            return Err(QuantumRejection::AlreadyArmed);
        }
        let tokens = &mut self.tokens[piece.color.index()];
        if *tokens == 0 {
            return Err(QuantumRejection::NoQuantumTokens);
        }
        *tokens -= 1;
        self.armed.push((piece.id.clone(), piece.color));
        debug!(piece = %piece.id, tokens_left = *tokens, "armed superposition");
        Ok(())
    }

    /// Cancel an armed superposition and refund its token.
    pub fn disarm(&mut self, id: &PieceId) -> bool {
        let Some(index) = self.armed.iter().position(|(armed, _)| armed == id) else {
            return false;
        };
        let (_, color) = self.armed.remove(index);
        self.tokens[color.index()] = self.tokens[color.index()].saturating_add(1);
        true
    }

    /// Branch `owner` (already standing on its destination) by placing a
    /// clone on `vacated`, the square it just left.
    ///
    /// Returns `(owner, clone)` snapshots. Leaves the board with two live
    /// pieces for one logical unit.
    pub fn try_spawn_clone(
        &mut self,
        owner: &Piece,
        vacated: Coordinate,
        board: &mut BoardIndex,
    ) -> Result<(Piece, Piece), QuantumRejection> {
        if owner.is_clone() || self.is_superposed(&owner.id) {
            return Err(QuantumRejection::AlreadySuperposed);
        }
        if self.is_entangled(&owner.id) {
            return Err(QuantumRejection::Entangled);
        }
        if !board.is_empty(vacated) {
            return Err(QuantumRejection::SquareOccupied);
        }

        let clone = owner.spawn_clone_at(vacated);
        board.set(vacated, clone.clone());
        self.armed.retain(|(armed, _)| armed != &owner.id);
        self.superpositions
            .push(SuperpositionRecord::new(owner, &clone, self.budget));

        info!(
            owner = %owner.id,
            at = %owner.position,
            clone_at = %vacated,
            budget = self.budget,
            "spawned superposition clone"
        );
        Ok((owner.clone(), clone))
    }

    /// Resolve the superposition `trigger_id` belongs to with a fair coin.
    ///
    /// `Ok(None)` when the piece is not superposed.
    pub fn collapse(
        &mut self,
        trigger_id: &PieceId,
        cause: CollapseCause,
        board: &mut BoardIndex,
    ) -> QuantumResult<Option<CollapseOutcome>> {
        let Some(record) = self.record_involving(trigger_id) else {
            return Ok(None);
        };
        let owner_id = record.owner_id.clone();
        let survivor = match self.next_branch.take() {
            Some(forced) => forced,
            None if self.rng.random_bool(0.5) => Branch::Owner,
            None => Branch::Clone,
        };
        self.collapse_to(&owner_id, survivor, cause, board).map(Some)
    }

    /// Make the next `collapse` pick `branch` instead of flipping a coin.
    #[cfg(test)]
    pub(crate) fn force_next_collapse(&mut self, branch: Branch) {
        self.next_branch = Some(branch);
    }

    /// Resolve `owner_id`'s superposition to a chosen branch.
    pub(crate) fn collapse_to(
        &mut self,
        owner_id: &PieceId,
        survivor: Branch,
        cause: CollapseCause,
        board: &mut BoardIndex,
    ) -> QuantumResult<CollapseOutcome> {
        let index = self
            .superpositions
            .iter()
            .position(|record| &record.owner_id == owner_id)
            .ok_or_else(|| {
                QuantumChessError::Desync(format!("no superposition record for {owner_id}"))
            })?;

        let record = &self.superpositions[index];
        let owner_position = board.position_of(&record.owner_id).ok_or_else(|| {
            QuantumChessError::Desync(format!(
                "superposition owner {} is not on the board",
                record.owner_id
            ))
        })?;
        let clone_position = board.position_of(&record.clone_id).ok_or_else(|| {
            QuantumChessError::Desync(format!(
                "superposition clone {} is not on the board",
                record.clone_id
            ))
        })?;

        let (survivor_position, removed_position) = match survivor {
            Branch::Owner => (owner_position, clone_position),
            Branch::Clone => (clone_position, owner_position),
        };

        let record = self.superpositions.remove(index);
        let removed = board.remove(removed_position).ok_or_else(|| {
            QuantumChessError::Desync(format!("collapse found {removed_position} empty"))
        })?;
        if survivor == Branch::Clone {
            board.reassign(survivor_position, record.owner_id.clone(), None);
        }

        info!(
            owner = %record.owner_id,
            ?cause,
            ?survivor,
            survivor_at = %survivor_position,
            removed_at = %removed_position,
            "superposition collapsed"
        );

        Ok(CollapseOutcome {
            owner_id: record.owner_id,
            cause,
            survivor,
            survivor_position,
            removed,
            captured_victims: record.captured_victims,
        })
    }

    /// A capture attempt observes its target: collapse the target's
    /// superposition (if any) before the capture is finalised.
    pub fn resolve_capture_observation(
        &mut self,
        target: &Piece,
        board: &mut BoardIndex,
    ) -> QuantumResult<Option<CollapseOutcome>> {
        self.collapse(&target.id, CollapseCause::Capture, board)
    }

    /// Count down `color`'s records after that color completed a turn, and
    /// force-collapse those reaching zero. A record spawned during this very
    /// turn is skipped once.
    pub fn on_turn_elapsed(
        &mut self,
        color: Color,
        board: &mut BoardIndex,
    ) -> QuantumResult<Vec<CollapseOutcome>> {
        let mut due = Vec::new();
        for record in self
            .superpositions
            .iter_mut()
            .filter(|record| record.color == color)
        {
            if record.spawned_this_turn {
                record.spawned_this_turn = false;
                continue;
            }
            record.moves_remaining_before_forced_collapse =
                record.moves_remaining_before_forced_collapse.saturating_sub(1);
            debug!(
                owner = %record.owner_id,
                remaining = record.moves_remaining_before_forced_collapse,
                "superposition aged"
            );
            if record.moves_remaining_before_forced_collapse == 0 {
                due.push(record.owner_id.clone());
            }
        }

        let mut outcomes = Vec::with_capacity(due.len());
        for owner_id in due {
            if let Some(outcome) = self.collapse(&owner_id, CollapseCause::Timeout, board)? {
                outcomes.push(outcome);
            }
        }
        Ok(outcomes)
    }

    pub fn entangle(&mut self, a: &Piece, b: &Piece) -> Result<EntanglementLink, QuantumRejection> {
        if a.id == b.id {
            return Err(QuantumRejection::SamePiece);
        }
        if a.color != b.color {
            return Err(QuantumRejection::ColorMismatch);
        }
        for piece in [a, b] {
            if piece.kind == PieceKind::King {
                return Err(QuantumRejection::KingCannotEntangle);
            }
            if piece.is_clone() || self.is_superposed(&piece.id) {
                return Err(QuantumRejection::AlreadySuperposed);
            }
            if self.is_armed(&piece.id) {
                return Err(QuantumRejection::Armed);
            }
            if self.is_entangled(&piece.id) {
                return Err(QuantumRejection::AlreadyEntangled);
            }
        }

        let link = EntanglementLink::new(a.id.clone(), b.id.clone());
        self.entanglements.push(link.clone());
        info!(a = %a.id, b = %b.id, "pieces entangled");
        Ok(link)
    }

    pub fn disentangle(&mut self, id: &PieceId) -> Option<EntanglementLink> {
        let index = self.entanglements.iter().position(|link| link.involves(id))?;
        Some(self.entanglements.remove(index))
    }

    /// Drop quantum state tied to a captured piece. An entangled victim
    /// takes its partner with it: the partner is removed from `board` and
    /// returned so the caller can mirror the removal.
    pub fn on_piece_captured(
        &mut self,
        victim: &Piece,
        board: &mut BoardIndex,
    ) -> QuantumResult<Option<SharedFate>> {
        self.armed.retain(|(armed, _)| armed != &victim.id);
        let Some(link) = self.disentangle(&victim.id) else {
            return Ok(None);
        };
        let partner_id = link.partner_of(&victim.id).cloned().ok_or_else(|| {
            QuantumChessError::Desync(format!("link dissolved by {} does not involve it", victim.id))
        })?;
        let position = board.position_of(&partner_id).ok_or_else(|| {
            QuantumChessError::Desync(format!("entangled partner {partner_id} is not on the board"))
        })?;
        let partner = board.remove(position).ok_or_else(|| {
            QuantumChessError::Desync(format!("entangled partner {partner_id} vanished from {position}"))
        })?;
        self.armed.retain(|(armed, _)| armed != &partner.id);
        info!(victim = %victim.id, partner = %partner.id, %position, "entangled partner shares the capture");
        Ok(Some(SharedFate { link, partner }))
    }

    /// Append `victim` to the record of the superposition `capturer` belongs to.
    pub fn note_capture(&mut self, capturer: &PieceId, victim: &Piece) {
        if let Some(record) = self
            .superpositions
            .iter_mut()
            .find(|record| record.involves(capturer))
        {
            record.captured_victims.push(victim.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{QuantumRejection, QuantumTracker};
    use crate::errors::QuantumChessError;
    use crate::game_state::board_index::BoardIndex;
    use crate::game_state::chess_types::{Color, Coordinate, Piece, PieceId, PieceKind};
    use crate::quantum::superposition::{Branch, CollapseCause};

    fn at(file: u8, rank: u8) -> Coordinate {
        Coordinate::new(file, rank).expect("test square on the board")
    }

    fn tracker(seed: u64) -> QuantumTracker {
        QuantumTracker::new(3, 3, StdRng::seed_from_u64(seed))
    }

    /// Knight moved b1 -> c3 and branched; clone left on b1.
    fn branched_knight(tracker: &mut QuantumTracker) -> BoardIndex {
        let mut board = BoardIndex::from_pieces([
            Piece::new("wN1", PieceKind::Knight, Color::White, at(2, 2)),
            Piece::new("wK", PieceKind::King, Color::White, at(4, 0)),
        ]);
        let owner = board.get(at(2, 2)).cloned().expect("knight on c3");
        tracker
            .try_spawn_clone(&owner, at(1, 0), &mut board)
            .expect("spawn should succeed");
        board
    }

    #[test]
    fn spawn_places_the_clone_on_the_vacated_square() {
        let mut tracker = tracker(1);
        let board = branched_knight(&mut tracker);

        let clone = board.get(at(1, 0)).expect("clone on b1");
        assert_eq!(clone.id.as_str(), "wN1~q");
        assert_eq!(clone.clone_of, Some(PieceId::new("wN1")));
        assert_eq!(board.len(), 3);

        let record = tracker
            .record_involving(&PieceId::new("wN1~q"))
            .expect("record reachable through the clone id");
        assert_eq!(record.owner_id, PieceId::new("wN1"));
        assert_eq!(record.moves_remaining_before_forced_collapse, 3);
    }

    #[test]
    fn second_spawn_for_the_same_owner_is_rejected() {
        let mut tracker = tracker(1);
        let mut board = branched_knight(&mut tracker);
        let owner = board.get(at(2, 2)).cloned().expect("knight on c3");
        assert_eq!(
            tracker.try_spawn_clone(&owner, at(3, 3), &mut board),
            Err(QuantumRejection::AlreadySuperposed)
        );
        assert_eq!(tracker.superpositions().len(), 1);
    }

    #[test]
    fn entangled_piece_cannot_spawn_a_clone() {
        let mut tracker = tracker(1);
        let knight = Piece::new("wN1", PieceKind::Knight, Color::White, at(2, 2));
        let bishop = Piece::new("wB1", PieceKind::Bishop, Color::White, at(2, 0));
        let mut board = BoardIndex::from_pieces([knight.clone(), bishop.clone()]);
        tracker.entangle(&knight, &bishop).expect("same color pieces entangle");

        assert_eq!(
            tracker.try_spawn_clone(&knight, at(1, 0), &mut board),
            Err(QuantumRejection::Entangled)
        );
        assert!(board.is_empty(at(1, 0)));
    }

    #[test]
    fn entangle_rejects_superposed_pieces_and_their_clones() {
        let mut tracker = tracker(1);
        let mut board = branched_knight(&mut tracker);
        let rook = Piece::new("wR1", PieceKind::Rook, Color::White, at(0, 0));
        board.set(at(0, 0), rook.clone());
        let owner = board.get(at(2, 2)).cloned().expect("owner");
        let clone = board.get(at(1, 0)).cloned().expect("clone");

        assert_eq!(tracker.entangle(&rook, &owner), Err(QuantumRejection::AlreadySuperposed));
        assert_eq!(tracker.entangle(&clone, &rook), Err(QuantumRejection::AlreadySuperposed));
        assert!(tracker.entanglements().is_empty());
    }

    #[test]
    fn entangle_rules_for_color_identity_and_exclusivity() {
        let mut tracker = tracker(1);
        let a = Piece::new("wN1", PieceKind::Knight, Color::White, at(1, 0));
        let b = Piece::new("wB1", PieceKind::Bishop, Color::White, at(2, 0));
        let c = Piece::new("wR1", PieceKind::Rook, Color::White, at(0, 0));
        let enemy = Piece::new("bN1", PieceKind::Knight, Color::Black, at(1, 7));

        assert_eq!(tracker.entangle(&a, &a), Err(QuantumRejection::SamePiece));
        assert_eq!(tracker.entangle(&a, &enemy), Err(QuantumRejection::ColorMismatch));
        tracker.entangle(&a, &b).expect("first link");
        assert_eq!(tracker.entangle(&c, &b), Err(QuantumRejection::AlreadyEntangled));

        assert!(tracker.disentangle(&b.id).is_some());
        tracker.entangle(&c, &b).expect("b is free again");
    }

    #[test]
    fn collapse_to_owner_removes_the_clone() {
        let mut tracker = tracker(1);
        let mut board = branched_knight(&mut tracker);
        let outcome = tracker
            .collapse_to(&PieceId::new("wN1"), Branch::Owner, CollapseCause::Capture, &mut board)
            .expect("collapse should succeed");

        assert_eq!(outcome.survivor_position, at(2, 2));
        assert_eq!(outcome.removed.position, at(1, 0));
        assert!(board.is_empty(at(1, 0)));
        assert_eq!(board.position_of(&PieceId::new("wN1")), Some(at(2, 2)));
        assert!(tracker.superpositions().is_empty());
    }

    #[test]
    fn collapse_to_clone_hands_the_owner_id_to_the_clone() {
        let mut tracker = tracker(1);
        let mut board = branched_knight(&mut tracker);
        tracker
            .collapse_to(&PieceId::new("wN1"), Branch::Clone, CollapseCause::Timeout, &mut board)
            .expect("collapse should succeed");

        assert!(board.is_empty(at(2, 2)));
        let survivor = board.get(at(1, 0)).expect("survivor on b1");
        assert_eq!(survivor.id, PieceId::new("wN1"));
        assert!(!survivor.is_clone());
        assert!(board.find(&PieceId::new("wN1~q")).is_none());
    }

    #[test]
    fn random_collapse_always_leaves_exactly_one_branch() {
        for seed in 0..16 {
            let mut tracker = tracker(seed);
            let mut board = branched_knight(&mut tracker);
            let outcome = tracker
                .collapse(&PieceId::new("wN1~q"), CollapseCause::Capture, &mut board)
                .expect("collapse should succeed")
                .expect("knight was superposed");

            let knights: Vec<_> = board.pieces().filter(|p| p.kind == PieceKind::Knight).collect();
            assert_eq!(knights.len(), 1);
            assert_eq!(knights[0].id, PieceId::new("wN1"));
            assert_eq!(knights[0].position, outcome.survivor_position);
            assert!(tracker.superpositions().is_empty());
        }
    }

    #[test]
    fn collapse_of_a_classical_piece_is_nothing() {
        let mut tracker = tracker(1);
        let mut board = BoardIndex::standard();
        let before = board.clone();
        let outcome = tracker
            .collapse(&PieceId::new("wQ"), CollapseCause::Capture, &mut board)
            .expect("no error for classical pieces");
        assert!(outcome.is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn record_pointing_at_a_missing_piece_is_a_desync() {
        let mut tracker = tracker(1);
        let mut board = branched_knight(&mut tracker);
        board.remove(at(1, 0));
        let err = tracker
            .collapse_to(&PieceId::new("wN1"), Branch::Owner, CollapseCause::Timeout, &mut board)
            .expect_err("clone is gone");
        assert!(matches!(err, QuantumChessError::Desync(_)));
    }

    #[test]
    fn spawn_turn_does_not_count_against_the_budget() {
        let mut tracker = tracker(1);
        let mut board = branched_knight(&mut tracker);

        assert!(tracker.on_turn_elapsed(Color::White, &mut board).expect("aging").is_empty());
        let remaining = tracker.superpositions()[0].moves_remaining_before_forced_collapse;
        assert_eq!(remaining, 3);

        tracker.on_turn_elapsed(Color::White, &mut board).expect("aging");
        assert_eq!(tracker.superpositions()[0].moves_remaining_before_forced_collapse, 2);
    }

    #[test]
    fn last_remaining_turn_forces_a_collapse() {
        let mut tracker = tracker(5);
        let mut board = branched_knight(&mut tracker);
        tracker.superpositions[0].spawned_this_turn = false;
        tracker.superpositions[0].moves_remaining_before_forced_collapse = 1;

        // The other color's turn leaves white's record alone.
        assert!(tracker.on_turn_elapsed(Color::Black, &mut board).expect("aging").is_empty());

        let outcomes = tracker.on_turn_elapsed(Color::White, &mut board).expect("aging");
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].cause, CollapseCause::Timeout);
        assert!(tracker.superpositions().is_empty());
        assert_eq!(board.pieces().filter(|p| p.kind == PieceKind::Knight).count(), 1);
    }

    #[test]
    fn arming_spends_tokens_and_refuses_kings() {
        let mut tracker = QuantumTracker::new(3, 1, StdRng::seed_from_u64(0));
        let king = Piece::new("wK", PieceKind::King, Color::White, at(4, 0));
        let knight = Piece::new("wN1", PieceKind::Knight, Color::White, at(1, 0));
        let bishop = Piece::new("wB1", PieceKind::Bishop, Color::White, at(2, 0));

        assert_eq!(tracker.arm_superposition(&king), Err(QuantumRejection::KingCannotSuperpose));
        tracker.arm_superposition(&knight).expect("one token available");
        assert_eq!(tracker.arm_superposition(&knight), Err(QuantumRejection::AlreadyArmed));
        assert_eq!(tracker.arm_superposition(&bishop), Err(QuantumRejection::NoQuantumTokens));
        assert_eq!(tracker.tokens(Color::White), 0);
        assert_eq!(tracker.tokens(Color::Black), 1);

        assert!(tracker.disarm(&knight.id));
        assert_eq!(tracker.tokens(Color::White), 1);
        assert!(!tracker.is_armed(&knight.id));
    }

    #[test]
    fn armed_piece_cannot_be_entangled() {
        let mut tracker = tracker(0);
        let knight = Piece::new("wN1", PieceKind::Knight, Color::White, at(1, 0));
        let bishop = Piece::new("wB1", PieceKind::Bishop, Color::White, at(2, 0));
        tracker.arm_superposition(&knight).expect("token available");
        assert_eq!(tracker.entangle(&bishop, &knight), Err(QuantumRejection::Armed));
    }

    #[test]
    fn captures_by_either_branch_are_recorded() {
        let mut tracker = tracker(1);
        let _board = branched_knight(&mut tracker);
        let victim = Piece::new("bP3", PieceKind::Pawn, Color::Black, at(3, 4));
        tracker.note_capture(&PieceId::new("wN1~q"), &victim);
        assert_eq!(tracker.superpositions()[0].captured_victims, vec![victim]);
    }

    #[test]
    fn capturing_an_entangled_piece_takes_its_partner() {
        let mut tracker = tracker(1);
        let a = Piece::new("bN1", PieceKind::Knight, Color::Black, at(1, 7));
        let b = Piece::new("bB1", PieceKind::Bishop, Color::Black, at(2, 7));
        let mut board = BoardIndex::from_pieces([a.clone(), b.clone()]);
        tracker.entangle(&a, &b).expect("same color pieces entangle");

        let victim = board.remove(a.position).expect("knight on b8");
        let fate = tracker
            .on_piece_captured(&victim, &mut board)
            .expect("partner is on the board")
            .expect("link dissolved");
        assert_eq!(fate.link.partner_of(&a.id), Some(&b.id));
        assert_eq!(fate.partner, b);
        assert!(board.is_empty(b.position));
        assert!(!tracker.is_entangled(&b.id));
        assert!(tracker.entanglements().is_empty());
    }

    #[test]
    fn capturing_an_unlinked_piece_touches_nothing_else() {
        let mut tracker = tracker(1);
        let a = Piece::new("bN1", PieceKind::Knight, Color::Black, at(1, 7));
        let b = Piece::new("bB1", PieceKind::Bishop, Color::Black, at(2, 7));
        let mut board = BoardIndex::from_pieces([b.clone()]);
        assert_eq!(tracker.on_piece_captured(&a, &mut board), Ok(None));
        assert_eq!(board.get(b.position), Some(&b));
    }

    #[test]
    fn missing_partner_is_a_desync() {
        let mut tracker = tracker(1);
        let a = Piece::new("bN1", PieceKind::Knight, Color::Black, at(1, 7));
        let b = Piece::new("bB1", PieceKind::Bishop, Color::Black, at(2, 7));
        tracker.entangle(&a, &b).expect("same color pieces entangle");
        let err = tracker
            .on_piece_captured(&a, &mut BoardIndex::from_pieces(Vec::new()))
            .expect_err("bishop is gone");
        assert!(matches!(err, QuantumChessError::Desync(_)));
    }

    #[test]
    fn kings_cannot_be_entangled() {
        let mut tracker = tracker(0);
        let king = Piece::new("wK", PieceKind::King, Color::White, at(4, 0));
        let knight = Piece::new("wN1", PieceKind::Knight, Color::White, at(1, 0));
        assert_eq!(tracker.entangle(&knight, &king), Err(QuantumRejection::KingCannotEntangle));
        assert!(tracker.entanglements().is_empty());
    }
}
