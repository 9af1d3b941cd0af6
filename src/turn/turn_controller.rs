//! Turn Controller.
//!
//! Owns the Turn State and is the only writer of the Board Index, the
//! quantum tracker and the oracle's board. Every intent (click, commit,
//! quantum action, AI turn) runs to completion before the next one starts.
//!
//! A commit is evaluated on copies of the board and the tracker. A capture
//! of a superposed piece is checked with the oracle before the target is
//! observed, so an illegal capture never collapses anything. The oracle is
//! told about every removal before the classical move is submitted; if it
//! rejects the move, those removals are undone on the oracle side and the
//! copies are dropped, so the live state is untouched.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, warn};

use crate::config::GameConfig;
use crate::errors::{QuantumChessError, QuantumResult};
use crate::game_state::board_index::BoardIndex;
use crate::game_state::chess_types::{Color, Coordinate, Piece, PieceId, PieceKind};
use crate::moves::move_generator::{moves_for, Destinations};
use crate::oracle::legality_oracle::{LegalityOracle, OracleVerdict};
use crate::oracle::oracle_adapter::OracleAdapter;
use crate::quantum::entanglement::{EntanglementLink, SharedFate};
use crate::quantum::quantum_tracker::{QuantumRejection, QuantumTracker};
use crate::quantum::superposition::CollapseOutcome;
use crate::turn::ai_scheduler::{AiScheduler, AiTicket};
use crate::turn::game_events::{GameEndReason, GameResult};
use crate::turn::turn_state::{GamePhase, GameSnapshot, LastMove, TurnState};

pub const EXPOSED_KING_MESSAGE: &str = "That move would expose your king";
pub const TARGET_COLLAPSED_MESSAGE: &str =
    "The target collapsed off that square and the move cannot reach it; the observation stands";

/// What an intent did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Invalid intent; nothing changed.
    Ignored,
    Selected {
        piece_id: PieceId,
        destinations: Destinations,
    },
    /// The oracle refused the move. `observed` is non-empty only when a
    /// legal capture observed its target, the collapse emptied the
    /// destination, and the oracle then refused the plain move onto the
    /// empty square (a pawn moving diagonally). Those collapses stay in
    /// effect and the same side moves again. In every other case `observed`
    /// is empty and the board is exactly as before.
    Rejected {
        reason: String,
        observed: Vec<CollapseOutcome>,
    },
    Applied(AppliedMove),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub mover: Color,
    pub piece_id: PieceId,
    pub from: Coordinate,
    pub to: Coordinate,
    pub captured: Option<Piece>,
    /// Capture-forced collapse first, then forced timeouts.
    pub collapses: Vec<CollapseOutcome>,
    pub spawned_clone: Option<Piece>,
    /// Entangled partner of the captured piece, removed with it.
    pub shared_fate: Option<SharedFate>,
    pub game_result: Option<GameResult>,
}

pub struct TurnController {
    config: GameConfig,
    board: BoardIndex,
    quantum: QuantumTracker,
    oracle: OracleAdapter,
    turn: TurnState,
    scheduler: AiScheduler,
    rng: StdRng,
    result_tx: Option<Sender<GameResult>>,
}

impl TurnController {
    /// Standard starting position, white to move.
    pub fn new(config: GameConfig, oracle: Box<dyn LegalityOracle>) -> QuantumResult<Self> {
        Self::with_board(config, oracle, BoardIndex::standard(), Color::White)
    }

    /// Start from an arbitrary position. The oracle is loaded with the same
    /// position, and an AI turn is scheduled if the AI is to move.
    pub fn with_board(
        config: GameConfig,
        oracle: Box<dyn LegalityOracle>,
        board: BoardIndex,
        side_to_move: Color,
    ) -> QuantumResult<Self> {
        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let quantum = Self::fresh_tracker(&config, &mut rng);

        let mut oracle = OracleAdapter::new(oracle);
        oracle.sync_board(&board, side_to_move)?;

        let mut controller = Self {
            turn: TurnState::new(config.player_color, side_to_move),
            scheduler: AiScheduler::new(config.ai_delay_min_ms, config.ai_delay_max_ms),
            config,
            board,
            quantum,
            oracle,
            rng,
            result_tx: None,
        };
        controller.schedule_ai_if_needed(Instant::now());
        Ok(controller)
    }

    fn fresh_tracker(config: &GameConfig, rng: &mut StdRng) -> QuantumTracker {
        QuantumTracker::new(
            config.superposition_budget,
            config.quantum_tokens_per_side,
            StdRng::seed_from_u64(rng.random()),
        )
    }

    /// Reset to the starting position. Any scheduled AI turn from the old
    /// game is discarded.
    pub fn new_game(&mut self, now: Instant) -> QuantumResult<()> {
        self.scheduler.invalidate();
        self.board = BoardIndex::standard();
        self.quantum = Self::fresh_tracker(&self.config, &mut self.rng);
        self.turn = TurnState::new(self.config.player_color, Color::White);
        if let Err(err) = self.oracle.sync_board(&self.board, Color::White) {
            return Err(self.fault(err));
        }
        info!(generation = self.scheduler.generation(), "new game started");
        self.schedule_ai_if_needed(now);
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &BoardIndex {
        &self.board
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn quantum(&self) -> &QuantumTracker {
        &self.quantum
    }

    pub fn pending_ai_ticket(&self) -> Option<AiTicket> {
        self.scheduler.pending().copied()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            turn: self.turn.clone(),
            superpositions: self.quantum.superpositions().to_vec(),
            entanglements: self.quantum.entanglements().to_vec(),
            armed: self.quantum.armed().cloned().collect(),
            tokens: [
                self.quantum.tokens(Color::White),
                self.quantum.tokens(Color::Black),
            ],
        }
    }

    /// Receive a `GameResult` when the game ends. Replaces any earlier
    /// subscriber.
    pub fn subscribe_results(&mut self) -> Receiver<GameResult> {
        let (tx, rx) = channel();
        self.result_tx = Some(tx);
        rx
    }

    /// True while the side to move takes human input.
    pub fn accepts_input(&self) -> bool {
        self.turn.phase.is_in_progress() && !self.config.is_ai_controlled(self.turn.current_player)
    }

    // ---------------------------------------------------------------------
    // Human intents
    // ---------------------------------------------------------------------

    /// Select a piece of the side to move and cache its destinations. If a
    /// piece is already selected and `id` stands on one of its destinations,
    /// this is a commit onto that square.
    pub fn select_piece(&mut self, id: &PieceId) -> QuantumResult<TurnOutcome> {
        if !self.accepts_input() {
            return Ok(TurnOutcome::Ignored);
        }
        let Some(piece) = self.board.find(id).cloned() else {
            return Ok(TurnOutcome::Ignored);
        };

        if self.turn.selected_piece_id.is_some()
            && self.turn.cached_legal_destinations.contains(&piece.position)
        {
            return self.commit_move(piece.position);
        }
        if piece.color != self.turn.current_player {
            return Ok(TurnOutcome::Ignored);
        }

        let destinations = moves_for(&piece, &self.board);
        debug!(piece = %piece.id, at = %piece.position, count = destinations.len(), "piece selected");
        self.turn.selected_piece_id = Some(piece.id.clone());
        self.turn.cached_legal_destinations = destinations.clone();
        Ok(TurnOutcome::Selected {
            piece_id: piece.id,
            destinations,
        })
    }

    /// Board click: an occupied square selects (or captures), an empty one
    /// commits the current selection.
    pub fn select_square(&mut self, square: Coordinate) -> QuantumResult<TurnOutcome> {
        if !self.accepts_input() {
            return Ok(TurnOutcome::Ignored);
        }
        match self.board.get(square) {
            Some(piece) => {
                let id = piece.id.clone();
                self.select_piece(&id)
            }
            None if self.turn.selected_piece_id.is_some() => self.commit_move(square),
            None => Ok(TurnOutcome::Ignored),
        }
    }

    /// Move the selected piece to `destination`.
    ///
    /// Ignored when nothing is selected or `destination` is not among the
    /// cached destinations. `Err(GameOver)` once the game has ended.
    pub fn commit_move(&mut self, destination: Coordinate) -> QuantumResult<TurnOutcome> {
        self.ensure_in_progress()?;
        if self.config.is_ai_controlled(self.turn.current_player) {
            return Ok(TurnOutcome::Ignored);
        }
        let Some(piece_id) = self.turn.selected_piece_id.clone() else {
            return Ok(TurnOutcome::Ignored);
        };
        if !self.turn.cached_legal_destinations.contains(&destination) {
            return Ok(TurnOutcome::Ignored);
        }

        let result = self.run_commit(&piece_id, destination);
        let outcome = result.map_err(|err| self.fault(err))?;
        self.schedule_ai_if_needed(Instant::now());
        Ok(outcome)
    }

    /// Spend a quantum token: `id`'s next move leaves a clone behind.
    pub fn arm_superposition(&mut self, id: &PieceId) -> Result<(), QuantumRejection> {
        if !self.accepts_input() {
            return Err(QuantumRejection::InputLocked);
        }
        let piece = self.board.find(id).ok_or(QuantumRejection::UnknownPiece)?;
        if piece.color != self.turn.current_player {
            return Err(QuantumRejection::NotYourPiece);
        }
        self.quantum.arm_superposition(piece)?;
        self.turn.status_message = Some(format!("{id} will split on its next move"));
        Ok(())
    }

    /// Cancel an armed superposition and refund the token.
    pub fn disarm(&mut self, id: &PieceId) -> bool {
        self.accepts_input() && self.quantum.disarm(id)
    }

    pub fn entangle_pieces(
        &mut self,
        a: &PieceId,
        b: &PieceId,
    ) -> Result<EntanglementLink, QuantumRejection> {
        if !self.accepts_input() {
            return Err(QuantumRejection::InputLocked);
        }
        let first = self.board.find(a).ok_or(QuantumRejection::UnknownPiece)?;
        let second = self.board.find(b).ok_or(QuantumRejection::UnknownPiece)?;
        if first.color != self.turn.current_player {
            return Err(QuantumRejection::NotYourPiece);
        }
        let link = self.quantum.entangle(first, second)?;
        self.turn.status_message = Some(format!("{a} and {b} are entangled"));
        Ok(link)
    }

    pub fn disentangle(&mut self, id: &PieceId) -> Option<EntanglementLink> {
        if !self.accepts_input() {
            return None;
        }
        let owner = self.board.find(id)?;
        if owner.color != self.turn.current_player {
            return None;
        }
        self.quantum.disentangle(id)
    }

    // ---------------------------------------------------------------------
    // AI turns
    // ---------------------------------------------------------------------

    /// Run the AI turn now. Ignored when the side to move is human.
    pub fn request_ai_move(&mut self) -> QuantumResult<TurnOutcome> {
        self.ensure_in_progress()?;
        if !self.config.is_ai_controlled(self.turn.current_player) {
            return Ok(TurnOutcome::Ignored);
        }
        self.scheduler.cancel();

        let result = self.run_ai_move();
        let outcome = result.map_err(|err| self.fault(err))?;
        self.schedule_ai_if_needed(Instant::now());
        Ok(outcome)
    }

    /// Poll the scheduler; runs the AI turn once its ticket is due.
    pub fn tick(&mut self, now: Instant) -> QuantumResult<Option<TurnOutcome>> {
        match self.scheduler.take_due(now) {
            Some(ticket) => self.run_ai_ticket(ticket).map(Some),
            None => Ok(None),
        }
    }

    /// Run a scheduled AI turn unless the ticket belongs to an earlier game.
    pub fn run_ai_ticket(&mut self, ticket: AiTicket) -> QuantumResult<TurnOutcome> {
        if !self.scheduler.is_current(&ticket) {
            debug!(
                ticket_generation = ticket.generation,
                generation = self.scheduler.generation(),
                "dropping stale AI ticket"
            );
            return Ok(TurnOutcome::Ignored);
        }
        self.request_ai_move()
    }

    fn run_ai_move(&mut self) -> QuantumResult<TurnOutcome> {
        let side = self.turn.current_player;
        let Some((from, to)) = self.oracle.suggest_move(self.config.ai_difficulty)? else {
            return Err(QuantumChessError::Desync(format!(
                "oracle has no move for {side} but the game is not over"
            )));
        };

        let piece = self.board.get(from).cloned().ok_or_else(|| {
            QuantumChessError::Desync(format!("oracle suggested a move from empty square {from}"))
        })?;
        if piece.color != side {
            return Err(QuantumChessError::Desync(format!(
                "oracle suggested moving the {} piece on {from} during {side}'s turn",
                piece.color
            )));
        }
        let destinations = moves_for(&piece, &self.board);
        if !destinations.contains(&to) {
            return Err(QuantumChessError::Desync(format!(
                "oracle suggested {from}{to}, which the board does not allow"
            )));
        }

        debug!(piece = %piece.id, %from, %to, "AI move chosen");
        self.turn.selected_piece_id = Some(piece.id.clone());
        self.turn.cached_legal_destinations = destinations;

        match self.run_commit(&piece.id, to)? {
            TurnOutcome::Rejected { reason, observed } if observed.is_empty() => {
                Err(QuantumChessError::Desync(format!(
                    "oracle rejected its own suggestion {from}{to}: {reason}"
                )))
            }
            outcome => Ok(outcome),
        }
    }

    fn schedule_ai_if_needed(&mut self, now: Instant) {
        if self.turn.phase.is_in_progress()
            && self.config.is_ai_controlled(self.turn.current_player)
            && self.scheduler.pending().is_none()
        {
            let ticket = self.scheduler.schedule(now, &mut self.rng);
            debug!(
                side = %self.turn.current_player,
                delay_ms = ticket.due_at.saturating_duration_since(now).as_millis() as u64,
                "AI turn scheduled"
            );
        }
    }

    // ---------------------------------------------------------------------
    // Commit pipeline
    // ---------------------------------------------------------------------

    fn run_commit(&mut self, piece_id: &PieceId, to: Coordinate) -> QuantumResult<TurnOutcome> {
        let piece = self.board.find(piece_id).cloned().ok_or_else(|| {
            QuantumChessError::Desync(format!("selected piece {piece_id} is not on the board"))
        })?;
        let from = piece.position;
        let mover = piece.color;

        let mut board = self.board.clone();
        let mut quantum = self.quantum.clone();
        let mut collapses = Vec::new();
        let mut oracle_removals = Vec::new();

        // A capture attempt observes a superposed target first, but only once
        // the oracle has agreed the capture itself is legal.
        let target = board.get(to).filter(|target| target.color != mover).cloned();
        if let Some(target) = target.filter(|target| quantum.is_superposed(&target.id)) {
            if let OracleVerdict::Rejected(reason) = self.oracle.validate_move(from, to) {
                self.turn.status_message = Some(EXPOSED_KING_MESSAGE.to_owned());
                info!(piece = %piece_id, %from, %to, %reason, "capture of a superposed piece refused before observation");
                return Ok(TurnOutcome::Rejected {
                    reason,
                    observed: Vec::new(),
                });
            }
            if let Some(outcome) = quantum.resolve_capture_observation(&target, &mut board)? {
                self.oracle.remove_piece(outcome.removed.position)?;
                oracle_removals.push(outcome.removed.clone());
                collapses.push(outcome);
            }
        }
        let target_vanished = !collapses.is_empty() && board.is_empty(to);

        if let OracleVerdict::Rejected(reason) = self.oracle.submit_move(from, to) {
            if target_vanished {
                self.board = board;
                self.quantum = quantum;
                self.turn.clear_selection();
                self.turn.status_message = Some(TARGET_COLLAPSED_MESSAGE.to_owned());
                info!(piece = %piece_id, %from, %to, %reason, "capture target collapsed off the square; move cancelled");
                return Ok(TurnOutcome::Rejected {
                    reason,
                    observed: collapses,
                });
            }

            for removed in oracle_removals.iter().rev() {
                self.oracle.place_piece(removed)?;
            }
            self.turn.status_message = Some(EXPOSED_KING_MESSAGE.to_owned());
            info!(piece = %piece_id, %from, %to, %reason, "move rolled back");
            return Ok(TurnOutcome::Rejected {
                reason,
                observed: Vec::new(),
            });
        }

        let captured = board.remove(to);
        let mut shared_fate = None;
        if let Some(victim) = &captured {
            shared_fate = quantum.on_piece_captured(victim, &mut board)?;
            quantum.note_capture(piece_id, victim);
        }
        if let Some(fate) = &shared_fate {
            self.oracle.remove_piece(fate.partner.position)?;
            quantum.note_capture(piece_id, &fate.partner);
        }
        board.relocate(from, to);

        let mut spawned_clone = None;
        if quantum.is_armed(piece_id) {
            let owner = board.get(to).cloned().ok_or_else(|| {
                QuantumChessError::Desync(format!("{piece_id} vanished from {to} mid-move"))
            })?;
            match quantum.try_spawn_clone(&owner, from, &mut board) {
                Ok((_, clone)) => {
                    self.oracle.place_piece(&clone)?;
                    spawned_clone = Some(clone);
                }
                Err(rejection) => {
                    warn!(piece = %piece_id, %rejection, "armed piece could not branch");
                    quantum.disarm(piece_id);
                }
            }
        }

        let timeouts = quantum.on_turn_elapsed(mover, &mut board)?;
        for outcome in &timeouts {
            self.oracle.remove_piece(outcome.removed.position)?;
        }
        collapses.extend(timeouts);

        self.board = board;
        self.quantum = quantum;

        let taken = captured.iter().count() + shared_fate.iter().count();
        if taken > 0 {
            let delta = self.config.capture_score * taken as i32;
            self.turn.score += if mover == self.turn.player_color { delta } else { -delta };
        }
        self.turn.last_move = Some(LastMove { from, to });
        self.turn.clear_selection();
        self.turn.current_player = mover.opposite();
        self.turn.status_message = None;

        info!(
            piece = %piece_id,
            %from,
            %to,
            captured = ?captured.as_ref().map(|victim| victim.id.as_str()),
            shared_fate = ?shared_fate.as_ref().map(|fate| fate.partner.id.as_str()),
            collapses = collapses.len(),
            spawned = spawned_clone.is_some(),
            score = self.turn.score,
            "move applied"
        );

        let game_result = self.detect_game_end(mover, captured.as_ref());
        Ok(TurnOutcome::Applied(AppliedMove {
            mover,
            piece_id: piece_id.clone(),
            from,
            to,
            captured,
            collapses,
            spawned_clone,
            shared_fate,
            game_result,
        }))
    }

    fn detect_game_end(&mut self, mover: Color, captured: Option<&Piece>) -> Option<GameResult> {
        let score = self.turn.score;
        let result = if captured.is_some_and(|victim| victim.kind == PieceKind::King) {
            GameResult::new(Some(mover), mover, score, GameEndReason::KingCaptured)
        } else if self.oracle.is_in_checkmate() {
            GameResult::new(Some(mover), mover, score, GameEndReason::Checkmate)
        } else if self.oracle.is_stalemate() {
            GameResult::new(None, mover, score, GameEndReason::Stalemate)
        } else {
            if self.oracle.is_in_check() {
                self.turn.status_message = Some("Check!".to_owned());
            }
            return None;
        };

        info!(%result, "game over");
        self.turn.status_message = Some(result.status_message());
        self.turn.phase = GamePhase::Finished(result.clone());
        self.scheduler.cancel();
        if let Some(tx) = &self.result_tx {
            // Nobody listening is fine.
            let _ = tx.send(result.clone());
        }
        Some(result)
    }

    fn ensure_in_progress(&self) -> QuantumResult<()> {
        if self.turn.phase.is_in_progress() {
            Ok(())
        } else {
            Err(QuantumChessError::GameOver)
        }
    }

    /// Freeze the session on a fatal error. Returns the error for `?`.
    fn fault(&mut self, err: QuantumChessError) -> QuantumChessError {
        if err.is_fatal() {
            error!(%err, "session frozen");
            self.turn.phase = GamePhase::Faulted(err.to_string());
            self.turn.status_message = Some(format!("Internal error: {err}"));
            self.turn.clear_selection();
            self.scheduler.cancel();
        }
        err
    }
}
