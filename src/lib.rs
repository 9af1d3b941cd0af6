//! Crate root module declarations for the quantum chess rules engine.
//!
//! This file exposes the subsystems (board index, move generation, quantum
//! state, turn control, the legality oracle boundary, and utility helpers)
//! so the harness binary, benches, and external front ends can import stable
//! module paths.

pub mod config;
pub mod errors;

pub mod game_state {
    pub mod board_index;
    pub mod chess_rules;
    pub mod chess_types;
}

pub mod moves {
    pub mod bishop_moves;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod move_generator;
    pub mod pawn_moves;
    pub mod queen_moves;
    pub mod rook_moves;
}

pub mod quantum {
    pub mod entanglement;
    pub mod quantum_tracker;
    pub mod superposition;
}

pub mod oracle {
    pub mod attack_tables;
    pub mod classical_oracle;
    pub mod legality_oracle;
    pub mod oracle_adapter;
    #[cfg(test)]
    pub mod scripted_oracle;
}

pub mod turn {
    pub mod ai_scheduler;
    pub mod game_events;
    pub mod turn_controller;
    pub mod turn_state;
}

pub mod utils {
    pub mod algebraic;
    pub mod render_board;
}
