//! Terminal-oriented Unicode board renderer.
//!
//! Draws a `GameSnapshot` for debugging, tests and the self-play harness.
//! Superposed pieces are followed by `*`, clones by `'` and entangled pieces
//! by `~`; other squares get a space so the columns line up.

use crate::game_state::chess_types::{Color, Coordinate, Piece, PieceKind};
use crate::turn::turn_state::GameSnapshot;

/// Render the board to a Unicode string, rank 8 on top.
pub fn render_snapshot(snapshot: &GameSnapshot) -> String {
    let mut out = String::new();

    out.push_str("  a  b  c  d  e  f  g  h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            let piece = Coordinate::new(file, rank).and_then(|square| snapshot.board.get(square));
            match piece {
                Some(piece) => {
                    out.push(piece_to_unicode(piece.color, piece.kind));
                    out.push(marker(snapshot, piece));
                }
                None => {
                    out.push('·');
                    out.push(' ');
                }
            }

            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a  b  c  d  e  f  g  h\n");
    out.push_str(&format!(
        "{} to move, score {}, tokens w{} b{}",
        snapshot.turn.current_player,
        snapshot.turn.score,
        snapshot.tokens(Color::White),
        snapshot.tokens(Color::Black)
    ));
    if let Some(status) = &snapshot.turn.status_message {
        out.push_str(" | ");
        out.push_str(status);
    }

    out
}

fn marker(snapshot: &GameSnapshot, piece: &Piece) -> char {
    if piece.is_clone() {
        '\''
    } else if snapshot.is_superposed(&piece.id) {
        '*'
    } else if snapshot.is_entangled(&piece.id) {
        '~'
    } else {
        ' '
    }
}

fn piece_to_unicode(color: Color, piece: PieceKind) -> char {
    match (color, piece) {
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::King) => '♔',
        (Color::Black, PieceKind::Pawn) => '♟',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::King) => '♚',
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::render_snapshot;
    use crate::config::{GameConfig, Opponent};
    use crate::game_state::chess_types::PieceId;
    use crate::oracle::classical_oracle::ClassicalOracle;
    use crate::turn::turn_controller::TurnController;
    use crate::utils::algebraic::from_oracle_notation;

    #[test]
    fn starting_position_renders_both_back_ranks() {
        let config = GameConfig {
            opponent: Opponent::Human,
            ..GameConfig::default()
        };
        let controller =
            TurnController::new(config, Box::new(ClassicalOracle::new(StdRng::seed_from_u64(0))))
                .expect("controller starts");
        let text = render_snapshot(&controller.snapshot());

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "8 ♜  ♞  ♝  ♛  ♚  ♝  ♞  ♜  8");
        assert_eq!(lines[8], "1 ♖  ♘  ♗  ♕  ♔  ♗  ♘  ♖  1");
        assert!(lines[10].starts_with("white to move, score 0, tokens w3 b3"));
    }

    #[test]
    fn superposed_pieces_and_clones_are_marked() {
        let config = GameConfig {
            opponent: Opponent::Human,
            rng_seed: Some(2),
            ..GameConfig::default()
        };
        let mut controller =
            TurnController::new(config, Box::new(ClassicalOracle::new(StdRng::seed_from_u64(0))))
                .expect("controller starts");
        controller
            .arm_superposition(&PieceId::new("wN1"))
            .expect("knight can be armed");
        let b1 = from_oracle_notation("b1").expect("b1");
        let c3 = from_oracle_notation("c3").expect("c3");
        controller.select_square(b1).expect("select");
        controller.select_square(c3).expect("commit");

        let text = render_snapshot(&controller.snapshot());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[6], "3 ·  ·  ♘* ·  ·  ·  ·  ·  3");
        assert_eq!(lines[8], "1 ♖  ♘' ♗  ♕  ♔  ♗  ♘  ♖  1");
    }
}
