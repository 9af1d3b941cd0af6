//! Self-play harness: a random "human" against the oracle AI.
//!
//! Run with:
//! `cargo run --release --bin quantum_self_play`
//! `cargo run --release --bin quantum_self_play -- --max-plies 120 --verbose`
//!
//! Configuration comes from the `QUANTUM_CHESS_*` environment variables;
//! logging is controlled with `RUST_LOG`.

use std::thread;
use std::time::{Duration, Instant};

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use quantum_chess::config::{GameConfig, Opponent};
use quantum_chess::game_state::chess_types::{Coordinate, PieceId};
use quantum_chess::moves::move_generator::moves_for_color;
use quantum_chess::oracle::classical_oracle::ClassicalOracle;
use quantum_chess::turn::turn_controller::{TurnController, TurnOutcome};
use quantum_chess::turn::turn_state::GamePhase;
use quantum_chess::utils::render_board::render_snapshot;

fn parse_arg_u32(flag: &str, default: u32) -> u32 {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            if let Ok(v) = args[i + 1].parse::<u32>() {
                return v.max(1);
            }
        }
    }
    default
}

/// Play one move for the input-driven side: arm now and then, then try
/// generator moves in random order until the oracle accepts one.
fn play_input_side(controller: &mut TurnController, rng: &mut StdRng) -> Result<TurnOutcome, String> {
    let side = controller.turn().current_player;
    let mut candidates: Vec<(PieceId, Coordinate)> = moves_for_color(side, controller.board())
        .into_iter()
        .flat_map(|(id, destinations)| destinations.into_iter().map(move |to| (id.clone(), to)))
        .collect();
    candidates.shuffle(rng);

    if rng.random_bool(0.15) {
        if let Some((id, _)) = candidates.choose(rng) {
            if controller.arm_superposition(id).is_ok() {
                tracing::info!(piece = %id, "harness armed a superposition");
            }
        }
    }

    for (id, to) in candidates {
        controller.select_piece(&id).map_err(|e| e.to_string())?;
        match controller.commit_move(to).map_err(|e| e.to_string())? {
            TurnOutcome::Applied(applied) => return Ok(TurnOutcome::Applied(applied)),
            // An observation changed the board; the candidate list is stale.
            TurnOutcome::Rejected { reason, observed } if !observed.is_empty() => {
                return Ok(TurnOutcome::Rejected { reason, observed });
            }
            _ => continue,
        }
    }
    Err(format!("{side} has no move the oracle accepts"))
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quantum_chess=info".into()),
        )
        .init();

    let max_plies = parse_arg_u32("--max-plies", 200);
    let verbose = std::env::args().any(|a| a == "--verbose" || a == "-v");

    let mut config = GameConfig::from_env();
    config.opponent = Opponent::Ai;
    let seed = config.rng_seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);

    let oracle = ClassicalOracle::new(StdRng::seed_from_u64(seed ^ 0x5eed));
    let mut controller = TurnController::new(config, Box::new(oracle)).map_err(|e| e.to_string())?;
    let results = controller.subscribe_results();
    tracing::info!(seed, max_plies, "self-play started");

    let mut plies = 0;
    while plies < max_plies && controller.turn().phase == GamePhase::InProgress {
        let outcome = if controller.accepts_input() {
            Some(play_input_side(&mut controller, &mut rng)?)
        } else {
            controller.tick(Instant::now()).map_err(|e| e.to_string())?
        };

        match outcome {
            Some(TurnOutcome::Applied(applied)) => {
                plies += 1;
                if verbose {
                    println!(
                        "{plies}: {} {} {}->{}",
                        applied.mover, applied.piece_id, applied.from, applied.to
                    );
                    println!("{}\n", render_snapshot(&controller.snapshot()));
                }
            }
            Some(_) => {}
            // Waiting for the AI's thinking time.
            None => thread::sleep(Duration::from_millis(10)),
        }
    }

    println!("{}", render_snapshot(&controller.snapshot()));
    match results.try_recv() {
        Ok(result) => println!("result: {result}"),
        Err(_) => println!("no result after {plies} plies"),
    }
    Ok(())
}
