use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quantum_chess::game_state::board_index::BoardIndex;
use quantum_chess::game_state::chess_types::Color;
use quantum_chess::moves::move_generator::moves_for_color;
use quantum_chess::oracle::classical_oracle::ClassicalOracle;
use quantum_chess::oracle::legality_oracle::LegalityOracle;
use quantum_chess::oracle::oracle_adapter::placements_for;

fn bench_move_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_generation");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    let board = BoardIndex::standard();

    // Correctness guard before benchmarking.
    let opening: usize = moves_for_color(Color::White, &board)
        .iter()
        .map(|(_, destinations)| destinations.len())
        .sum();
    assert_eq!(opening, 20, "generator disagrees with the opening move count");

    group.throughput(Throughput::Elements(opening as u64));
    group.bench_function("board_index_startpos", |b| {
        b.iter(|| {
            let moves = moves_for_color(black_box(Color::White), black_box(&board));
            black_box(moves.len())
        });
    });

    let mut oracle = ClassicalOracle::new(StdRng::seed_from_u64(0));
    oracle
        .load_position(&placements_for(&board), Color::White)
        .expect("benchmark position should load");
    assert_eq!(oracle.legal_moves().len(), 20);

    group.bench_function("reference_oracle_startpos", |b| {
        b.iter(|| black_box(oracle.legal_moves().len()));
    });

    group.bench_function("board_index_clone", |b| {
        b.iter(|| black_box(board.clone()));
    });

    group.finish();
}

criterion_group!(move_generation_benches, bench_move_generation);
criterion_main!(move_generation_benches);
