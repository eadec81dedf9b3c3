use std::collections::HashSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_snake::core::{place_food, tick, Board, GameSnapshot, GameState, SessionRng};
use tui_snake::types::{Cell, Direction};

/// Four cells chasing their own tail around a 2x2 square; never dies.
fn looping_state() -> GameState {
    let board = Board::new(40, 20).unwrap();
    let cells = [(10, 10), (11, 10), (11, 11), (10, 11)].map(Cell::from);
    GameState::from_layout(board, cells, Direction::Up, Cell::new(0, 0), 0).unwrap()
}

const LOOP: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Left,
    Direction::Up,
];

fn bench_step(c: &mut Criterion) {
    let mut state = looping_state();
    let mut rng = SessionRng::new(12345);
    let mut i = 0;

    c.bench_function("step_steady_state", |b| {
        b.iter(|| {
            let event = state.step(black_box(Some(LOOP[i % 4])), &mut rng);
            i += 1;
            event
        })
    });
}

fn bench_pure_tick(c: &mut Criterion) {
    let state = looping_state();
    let mut rng = SessionRng::new(12345);

    c.bench_function("pure_tick_clone", |b| {
        b.iter(|| tick(black_box(&state), Some(Direction::Right), &mut rng))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let state = looping_state();
    let mut snap = GameSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| state.snapshot_into(black_box(&mut snap)))
    });
}

fn bench_place_food_crowded(c: &mut Criterion) {
    let board = Board::new(32, 32).unwrap();
    // All but eight cells occupied.
    let occupied: HashSet<Cell> = board.cells().skip(8).collect();
    let mut rng = SessionRng::new(7);

    c.bench_function("place_food_8_free_of_1024", |b| {
        b.iter(|| place_food(board, black_box(&occupied), &mut rng))
    });
}

fn bench_place_food_sparse(c: &mut Criterion) {
    let board = Board::new(32, 32).unwrap();
    let occupied: HashSet<Cell> = board.cells().take(16).collect();
    let mut rng = SessionRng::new(7);

    c.bench_function("place_food_sparse", |b| {
        b.iter(|| place_food(board, black_box(&occupied), &mut rng))
    });
}

criterion_group!(
    benches,
    bench_step,
    bench_pure_tick,
    bench_snapshot,
    bench_place_food_crowded,
    bench_place_food_sparse
);
criterion_main!(benches);
