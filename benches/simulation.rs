//! Benchmarks for the per-turn hot paths: floor generation, field of view
//! and monster pathfinding.
//!
//! ```bash
//! cargo bench --bench simulation
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use undercroft::{config, generate_dungeon, path_to, ConcreteAction, GameState, WaitAction};

fn bench_generation(c: &mut Criterion) {
    let mut seed = 0u64;
    c.bench_function("generate_dungeon 80x43", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            generate_dungeon(80, 43, 10, 5, 10, black_box(4), seed)
        })
    });
}

fn bench_visibility(c: &mut Criterion) {
    let mut map = generate_dungeon(80, 43, 10, 5, 10, 1, 42).expect("generates");
    let observer = map.player_start;

    c.bench_function("update_visibility radius 8", |b| {
        b.iter(|| map.update_visibility(black_box(observer), config::FOV_RADIUS))
    });
}

fn bench_pathfinding(c: &mut Criterion) {
    let map = generate_dungeon(80, 43, 10, 5, 10, 1, 42).expect("generates");
    let from = map.player_start;
    let to = map.down_stairs.expect("stairs");

    c.bench_function("path start to stairs", |b| {
        b.iter(|| path_to(&map, black_box(from), black_box(to)))
    });
}

fn bench_turn(c: &mut Criterion) {
    let state = GameState::new(42).expect("new game");
    let wait = ConcreteAction::Wait(WaitAction {
        actor: state.player_id,
    });

    c.bench_function("full turn (wait)", |b| {
        b.iter_batched(
            || state.clone(),
            |mut state| state.process_player_action(&wait),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_generation,
    bench_visibility,
    bench_pathfinding,
    bench_turn
);
criterion_main!(benches);
