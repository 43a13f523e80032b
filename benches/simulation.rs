//! Simulation benchmarks
//!
//! Fuel physics and grid rebuild at various fuel counts, plus full-match
//! ticks with AI-driven robots.
//!
//! Run with: cargo bench --bench simulation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fuel_match_sim::config::{MatchMode, PhysicsConfig, SimConfig};
use fuel_match_sim::game::constants::grid::{COLUMNS, ROWS};
use fuel_match_sim::game::constants::timing::DT;
use fuel_match_sim::game::field::Field;
use fuel_match_sim::game::fuel::{Fuel, FuelSource};
use fuel_match_sim::game::spatial::FuelGrid;
use fuel_match_sim::game::state::Simulation;
use fuel_match_sim::game::systems::physics;
use fuel_match_sim::util::vec2::Vec2;
use rand::{Rng, SeedableRng};

/// Fuel spread over the whole field, half of it rolling
fn create_fuels(field: &Field, count: usize) -> Vec<Fuel> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    (0..count)
        .map(|i| {
            let position = Vec2::new(
                rng.gen_range(10.0..field.width() - 10.0),
                rng.gen_range(10.0..field.length() - 10.0),
            );
            let fuel = Fuel::grounded(position, FuelSource::Scatter);
            if i % 2 == 0 {
                fuel.with_velocity(Vec2::new(rng.gen_range(-120.0..120.0), rng.gen_range(-120.0..120.0)))
            } else {
                fuel
            }
        })
        .collect()
}

/// Benchmark fuel integration and wall containment
fn bench_fuel_physics(c: &mut Criterion) {
    let mut group = c.benchmark_group("fuel_physics");
    group.sample_size(50);
    let field = Field::default();
    let config = PhysicsConfig::default();

    for count in [200, 500, 1000, 2000] {
        let template = create_fuels(&field, count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("update", count), &count, |b, _| {
            b.iter_batched(
                || template.clone(),
                |mut fuels| {
                    physics::update(&mut fuels, &config, &field, DT);
                    black_box(fuels)
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

/// Benchmark spatial grid rebuild
fn bench_fuel_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("fuel_grid");
    group.sample_size(50);
    let field = Field::default();

    for count in [200, 500, 1000, 2000] {
        let fuels = create_fuels(&field, count);
        let mut grid = FuelGrid::new(field.width(), field.length(), COLUMNS, ROWS);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("rebuild", count), &count, |b, _| {
            b.iter(|| {
                grid.rebuild(fuels.iter().enumerate().map(|(i, f)| (i, f.position)));
                black_box(grid.stats())
            })
        });
    }
    group.finish();
}

/// Benchmark one second of match time with every seat AI-driven
fn bench_match_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_ticks");
    group.sample_size(20);

    for mode in [MatchMode::OneVsOne, MatchMode::ThreeVsThree] {
        let config = SimConfig {
            seed: Some(42),
            ..SimConfig::default()
        }
        .with_mode(mode);

        group.throughput(Throughput::Elements(60));
        group.bench_with_input(BenchmarkId::new("one_second", mode), &mode, |b, _| {
            b.iter_batched(
                || Simulation::new(config.clone()).expect("default config is valid"),
                |mut sim| {
                    for _ in 0..60 {
                        black_box(sim.step());
                    }
                    sim
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fuel_physics, bench_fuel_grid, bench_match_ticks,);

criterion_main!(benches);
