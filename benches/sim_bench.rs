use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gravity_simulation::{GalaxyOptions, Simulation, SimulationConfig, Vector2};

fn galaxy(count: usize) -> Simulation {
    let mut sim = Simulation::with_config(&SimulationConfig {
        seed: Some(0),
        ..SimulationConfig::default()
    })
    .unwrap();

    sim.spawn_galaxy(&GalaxyOptions {
        count,
        min_mass: 0.1,
        max_mass: 0.5,
        center: Vector2::zero(),
        radius: (count as f64).sqrt() * 20.0,
        speed: 1.0,
        temperature: 0.01,
    })
    .unwrap();
    sim
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");
    group.sample_size(10);

    for count in [250, 1000, 2000] {
        let mut sim = galaxy(count);
        // Warmup
        sim.step(0.1);

        group.throughput(Throughput::Elements(sim.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| sim.step(0.1));
        });
    }

    group.finish();
}

fn bench_interact(c: &mut Criterion) {
    let mut group = c.benchmark_group("interact");
    group.sample_size(10);

    for count in [1000, 2000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            // Fresh bodies per batch so merges never shrink the measured set.
            b.iter_batched(
                || galaxy(count),
                |mut sim| {
                    sim.interact();
                    sim
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_interact);
criterion_main!(benches);
