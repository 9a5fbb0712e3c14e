use gravity_simulation::{
    Area, Body, InitialVelocity, ScenarioConfig, SimError, Simulation, SimulationConfig,
    UniformFieldOptions, Vector2, body::radius_for,
};

fn seeded(gravity: f64, seed: u64) -> Simulation {
    Simulation::with_config(&SimulationConfig {
        gravity,
        density: 1.0,
        seed: Some(seed),
        parallel: false,
    })
    .unwrap()
}

fn field(count: usize) -> UniformFieldOptions {
    UniformFieldOptions {
        count,
        min_mass: 0.5,
        max_mass: 3.0,
        max_kinetic_energy: 0.2,
        area: Area::new(-400.0, -400.0, 800.0, 800.0),
        bias_strength: 5.0,
    }
}

fn assert_radius_invariant(sim: &Simulation) {
    for body in sim.bodies() {
        let expected = radius_for(body.mass(), body.density());
        assert!(
            (body.radius() - expected).abs() <= 1e-12 * expected.max(1.0),
            "radius {} does not match mass {}",
            body.radius(),
            body.mass()
        );
    }
}

// ==================================================================================
// Merges
// ==================================================================================

#[test]
fn head_on_merge_conserves_mass_and_momentum() {
    let mut sim = seeded(1.0, 0);
    let v1 = Vector2::new(2.0, -1.0);
    let v2 = Vector2::new(-0.5, 0.25);
    sim.add_body(Vector2::new(3.0, 4.0), 10.0, 1.0, 0xff3737, InitialVelocity::Explicit(v1))
        .unwrap();
    let survivor = sim
        .add_body(Vector2::new(3.0, 4.0), 30.0, 1.0, 0x55f7ff, InitialVelocity::Explicit(v2))
        .unwrap();

    let removed = sim.step(1e-3);
    assert_eq!(removed.len(), 1);
    assert_eq!(sim.len(), 1);

    let body = sim.body(survivor).unwrap();
    assert_eq!(body.mass(), 40.0);

    let momentum = v1 * 10.0 + v2 * 30.0;
    let merged = body.vel * 40.0;
    assert!((merged.x - momentum.x).abs() < 1e-12);
    assert!((merged.y - momentum.y).abs() < 1e-12);

    // Centroid of two coincident points, then one tick of straight-line motion.
    let expected = Vector2::new(3.0, 4.0) + body.vel * 1e-3;
    assert!((body.pos - expected).mag() < 1e-12);
    assert_radius_invariant(&sim);
}

#[test]
fn overlapping_merge_lands_on_weighted_centroid() {
    let mut sim = seeded(1.0, 0);
    let zero = InitialVelocity::Explicit(Vector2::zero());
    sim.add_body(Vector2::new(0.0, 0.0), 10.0, 1.0, 0xffffff, zero).unwrap();
    sim.add_body(Vector2::new(2.0, 0.0), 30.0, 1.0, 0xffffff, zero).unwrap();

    sim.step(0.0);
    let body = &sim.bodies()[0];
    assert_eq!(body.pos, Vector2::new(1.5, 0.0));
    assert_eq!(body.color, 0xffffff);
}

#[test]
fn merges_never_change_total_mass() {
    let mut sim = seeded(1.0, 11);
    sim.spawn_uniform_field(&UniformFieldOptions {
        area: Area::new(0.0, 0.0, 40.0, 40.0),
        ..field(200)
    })
    .unwrap();
    let mass = sim.total_mass();

    let mut merged = 0;
    for _ in 0..50 {
        merged += sim.step(0.05).len();
        assert_radius_invariant(&sim);
    }

    assert!(merged > 0, "a dense field should merge");
    assert_eq!(sim.len(), 200 - merged);
    assert!((sim.total_mass() - mass).abs() < 1e-9 * mass);
}

// ==================================================================================
// Gravity
// ==================================================================================

#[test]
fn two_distant_bodies_attract_symmetrically() {
    let mut sim = seeded(1.0, 0);
    let zero = InitialVelocity::Explicit(Vector2::zero());
    sim.add_body(Vector2::new(-5.0, 0.0), 5.0, 1.0, 0, zero).unwrap();
    sim.add_body(Vector2::new(5.0, 0.0), 5.0, 1.0, 0, zero).unwrap();
    sim.interact();

    let [a, b] = [sim.bodies()[0].force(), sim.bodies()[1].force()];
    assert!((a.mag() - 0.25).abs() < 1e-12);
    assert!(a.x > 0.0 && b.x < 0.0);
    assert_eq!(a, -b);

    sim.integrate(0.1);
    assert_eq!(sim.bodies()[0].force(), Vector2::zero());
    assert_eq!(sim.bodies()[1].force(), Vector2::zero());
}

#[test]
fn pairwise_forces_cancel_without_collisions() {
    let mut sim = seeded(0.5, 3);
    for i in 0..12 {
        let angle = i as f64 * 0.7;
        let pos = Vector2::new(angle.cos(), angle.sin()) * (50.0 + 10.0 * i as f64);
        sim.add_body(pos, 1.0 + i as f64, 1.0, 0, InitialVelocity::Explicit(Vector2::zero()))
            .unwrap();
    }
    let momentum = sim.total_momentum();

    sim.step(0.1);
    let after = sim.total_momentum();
    assert_eq!(sim.len(), 12);
    assert!((after - momentum).mag() < 1e-12);
}

#[test]
fn binary_orbit_stays_bound() {
    let mut sim = seeded(1.0, 0);
    // Equal masses on a circular orbit: v = sqrt(G * m / (4 * r)).
    let (m, r) = (100.0_f64, 20.0_f64);
    let v = (m / (4.0 * r)).sqrt();
    sim.add_body(Vector2::new(-r, 0.0), m, 1.0, 0, InitialVelocity::Explicit(Vector2::new(0.0, -v)))
        .unwrap();
    sim.add_body(Vector2::new(r, 0.0), m, 1.0, 0, InitialVelocity::Explicit(Vector2::new(0.0, v)))
        .unwrap();

    for _ in 0..2000 {
        sim.step(0.01);
    }

    let separation = sim.bodies()[0].pos.x - sim.bodies()[1].pos.x;
    let separation = separation.hypot(sim.bodies()[0].pos.y - sim.bodies()[1].pos.y);
    assert_eq!(sim.len(), 2);
    assert!((separation - 2.0 * r).abs() < 0.5, "separation drifted to {separation}");
    assert!(sim.center_of_mass().unwrap().mag() < 1e-9);
}

// ==================================================================================
// Determinism and long runs
// ==================================================================================

#[test]
fn identical_runs_are_bit_identical() {
    let run = |parallel: bool| {
        let mut sim = seeded(1.0, 42);
        sim.set_parallel(parallel);
        sim.spawn_uniform_field(&field(150)).unwrap();
        for _ in 0..100 {
            sim.step(0.5);
        }
        sim.bodies()
            .iter()
            .map(|body| (body.pos.x.to_bits(), body.pos.y.to_bits(), body.mass().to_bits()))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(false), run(false));
    assert_eq!(run(false), run(true));
}

#[test]
fn long_run_only_shrinks() {
    let mut sim = seeded(1.0, 7);
    sim.spawn_uniform_field(&field(500)).unwrap();

    let mut count = sim.len();
    for _ in 0..1000 {
        sim.step(0.1);
        assert!(sim.len() <= count);
        count = sim.len();
    }
    assert!(count > 0);
}

#[test]
fn parallel_integration_matches_sequential() {
    let build = |parallel: bool| {
        let mut sim = seeded(1.0, 9);
        sim.set_parallel(parallel);
        sim.spawn_galaxy(&gravity_simulation::GalaxyOptions {
            count: Simulation::PARALLEL_THRESHOLD + 10,
            min_mass: 0.1,
            max_mass: 0.2,
            center: Vector2::zero(),
            radius: 10_000.0,
            speed: 1.0,
            temperature: 0.1,
        })
        .unwrap();
        sim.integrate(1.0);
        sim.snapshot()
    };

    assert_eq!(build(false), build(true));
}

// ==================================================================================
// Queries and errors
// ==================================================================================

#[test]
fn center_of_mass_requires_bodies() {
    let sim = seeded(1.0, 0);
    assert!(matches!(sim.center_of_mass(), Err(SimError::EmptyInput)));
}

#[test]
fn snapshots_follow_body_state() {
    let mut sim = seeded(1.0, 0);
    let handle = sim
        .add_body(Vector2::new(1.0, 2.0), 8.0, 2.0, 0x36ff33, InitialVelocity::Explicit(Vector2::zero()))
        .unwrap();

    let views = sim.snapshot();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].handle, handle);
    assert_eq!(views[0].position(), Vector2::new(1.0, 2.0));
    assert_eq!(views[0].radius, radius_for(8.0, 2.0));
    assert_eq!(views[0].color, 0x36ff33);
    assert_eq!(sim.views().count(), sim.views().count());
}

#[test]
fn removed_body_is_gone_before_next_step() {
    let mut sim = seeded(1.0, 0);
    let zero = InitialVelocity::Explicit(Vector2::zero());
    let a = sim.add_body(Vector2::new(0.0, 0.0), 1.0, 1.0, 0, zero).unwrap();
    let b = sim.add_body(Vector2::new(0.1, 0.0), 1.0, 1.0, 0, zero).unwrap();

    assert!(sim.remove_body(a).is_some());
    assert!(sim.step(0.1).is_empty());
    assert_eq!(sim.len(), 1);
    assert_eq!(sim.bodies()[0].handle(), b);
}

#[test]
fn inserted_bodies_keep_their_density() {
    let mut sim = seeded(1.0, 0);
    let body = Body::new(Vector2::zero(), Vector2::zero(), 4.0, 8.0, 0).unwrap();
    let handle = sim.insert(body);
    assert_eq!(sim.body(handle).unwrap().density(), 8.0);
}

#[test]
fn scenario_builds_a_populated_simulation() {
    let scenario = ScenarioConfig::from_toml_str(
        r#"
        [simulation]
        gravity = 2.0
        seed = 1

        [[galaxies]]
        count = 30
        min_mass = 1.0
        max_mass = 2.0
        center = [0.0, 0.0]
        radius = 100.0

        [[fields]]
        count = 20
        min_mass = 1.0
        max_mass = 1.0
        max_kinetic_energy = 0.0
        area = { x = 1000.0, y = 1000.0, width = 50.0, height = 50.0 }
        "#,
    )
    .unwrap();

    let sim = Simulation::from_scenario(&scenario).unwrap();
    assert_eq!(sim.gravity(), 2.0);
    assert_eq!(sim.len(), 50);
    assert!(
        sim.bodies()[..20]
            .iter()
            .all(|body| body.vel == Vector2::zero())
    );
}
