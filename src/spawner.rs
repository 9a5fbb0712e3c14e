use crate::{
    body::{Body, BodyHandle, InitialVelocity},
    color::palette_color,
    config::{GalaxyOptions, UniformFieldOptions},
    error::SimError,
    simulation::Simulation,
    vector::{Vector2, Vector2Ext},
};

use log::info;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Scale applied to the tangential bias of a uniform field.
pub const BIAS_FACTOR: f64 = 0.001;

#[inline]
fn random_between(rng: &mut fastrand::Rng, min: f64, max: f64) -> f64 {
    min + rng.f64() * (max - min)
}

/// Uniformly distributed point inside a disc of `radius` around the origin.
pub fn random_in_disc(rng: &mut fastrand::Rng, radius: f64) -> Vector2 {
    let angle = rng.f64() * TAU;
    let r = radius * rng.f64().sqrt();
    Vector2::from_angle(angle, r)
}

/// Random tangential velocity around `center`, growing with the distance to it.
/// Each axis draws its own magnitude.
fn tangential_bias(rng: &mut fastrand::Rng, pos: Vector2, center: Vector2, strength: f64) -> Vector2 {
    let offset = pos - center;
    let angle = offset.y.atan2(offset.x) + FRAC_PI_2;
    let limit = offset.mag() * strength * BIAS_FACTOR;

    Vector2::new(
        angle.cos() * random_between(rng, 0.0, limit),
        angle.sin() * random_between(rng, 0.0, limit),
    )
}

/// Velocity of a circular orbit around `center` at `pos`.
///
/// The enclosed mass grows with `(r / galaxy_radius)^3` up to the full
/// `galaxy_mass` at the rim. The direction is the radius vector turned a
/// quarter counter-clockwise.
pub fn orbital_velocity(
    pos: Vector2,
    center: Vector2,
    gravity: f64,
    galaxy_mass: f64,
    galaxy_radius: f64,
) -> Vector2 {
    let offset = pos - center;
    let r = offset.mag();
    if r == 0.0 {
        return Vector2::zero();
    }

    let enclosed = galaxy_mass * (r / galaxy_radius).powi(3).min(1.0);
    let speed = (gravity * enclosed / r).max(0.0).sqrt();
    offset.rotated(FRAC_PI_2) * (speed / r)
}

/// Adds `options.count` bodies scattered over a rectangle.
///
/// Each body gets a mass in `[min_mass, max_mass]` and a kinetic energy in
/// `[0, max_kinetic_energy]` moving in a random direction, plus an optional
/// tangential bias around the area center. Colors follow the radial palette.
pub fn spawn_uniform_field(
    sim: &mut Simulation,
    options: &UniformFieldOptions,
) -> Result<Vec<BodyHandle>, SimError> {
    options.validate()?;

    let area = options.area;
    let center = area.center();
    let extent = area.half_diagonal();
    let density = sim.density();
    let rng = &mut sim.rng;

    let mut bodies = Vec::with_capacity(options.count);
    for _ in 0..options.count {
        let mass = random_between(rng, options.min_mass, options.max_mass);
        let energy = random_between(rng, 0.0, options.max_kinetic_energy);
        let pos = Vector2::new(
            area.x + rng.f64() * area.width,
            area.y + rng.f64() * area.height,
        );

        let mut vel = InitialVelocity::FromKineticEnergy(energy).resolve(mass, rng)?;
        if options.bias_strength != 0.0 {
            vel += tangential_bias(rng, pos, center, options.bias_strength);
        }

        let color = palette_color(center, extent, pos);
        bodies.push(Body::new(pos, vel, mass, density, color)?);
    }

    let handles = sim.insert_all(bodies);
    info!(
        "spawned uniform field of {} bodies, {} total",
        handles.len(),
        sim.len()
    );
    Ok(handles)
}

/// Adds `options.count` bodies on roughly circular orbits inside a disc.
///
/// Orbit speeds are scaled by `options.speed` and perturbed by a random
/// velocity of magnitude up to `options.temperature`. The galaxy mass used for
/// the orbits is the expected total, `count * (min_mass + max_mass) / 2`.
pub fn spawn_galaxy(
    sim: &mut Simulation,
    options: &GalaxyOptions,
) -> Result<Vec<BodyHandle>, SimError> {
    options.validate()?;

    let gravity = sim.gravity();
    let density = sim.density();
    let galaxy_mass = (options.min_mass + options.max_mass) * 0.5 * options.count as f64;
    let rng = &mut sim.rng;

    let mut bodies = Vec::with_capacity(options.count);
    for _ in 0..options.count {
        let mass = random_between(rng, options.min_mass, options.max_mass);
        let pos = options.center + random_in_disc(rng, options.radius);
        let thermal = random_in_disc(rng, options.temperature);
        let vel = orbital_velocity(pos, options.center, gravity, galaxy_mass, options.radius)
            * options.speed
            + thermal;

        let color = palette_color(options.center, options.radius, pos);
        bodies.push(Body::new(pos, vel, mass, density, color)?);
    }

    let handles = sim.insert_all(bodies);
    info!(
        "spawned galaxy of {} bodies at ({}, {}), {} total",
        handles.len(),
        options.center.x,
        options.center.y,
        sim.len()
    );
    Ok(handles)
}
