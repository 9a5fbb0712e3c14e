use crate::{
    body::{Body, BodyHandle, BodyView, InitialVelocity},
    config::{GalaxyOptions, ScenarioConfig, SimulationConfig, UniformFieldOptions},
    error::SimError,
    spawner,
    vector::Vector2,
};

use log::{debug, info, trace, warn};
use rayon::prelude::*;

/// Owns the bodies of one gravity simulation and advances them step by step.
pub struct Simulation {
    /// Number of completed steps.
    pub frame: usize,
    /// Bodies in iteration order. Order decides which body of a colliding pair
    /// survives.
    bodies: Vec<Body>,
    gravity: f64,
    density: f64,
    /// Whether to integrate on the rayon pool once the body count is large enough.
    parallel: bool,
    next_handle: u64,
    pub(crate) rng: fastrand::Rng,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("frame", &self.frame)
            .field("bodies", &self.bodies)
            .field("gravity", &self.gravity)
            .field("density", &self.density)
            .field("parallel", &self.parallel)
            .field("next_handle", &self.next_handle)
            .field("rng", &"Rng")
            .finish()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::from_parts(&SimulationConfig::default())
    }
}

impl Simulation {
    /// Body count from which the integration pass runs on the rayon pool.
    pub const PARALLEL_THRESHOLD: usize = 4096;

    /// Creates an empty simulation with the given gravitational constant and
    /// body density.
    pub fn new(gravity: f64, density: f64) -> Result<Self, SimError> {
        Self::with_config(&SimulationConfig {
            gravity,
            density,
            ..SimulationConfig::default()
        })
    }

    /// Creates an empty simulation from a validated configuration.
    pub fn with_config(config: &SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    /// Creates a simulation and runs every spawn the scenario lists, fields first.
    pub fn from_scenario(scenario: &ScenarioConfig) -> Result<Self, SimError> {
        let mut sim = Self::with_config(&scenario.simulation)?;
        for field in &scenario.fields {
            sim.spawn_uniform_field(field)?;
        }
        for galaxy in &scenario.galaxies {
            sim.spawn_galaxy(galaxy)?;
        }
        info!(
            "loaded scenario: {} bodies from {} fields and {} galaxies",
            sim.len(),
            scenario.fields.len(),
            scenario.galaxies.len()
        );
        Ok(sim)
    }

    fn from_parts(config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Self {
            frame: 0,
            bodies: Vec::new(),
            gravity: config.gravity,
            density: config.density,
            parallel: config.parallel,
            next_handle: 0,
            rng,
        }
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Sets whether large body sets are integrated in parallel.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.iter().find(|body| body.handle() == handle)
    }

    /// Inserts an already built body and returns its new handle.
    pub fn insert(&mut self, mut body: Body) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        body.attach(handle);
        self.bodies.push(body);
        handle
    }

    pub(crate) fn insert_all(&mut self, bodies: Vec<Body>) -> Vec<BodyHandle> {
        self.bodies.reserve(bodies.len());
        bodies.into_iter().map(|body| self.insert(body)).collect()
    }

    /// Builds and inserts a body. Nothing is inserted if a parameter is invalid.
    pub fn add_body(
        &mut self,
        pos: Vector2,
        mass: f64,
        density: f64,
        color: u32,
        initial: InitialVelocity,
    ) -> Result<BodyHandle, SimError> {
        let body = Body::with_initial_velocity(pos, initial, mass, density, color, &mut self.rng)?;
        Ok(self.insert(body))
    }

    /// Removes a body on external request, returning it if the handle was known.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        match self.bodies.iter().position(|body| body.handle() == handle) {
            Some(index) => Some(self.bodies.remove(index)),
            None => {
                warn!("remove_body: no body with handle {}", handle.0);
                None
            }
        }
    }

    /// Drops every body and resets the frame counter.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.frame = 0;
    }

    pub fn spawn_uniform_field(
        &mut self,
        options: &UniformFieldOptions,
    ) -> Result<Vec<BodyHandle>, SimError> {
        spawner::spawn_uniform_field(self, options)
    }

    pub fn spawn_galaxy(&mut self, options: &GalaxyOptions) -> Result<Vec<BodyHandle>, SimError> {
        spawner::spawn_galaxy(self, options)
    }

    /// Advances the simulation by `dt`.
    /// Resolves all pairwise interactions first, then removes merged bodies and
    /// integrates the survivors. Returns the handles of the removed bodies.
    pub fn step(&mut self, dt: f64) -> Vec<BodyHandle> {
        self.interact();
        let removed = self.integrate(dt);
        self.frame += 1;

        if !removed.is_empty() {
            debug!(
                "frame {}: {} merges, {} bodies left",
                self.frame,
                removed.len(),
                self.bodies.len()
            );
        }
        removed
    }

    /// Pairwise pass over all live pairs `(a, b)` with `a` before `b`.
    ///
    /// Overlapping pairs merge, with `a` absorbed into `b`. Every other pair
    /// exchanges equal and opposite gravitational forces. The overlap test comes
    /// first, so coincident bodies never reach the inverse-square division.
    /// Forces `a` received from earlier pairs in the same pass are kept even if
    /// `a` is absorbed later; they vanish with it.
    pub fn interact(&mut self) {
        let g = self.gravity;
        let n = self.bodies.len();

        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.bodies.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];

                if a.is_marked_for_removal() || b.is_marked_for_removal() {
                    continue;
                }

                let delta = b.pos - a.pos;
                let distance = delta.mag();

                if distance < a.radius() + b.radius() {
                    trace!(
                        "body {} (mass {}) merges into body {} (mass {})",
                        a.handle().0,
                        a.mass(),
                        b.handle().0,
                        b.mass()
                    );
                    a.mark_for_removal();
                    b.absorb(a);
                    continue;
                }

                let magnitude = g * a.mass() * b.mass() / (distance * distance);
                let force = delta * (magnitude / distance);
                a.add_force(force);
                b.add_force(-force);
            }
        }
    }

    /// Removes bodies marked during [`interact`](Self::interact) and integrates
    /// the rest. Returns the removed handles in iteration order.
    pub fn integrate(&mut self, dt: f64) -> Vec<BodyHandle> {
        let removed: Vec<BodyHandle> = self
            .bodies
            .iter()
            .filter(|body| body.is_marked_for_removal())
            .map(Body::handle)
            .collect();

        if !removed.is_empty() {
            self.bodies.retain(|body| !body.is_marked_for_removal());
        }

        // Each body integrates independently, so both paths give identical results.
        if self.parallel && self.bodies.len() >= Self::PARALLEL_THRESHOLD {
            self.bodies.par_iter_mut().for_each(|body| body.integrate(dt));
        } else {
            self.bodies.iter_mut().for_each(|body| body.integrate(dt));
        }

        removed
    }

    /// Render snapshots in iteration order.
    pub fn views(&self) -> impl Iterator<Item = BodyView> + '_ {
        self.bodies.iter().map(Body::view)
    }

    pub fn snapshot(&self) -> Vec<BodyView> {
        self.views().collect()
    }

    /// Mass-weighted centroid of all bodies.
    pub fn center_of_mass(&self) -> Result<Vector2, SimError> {
        if self.bodies.is_empty() {
            return Err(SimError::EmptyInput);
        }

        let (weighted, mass) = self
            .bodies
            .iter()
            .fold((Vector2::zero(), 0.0), |(weighted, mass), body| {
                (weighted + body.pos * body.mass(), mass + body.mass())
            });

        Ok(weighted / mass)
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(Body::mass).sum()
    }

    pub fn total_momentum(&self) -> Vector2 {
        self.bodies
            .iter()
            .fold(Vector2::zero(), |acc, body| acc + body.momentum())
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }
}
