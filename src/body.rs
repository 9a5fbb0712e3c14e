use crate::{
    error::{SimError, ensure_finite, ensure_non_negative, ensure_positive},
    vector::{Vector2, Vector2Ext},
};

use std::f64::consts::{PI, TAU};

/// Stable identifier of a body inside a [`Simulation`](crate::Simulation).
///
/// Handles stay valid while other bodies are removed; they are never reused.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

impl BodyHandle {
    /// Handle carried by a body that has not been inserted into a simulation.
    pub const DETACHED: BodyHandle = BodyHandle(u64::MAX);
}

/// How the initial velocity of a new body is chosen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InitialVelocity {
    /// Use this velocity as is.
    Explicit(Vector2),
    /// Derive the speed from a kinetic energy, pointing in a random direction.
    FromKineticEnergy(f64),
}

impl InitialVelocity {
    /// Resolves the variant into a concrete velocity for a body of `mass`.
    pub fn resolve(self, mass: f64, rng: &mut fastrand::Rng) -> Result<Vector2, SimError> {
        match self {
            InitialVelocity::Explicit(vel) => {
                ensure_finite("velocity.x", vel.x)?;
                ensure_finite("velocity.y", vel.y)?;
                Ok(vel)
            }
            InitialVelocity::FromKineticEnergy(energy) => {
                let energy = ensure_non_negative("kinetic energy", energy)?;
                let angle = rng.f64() * TAU;
                Ok(Vector2::from_angle(angle, speed_from_kinetic_energy(energy, mass)))
            }
        }
    }
}

/// Radius of a uniform sphere of the given mass and density.
#[inline]
pub fn radius_for(mass: f64, density: f64) -> f64 {
    (3.0 * mass / (4.0 * PI * density)).cbrt()
}

/// Speed of a body of `mass` carrying kinetic energy `energy`.
#[inline]
pub fn speed_from_kinetic_energy(energy: f64, mass: f64) -> f64 {
    (2.0 * energy / mass).sqrt()
}

/// A gravitating point mass with a visual radius derived from its density.
#[derive(Clone, Copy, Debug)]
pub struct Body {
    /// Position vector.
    pub pos: Vector2,
    /// Velocity vector.
    pub vel: Vector2,
    /// Packed `0xRRGGBB` color.
    pub color: u32,
    /// Force accumulated during the current step.
    force: Vector2,
    mass: f64,
    radius: f64,
    density: f64,
    handle: BodyHandle,
    marked_for_removal: bool,
}

impl Body {
    /// Creates a new body. Fails if `mass` or `density` is not a finite positive
    /// number or if the position is not finite.
    pub fn new(
        pos: Vector2,
        vel: Vector2,
        mass: f64,
        density: f64,
        color: u32,
    ) -> Result<Self, SimError> {
        let mass = ensure_positive("mass", mass)?;
        let density = ensure_positive("density", density)?;
        ensure_finite("position.x", pos.x)?;
        ensure_finite("position.y", pos.y)?;
        ensure_finite("velocity.x", vel.x)?;
        ensure_finite("velocity.y", vel.y)?;

        Ok(Self {
            pos,
            vel,
            color: color & 0xff_ffff,
            force: Vector2::zero(),
            mass,
            radius: radius_for(mass, density),
            density,
            handle: BodyHandle::DETACHED,
            marked_for_removal: false,
        })
    }

    /// Creates a body whose velocity comes from an [`InitialVelocity`].
    pub fn with_initial_velocity(
        pos: Vector2,
        initial: InitialVelocity,
        mass: f64,
        density: f64,
        color: u32,
        rng: &mut fastrand::Rng,
    ) -> Result<Self, SimError> {
        // Validate before drawing from `rng` so a rejected body leaves it untouched.
        let mass = ensure_positive("mass", mass)?;
        ensure_positive("density", density)?;
        ensure_finite("position.x", pos.x)?;
        ensure_finite("position.y", pos.y)?;
        let vel = initial.resolve(mass, rng)?;
        Self::new(pos, vel, mass, density, color)
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    /// Force accumulated so far in the current step.
    pub fn force(&self) -> Vector2 {
        self.force
    }

    pub fn is_marked_for_removal(&self) -> bool {
        self.marked_for_removal
    }

    pub(crate) fn attach(&mut self, handle: BodyHandle) {
        self.handle = handle;
    }

    pub(crate) fn mark_for_removal(&mut self) {
        self.marked_for_removal = true;
    }

    /// Sets the mass and recomputes the radius from the cached density.
    /// Fails, leaving the body unchanged, unless `mass` is finite and positive.
    pub fn set_mass(&mut self, mass: f64) -> Result<(), SimError> {
        let mass = ensure_positive("mass", mass)?;
        self.assign_mass(mass);
        Ok(())
    }

    fn assign_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.radius = radius_for(mass, self.density);
    }

    /// Adds `force` to this step's accumulator.
    #[inline]
    pub fn add_force(&mut self, force: Vector2) {
        self.force += force;
    }

    /// Advances velocity then position with semi-implicit Euler and clears the
    /// force accumulator.
    #[inline]
    pub fn integrate(&mut self, dt: f64) {
        let acc = self.force / self.mass;
        self.vel += acc * dt;
        self.pos += self.vel * dt;
        self.force = Vector2::zero();
    }

    /// Absorbs `other` into this body: summed mass, momentum-weighted velocity,
    /// mass-weighted position and blended color. All weights use the masses
    /// from before the merge.
    pub(crate) fn absorb(&mut self, other: &Body) {
        let (m1, m2) = (other.mass, self.mass);
        let total = m1 + m2;

        self.vel = (other.vel * m1 + self.vel * m2) / total;
        self.pos = (other.pos * m1 + self.pos * m2) / total;
        self.color = crate::color::blend(other.color, m1, self.color, m2);
        // Sum of two positive masses.
        self.assign_mass(total);
    }

    pub fn momentum(&self) -> Vector2 {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.mag_sq()
    }

    /// Read-only snapshot for renderers.
    pub fn view(&self) -> BodyView {
        BodyView {
            handle: self.handle,
            x: self.pos.x,
            y: self.pos.y,
            radius: self.radius,
            color: self.color,
        }
    }
}

/// What a renderer needs to draw a body.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyView {
    pub handle: BodyHandle,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: u32,
}

impl BodyView {
    pub fn position(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}
