//! Configuration types for building simulations, loadable from TOML.
//!
//! A scenario looks like:
//!
//! ```toml
//! [simulation]
//! gravity = 0.5
//! density = 2.0
//! seed = 42
//!
//! [[galaxies]]
//! count = 400
//! min_mass = 1.0
//! max_mass = 5.0
//! center = [0.0, 0.0]
//! radius = 300.0
//! speed = 1.0
//! temperature = 0.05
//!
//! [[fields]]
//! count = 200
//! min_mass = 0.5
//! max_mass = 2.0
//! max_kinetic_energy = 1.0
//! area = { x = -500.0, y = -500.0, width = 1000.0, height = 1000.0 }
//! bias_strength = 0.0
//! ```

use crate::{
    error::{SimError, ensure_finite, ensure_non_negative, ensure_positive},
    vector::Vector2,
};

use serde::Deserialize;

/// Global parameters of a simulation.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Gravitational constant, including any unit scaling.
    pub gravity: f64,
    /// Density given to spawned bodies.
    pub density: f64,
    /// Seed for spawning. `None` seeds from the system.
    pub seed: Option<u64>,
    /// Integrate large body sets on the rayon thread pool.
    pub parallel: bool,
}

impl SimulationConfig {
    pub const DEFAULT_GRAVITY: f64 = 1.0;
    pub const DEFAULT_DENSITY: f64 = 1.0;

    pub fn validate(&self) -> Result<(), SimError> {
        ensure_finite("gravity", self.gravity)?;
        ensure_positive("density", self.density)?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: Self::DEFAULT_GRAVITY,
            density: Self::DEFAULT_DENSITY,
            seed: None,
            parallel: true,
        }
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Area {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Area {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Distance from the center to a corner.
    pub fn half_diagonal(&self) -> f64 {
        Vector2::new(self.width, self.height).mag() * 0.5
    }

    fn validate(&self) -> Result<(), SimError> {
        ensure_finite("area.x", self.x)?;
        ensure_finite("area.y", self.y)?;
        ensure_non_negative("area.width", self.width)?;
        ensure_non_negative("area.height", self.height)?;
        Ok(())
    }
}

/// Options for [`spawn_uniform_field`](crate::spawner::spawn_uniform_field).
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UniformFieldOptions {
    pub count: usize,
    pub min_mass: f64,
    pub max_mass: f64,
    /// Upper bound of the kinetic energy sampled per body.
    pub max_kinetic_energy: f64,
    pub area: Area,
    /// Strength of the tangential velocity added around the area center.
    #[serde(default)]
    pub bias_strength: f64,
}

impl UniformFieldOptions {
    pub fn validate(&self) -> Result<(), SimError> {
        validate_mass_range(self.min_mass, self.max_mass)?;
        ensure_non_negative("max_kinetic_energy", self.max_kinetic_energy)?;
        ensure_finite("bias_strength", self.bias_strength)?;
        self.area.validate()
    }
}

/// Options for [`spawn_galaxy`](crate::spawner::spawn_galaxy).
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GalaxyOptions {
    pub count: usize,
    pub min_mass: f64,
    pub max_mass: f64,
    #[serde(with = "vector2_array")]
    pub center: Vector2,
    pub radius: f64,
    /// Multiplier on the circular orbit speed. 1.0 keeps the disk roughly in
    /// balance, larger values make it expand and smaller ones collapse.
    #[serde(default = "default_speed", alias = "speed_factor")]
    pub speed: f64,
    /// Upper bound of the random isotropic velocity added to each body.
    #[serde(default)]
    pub temperature: f64,
}

fn default_speed() -> f64 {
    1.0
}

impl GalaxyOptions {
    pub fn validate(&self) -> Result<(), SimError> {
        validate_mass_range(self.min_mass, self.max_mass)?;
        ensure_finite("center.x", self.center.x)?;
        ensure_finite("center.y", self.center.y)?;
        ensure_positive("radius", self.radius)?;
        ensure_finite("speed", self.speed)?;
        ensure_non_negative("temperature", self.temperature)?;
        Ok(())
    }
}

fn validate_mass_range(min: f64, max: f64) -> Result<(), SimError> {
    ensure_positive("min_mass", min)?;
    ensure_positive("max_mass", max)?;
    if max < min {
        return Err(SimError::InvalidParameter {
            name: "max_mass",
            value: max,
            reason: "must not be below min_mass",
        });
    }
    Ok(())
}

/// Top-level scenario: simulation parameters plus the spawns to run.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub simulation: SimulationConfig,
    pub fields: Vec<UniformFieldOptions>,
    pub galaxies: Vec<GalaxyOptions>,
}

impl ScenarioConfig {
    /// Parses and validates a TOML scenario.
    pub fn from_toml_str(source: &str) -> Result<Self, SimError> {
        let scenario: ScenarioConfig = toml::from_str(source)?;
        scenario.simulation.validate()?;
        for field in &scenario.fields {
            field.validate()?;
        }
        for galaxy in &scenario.galaxies {
            galaxy.validate()?;
        }
        Ok(scenario)
    }
}

/// (De)serializes a [`Vector2`] as `[x, y]`.
mod vector2_array {
    use crate::vector::Vector2;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vector2, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Vector2::new(x, y))
    }
}
