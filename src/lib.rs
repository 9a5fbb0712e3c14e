pub mod body;
pub mod c_api;
pub mod color;
pub mod config;
pub mod error;
pub mod simulation;
pub mod spawner;
pub mod vector;

pub use body::{Body, BodyHandle, BodyView, InitialVelocity};
pub use config::{Area, GalaxyOptions, ScenarioConfig, SimulationConfig, UniformFieldOptions};
pub use error::SimError;
pub use simulation::Simulation;
pub use vector::{Vector2, Vector2Ext};
