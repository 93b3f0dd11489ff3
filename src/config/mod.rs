mod error;
mod physics;
mod simulation;

pub use error::ConfigError;
pub use physics::PhysicsConfig;
pub use simulation::{SimulationConfig, VehicleConfig};
