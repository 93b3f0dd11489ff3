use thiserror::Error;

use crate::physics::PhysicsError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown physics engine: {0}")]
    UnknownEngine(String),

    #[error("Unknown vehicle type: {0}")]
    UnknownVehicleType(String),

    #[error("Unknown clock type: {0}")]
    UnknownClockType(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

impl From<PhysicsError> for ConfigError {
    fn from(err: PhysicsError) -> Self {
        ConfigError::Validation(err.to_string())
    }
}
