mod config;
mod environment;

pub use config::{AtmosphereType, EnvironmentConfig};
pub use environment::{
    ConstantEnvironment, Environment, EnvironmentState, GeoPoint, StandardEnvironment,
};
