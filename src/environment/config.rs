use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::environment::{ConstantEnvironment, Environment, GeoPoint, StandardEnvironment};
use crate::utils::constants::{GRAVITY, ISA_SEA_LEVEL_DENSITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtmosphereType {
    Constant,
    Standard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub atmosphere: AtmosphereType,
    pub home_geo_point: GeoPoint,
    /// Ambient wind, world frame.
    pub wind: Vector3<f64>,
    /// Only used by the constant atmosphere.
    pub air_density: f64,
    /// Only used by the constant atmosphere.
    pub gravity: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            atmosphere: AtmosphereType::Standard,
            home_geo_point: GeoPoint::new(47.641468, -122.140165, 122.0),
            wind: Vector3::zeros(),
            air_density: ISA_SEA_LEVEL_DENSITY,
            gravity: GRAVITY,
        }
    }
}

impl EnvironmentConfig {
    /// Horizontal wind from a speed and the bearing it blows towards, degrees from north.
    pub fn with_constant_wind(wind_speed: f64, wind_direction: f64) -> Self {
        let angle_rad = wind_direction.to_radians();
        Self {
            wind: Vector3::new(
                wind_speed * angle_rad.cos(),
                wind_speed * angle_rad.sin(),
                0.0,
            ),
            ..Self::default()
        }
    }

    pub fn build(&self) -> Box<dyn Environment> {
        match self.atmosphere {
            AtmosphereType::Standard => {
                Box::new(StandardEnvironment::new(self.home_geo_point, self.wind))
            }
            AtmosphereType::Constant => {
                let mut env = ConstantEnvironment::new(
                    Vector3::new(0.0, 0.0, self.gravity),
                    self.air_density,
                    self.wind,
                );
                env.home = self.home_geo_point;
                Box::new(env)
            }
        }
    }
}
