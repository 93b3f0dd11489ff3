use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::constants::{
    AIR_GAS_CONSTANT, EARTH_RADIUS, GRAVITY, ISA_LAPSE_RATE, ISA_SEA_LEVEL_DENSITY,
    ISA_SEA_LEVEL_PRESSURE, ISA_SEA_LEVEL_TEMP, ISA_TROPOPAUSE_ALTITUDE,
};

/// Geodetic position, degrees and metres above mean sea level.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

/// Conditions at a single point in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    pub position: Vector3<f64>,
    pub geo_point: GeoPoint,
    /// World frame, NED, so positive z points down.
    pub gravity: Vector3<f64>,
    pub air_density: f64,
    pub air_pressure: f64,
    pub temperature: f64,
    pub wind: Vector3<f64>,
}

impl Default for EnvironmentState {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            geo_point: GeoPoint::default(),
            gravity: Vector3::new(0.0, 0.0, GRAVITY),
            air_density: ISA_SEA_LEVEL_DENSITY,
            air_pressure: ISA_SEA_LEVEL_PRESSURE,
            temperature: ISA_SEA_LEVEL_TEMP,
            wind: Vector3::zeros(),
        }
    }
}

/// Query interface for ambient conditions. Implementations must be side-effect free.
pub trait Environment: Send + Sync {
    fn state_at(&self, position: &Vector3<f64>) -> EnvironmentState;

    fn home_geo_point(&self) -> GeoPoint;
}

/// International Standard Atmosphere over a locally flat earth.
#[derive(Debug, Clone)]
pub struct StandardEnvironment {
    home: GeoPoint,
    wind: Vector3<f64>,
}

impl StandardEnvironment {
    pub fn new(home: GeoPoint, wind: Vector3<f64>) -> Self {
        Self { home, wind }
    }

    /// Temperature, pressure and density at a geometric altitude.
    pub fn isa(altitude: f64) -> (f64, f64, f64) {
        let exponent = -GRAVITY / (ISA_LAPSE_RATE * AIR_GAS_CONSTANT);
        let h = altitude.min(ISA_TROPOPAUSE_ALTITUDE);
        let temperature = ISA_SEA_LEVEL_TEMP + ISA_LAPSE_RATE * h;
        let mut pressure = ISA_SEA_LEVEL_PRESSURE * (temperature / ISA_SEA_LEVEL_TEMP).powf(exponent);

        if altitude > ISA_TROPOPAUSE_ALTITUDE {
            // isothermal layer above the tropopause
            let dh = altitude - ISA_TROPOPAUSE_ALTITUDE;
            pressure *= (-GRAVITY * dh / (AIR_GAS_CONSTANT * temperature)).exp();
        }

        let density = pressure / (AIR_GAS_CONSTANT * temperature);
        (temperature, pressure, density)
    }

    pub fn gravity_at(altitude: f64) -> f64 {
        let ratio = EARTH_RADIUS / (EARTH_RADIUS + altitude.max(-0.5 * EARTH_RADIUS));
        GRAVITY * ratio * ratio
    }

    fn geo_point_at(&self, position: &Vector3<f64>) -> GeoPoint {
        let lat0 = self.home.latitude.to_radians();
        let latitude = self.home.latitude + (position.x / EARTH_RADIUS).to_degrees();
        let cos_lat = lat0.cos().abs().max(1e-9);
        let longitude = self.home.longitude + (position.y / (EARTH_RADIUS * cos_lat)).to_degrees();
        GeoPoint::new(latitude, longitude, self.home.altitude - position.z)
    }
}

impl Default for StandardEnvironment {
    fn default() -> Self {
        Self::new(GeoPoint::default(), Vector3::zeros())
    }
}

impl Environment for StandardEnvironment {
    fn state_at(&self, position: &Vector3<f64>) -> EnvironmentState {
        let geo_point = self.geo_point_at(position);
        let (temperature, air_pressure, air_density) = Self::isa(geo_point.altitude);

        EnvironmentState {
            position: *position,
            geo_point,
            gravity: Vector3::new(0.0, 0.0, Self::gravity_at(geo_point.altitude)),
            air_density,
            air_pressure,
            temperature,
            wind: self.wind,
        }
    }

    fn home_geo_point(&self) -> GeoPoint {
        self.home
    }
}

/// Uniform conditions everywhere.
#[derive(Debug, Clone)]
pub struct ConstantEnvironment {
    pub gravity: Vector3<f64>,
    pub air_density: f64,
    pub wind: Vector3<f64>,
    pub home: GeoPoint,
}

impl ConstantEnvironment {
    pub fn new(gravity: Vector3<f64>, air_density: f64, wind: Vector3<f64>) -> Self {
        Self {
            gravity,
            air_density,
            wind,
            home: GeoPoint::default(),
        }
    }

    /// No gravity, no air.
    pub fn vacuum() -> Self {
        Self::new(Vector3::zeros(), 0.0, Vector3::zeros())
    }
}

impl Default for ConstantEnvironment {
    fn default() -> Self {
        Self::new(
            Vector3::new(0.0, 0.0, GRAVITY),
            ISA_SEA_LEVEL_DENSITY,
            Vector3::zeros(),
        )
    }
}

impl Environment for ConstantEnvironment {
    fn state_at(&self, position: &Vector3<f64>) -> EnvironmentState {
        EnvironmentState {
            position: *position,
            geo_point: GeoPoint::new(
                self.home.latitude,
                self.home.longitude,
                self.home.altitude - position.z,
            ),
            gravity: self.gravity,
            air_density: self.air_density,
            wind: self.wind,
            ..EnvironmentState::default()
        }
    }

    fn home_geo_point(&self) -> GeoPoint {
        self.home
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sea_level_matches_isa() {
        let env = StandardEnvironment::default();
        let state = env.state_at(&Vector3::zeros());

        assert_relative_eq!(state.air_density, ISA_SEA_LEVEL_DENSITY, epsilon = 1e-3);
        assert_relative_eq!(state.air_pressure, ISA_SEA_LEVEL_PRESSURE, epsilon = 1e-6);
        assert_relative_eq!(state.gravity.z, GRAVITY, epsilon = 1e-12);
    }

    #[test]
    fn test_density_decreases_with_altitude() {
        let env = StandardEnvironment::default();
        // NED: negative z is up
        let ground = env.state_at(&Vector3::new(0.0, 0.0, 0.0));
        let high = env.state_at(&Vector3::new(0.0, 0.0, -1000.0));
        let stratosphere = env.state_at(&Vector3::new(0.0, 0.0, -15000.0));

        assert!(ground.air_density > high.air_density);
        assert!(high.air_density > stratosphere.air_density);
        assert_relative_eq!(high.air_density, 1.1117, epsilon = 1e-3);
        assert!(high.gravity.z < ground.gravity.z);
        assert_relative_eq!(stratosphere.temperature, 216.65, epsilon = 1e-6);
    }

    #[test]
    fn test_geo_point_offsets_from_home() {
        let home = GeoPoint::new(47.641468, -122.140165, 122.0);
        let env = StandardEnvironment::new(home, Vector3::new(1.0, 0.0, 0.0));
        let state = env.state_at(&Vector3::new(1000.0, 0.0, -10.0));

        assert!(state.geo_point.latitude > home.latitude);
        assert_relative_eq!(state.geo_point.longitude, home.longitude, epsilon = 1e-12);
        assert_relative_eq!(state.geo_point.altitude, 132.0, epsilon = 1e-12);
        assert_eq!(state.wind, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(env.home_geo_point(), home);
    }

    #[test]
    fn test_constant_environment() {
        let env = ConstantEnvironment::vacuum();
        let state = env.state_at(&Vector3::new(5.0, 5.0, -100.0));
        assert_eq!(state.gravity, Vector3::zeros());
        assert_eq!(state.air_density, 0.0);
        assert_eq!(state.position, Vector3::new(5.0, 5.0, -100.0));
    }
}
