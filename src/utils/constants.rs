pub const GRAVITY: f64 = 9.80665; // m/s^2
pub const AIR_GAS_CONSTANT: f64 = 287.05287; // J/(kg·K)
pub const ISA_SEA_LEVEL_TEMP: f64 = 288.15; // K
pub const ISA_SEA_LEVEL_PRESSURE: f64 = 101325.0; // Pa
pub const ISA_SEA_LEVEL_DENSITY: f64 = 1.225; // kg/m^3
pub const ISA_LAPSE_RATE: f64 = -0.0065; // K/m
pub const ISA_TROPOPAUSE_ALTITUDE: f64 = 11000.0; // m

pub const EARTH_RADIUS: f64 = 6378137.0; // m, WGS84 equatorial

/// Default ceiling for linear and angular speed after integration.
pub const SPEED_OF_LIGHT: f64 = 299792458.0; // m/s

pub const NANOS_PER_SECOND: f64 = 1.0e9;

/// Default physics loop period (3 ms).
pub const DEFAULT_PHYSICS_LOOP_PERIOD_NANOS: u64 = 3_000_000;
