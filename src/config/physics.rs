use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ConfigError;
use crate::physics::{
    ExternalPhysicsEngine, FastPhysicsEngine, FastPhysicsSettings, PhysicsEngine, SpeedLimits,
};
use crate::utils::{
    nanos_to_secs, Clock, ScalableClock, SteppableClock, DEFAULT_PHYSICS_LOOP_PERIOD_NANOS,
};

/// Physics engine, clock and loop timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// `""` runs without an engine.
    pub physics_engine_name: String,
    pub clock_type: String,
    /// Simulated seconds per wall clock second.
    pub clock_speed: f64,
    pub physics_loop_period_nanos: u64,
    pub enable_ground_lock: bool,
    /// Engine wind, world frame (m/s)
    pub wind: Vector3<f64>,
    pub speed_limits: SpeedLimits,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            physics_engine_name: "FastPhysicsEngine".to_string(),
            clock_type: "ScalableClock".to_string(),
            clock_speed: 1.0,
            physics_loop_period_nanos: DEFAULT_PHYSICS_LOOP_PERIOD_NANOS,
            enable_ground_lock: true,
            wind: Vector3::zeros(),
            speed_limits: SpeedLimits::default(),
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.clock_speed.is_finite() || self.clock_speed <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "clock_speed must be positive, got {}",
                self.clock_speed
            )));
        }
        if self.physics_loop_period_nanos == 0 {
            return Err(ConfigError::Validation(
                "physics_loop_period_nanos must be non-zero".into(),
            ));
        }
        let limits = &self.speed_limits;
        if limits.max_linear_speed <= 0.0 || limits.max_angular_speed <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "speed ceilings must be positive: {:?}",
                limits
            )));
        }
        Ok(())
    }

    pub fn fast_physics_settings(&self) -> FastPhysicsSettings {
        FastPhysicsSettings {
            enable_ground_lock: self.enable_ground_lock,
            wind: self.wind,
            speed_limits: self.speed_limits,
        }
    }

    /// `Ok(None)` when the engine name is empty.
    pub fn create_engine(&self) -> Result<Option<Box<dyn PhysicsEngine>>, ConfigError> {
        match self.physics_engine_name.as_str() {
            "" => Ok(None),
            "FastPhysicsEngine" => Ok(Some(Box::new(FastPhysicsEngine::new(
                self.fast_physics_settings(),
            )))),
            "ExternalPhysicsEngine" => {
                let mut engine = ExternalPhysicsEngine::new();
                engine.set_wind(self.wind);
                Ok(Some(Box::new(engine)))
            }
            other => Err(ConfigError::UnknownEngine(other.to_string())),
        }
    }

    /// A steppable clock advances one loop period, scaled by clock speed, per tick.
    pub fn create_clock(&self) -> Result<Arc<dyn Clock>, ConfigError> {
        match self.clock_type.as_str() {
            "" | "ScalableClock" => Ok(Arc::new(ScalableClock::new(self.clock_speed))),
            "SteppableClock" => Ok(Arc::new(SteppableClock::new(
                nanos_to_secs(self.physics_loop_period_nanos) * self.clock_speed,
            ))),
            other => Err(ConfigError::UnknownClockType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_engine_selection() {
        let mut config = PhysicsConfig::default();
        let engine = config.create_engine().unwrap().unwrap();
        assert_eq!(engine.name(), "FastPhysicsEngine");

        config.physics_engine_name = "ExternalPhysicsEngine".into();
        let engine = config.create_engine().unwrap().unwrap();
        assert_eq!(engine.name(), "ExternalPhysicsEngine");

        config.physics_engine_name = String::new();
        assert!(config.create_engine().unwrap().is_none());

        config.physics_engine_name = "PhysX".into();
        assert!(matches!(
            config.create_engine(),
            Err(ConfigError::UnknownEngine(name)) if name == "PhysX"
        ));
    }

    #[test]
    fn test_steppable_clock_step_follows_period() {
        let config = PhysicsConfig {
            clock_type: "SteppableClock".into(),
            clock_speed: 2.0,
            ..PhysicsConfig::default()
        };
        let clock = config.create_clock().unwrap();
        assert_eq!(clock.now_nanos(), 0);

        clock.step();
        assert_relative_eq!(nanos_to_secs(clock.now_nanos()), 0.006, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_clock_rejected() {
        let config = PhysicsConfig {
            clock_type: "Sundial".into(),
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            config.create_clock(),
            Err(ConfigError::UnknownClockType(_))
        ));
    }

    #[test]
    fn test_validation() {
        assert!(PhysicsConfig::default().validate().is_ok());

        let config = PhysicsConfig {
            clock_speed: 0.0,
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
