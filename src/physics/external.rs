use nalgebra::Vector3;
use tracing::info;

use crate::physics::body::PhysicsBody;
use crate::physics::error::PhysicsError;
use crate::physics::traits::PhysicsEngine;
use crate::utils::Clock;

/// Engine for hosts that drive poses themselves.
///
/// Nothing is integrated. Each update re-commits the body's current kinematics
/// so controllers and actuators still run once per tick.
#[derive(Debug, Clone, Default)]
pub struct ExternalPhysicsEngine {
    wind: Vector3<f64>,
}

impl ExternalPhysicsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded for reporting only; no forces are computed here.
    pub fn wind(&self) -> Vector3<f64> {
        self.wind
    }
}

impl PhysicsEngine for ExternalPhysicsEngine {
    fn name(&self) -> &'static str {
        "ExternalPhysicsEngine"
    }

    fn insert(&mut self, body: &mut PhysicsBody, clock: &dyn Clock) -> Result<(), PhysicsError> {
        body.set_last_kinematics_time(clock.now_nanos());
        info!(body = body.name(), "body inserted into {}", self.name());
        Ok(())
    }

    fn update(&mut self, bodies: &mut [PhysicsBody], clock: &dyn Clock) {
        for body in bodies.iter_mut() {
            body.set_last_kinematics_time(clock.now_nanos());
            let current = *body.kinematics();
            body.update_kinematics(current);
        }
    }

    fn set_wind(&mut self, wind: Vector3<f64>) {
        self.wind = wind;
    }
}
