use nalgebra::Vector3;

use crate::physics::body::PhysicsBody;
use crate::physics::error::PhysicsError;
use crate::utils::{Clock, StateReporter};

/// Advances a set of bodies from one clock reading to the next.
pub trait PhysicsEngine: Send {
    fn name(&self) -> &'static str;

    /// Prepares a body for integration; its timestamp is set to the clock's now.
    fn insert(&mut self, body: &mut PhysicsBody, clock: &dyn Clock) -> Result<(), PhysicsError>;

    /// One step for every body, each with its own elapsed time.
    fn update(&mut self, bodies: &mut [PhysicsBody], clock: &dyn Clock);

    fn reset(&mut self, bodies: &mut [PhysicsBody], clock: &dyn Clock) {
        for body in bodies.iter_mut() {
            body.reset();
            body.set_last_kinematics_time(clock.now_nanos());
        }
    }

    /// Engine wind, added to the environment's own wind.
    fn set_wind(&mut self, wind: Vector3<f64>);

    fn report_state(&self, bodies: &[PhysicsBody], reporter: &mut StateReporter) {
        reporter.write_value("Engine", self.name());
        for body in bodies {
            body.report_state(reporter);
        }
    }
}
