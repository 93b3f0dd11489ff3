use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::physics::body::PhysicsBody;
use crate::physics::collision::resolve_collision;
use crate::physics::components::{
    angular_acceleration, apply_speed_limit, body_wrench, compute_next_pose, drag_wrench,
    verlet_velocity, SpeedLimits,
};
use crate::physics::error::PhysicsError;
use crate::physics::traits::PhysicsEngine;
use crate::state::{Accelerations, KinematicsState, Twist, Wrench};
use crate::utils::{Clock, StateReporter};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastPhysicsSettings {
    /// Pin bodies that land gently until thrust exceeds weight.
    pub enable_ground_lock: bool,
    /// Engine wind, world frame (m/s)
    pub wind: Vector3<f64>,
    pub speed_limits: SpeedLimits,
}

impl Default for FastPhysicsSettings {
    fn default() -> Self {
        Self {
            enable_ground_lock: true,
            wind: Vector3::zeros(),
            speed_limits: SpeedLimits::default(),
        }
    }
}

/// Verlet integrator with impulse collision response.
#[derive(Debug, Clone, Default)]
pub struct FastPhysicsEngine {
    settings: FastPhysicsSettings,
}

impl FastPhysicsEngine {
    pub fn new(settings: FastPhysicsSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FastPhysicsSettings {
        &self.settings
    }

    pub fn wind(&self) -> Vector3<f64> {
        self.settings.wind
    }

    /// Integrates one body over the time elapsed since its last commit.
    pub fn update_body(&self, body: &mut PhysicsBody, clock: &dyn Clock) {
        let dt = clock.update_since(body.last_kinematics_time_mut());
        let current = *body.kinematics();

        let (mut next, mut next_wrench) = self.next_kinematics_no_collision(dt, body, &current);

        let info = body.collision_info().clone();
        if body.is_grounded() || body.collision_response().is_new(&info) {
            let resolution = resolve_collision(
                dt,
                &info,
                &body.contact_properties(),
                &current,
                &mut next,
                &mut next_wrench,
                self.settings.enable_ground_lock,
            );
            body.collision_response_mut()
                .record(&info, &next, resolution.responded);
            if resolution.grounded {
                debug!(body = body.name(), "ground lock engaged");
                body.set_grounded(true);
            }
        }

        if next.has_nan() {
            error!(
                body = body.name(),
                dt, "next kinematics had NaN, keeping current state"
            );
            body.set_wrench(Wrench::zero());
            body.update_kinematics(current);
            return;
        }

        body.set_wrench(next_wrench);
        body.update_kinematics(next);
    }

    fn next_kinematics_no_collision(
        &self,
        dt: f64,
        body: &mut PhysicsBody,
        current: &KinematicsState,
    ) -> (KinematicsState, Wrench) {
        let orientation = current.pose.orientation;
        let wrench = body_wrench(body.wrench_vertices(), &orientation);
        let environment = *body.environment_state();
        let weight = environment.gravity * body.mass();

        // the release tick still commits the held state
        let was_grounded = body.is_grounded();
        if was_grounded && wrench.force.norm_squared() > weight.norm_squared() {
            debug!(body = body.name(), "thrust exceeds weight, releasing ground lock");
            body.set_grounded(false);
        }

        if was_grounded {
            let next = KinematicsState {
                pose: compute_next_pose(dt, &current.pose, &Vector3::zeros(), &Vector3::zeros()),
                twist: Twist::zero(),
                accelerations: Accelerations::zero(),
            };
            return (next, Wrench::zero());
        }

        let half_dt = 0.5 * dt;
        let avg_linear = current.twist.linear + current.accelerations.linear * half_dt;
        let avg_angular = current.twist.angular + current.accelerations.angular * half_dt;

        let drag = drag_wrench(
            body.drag_vertices(),
            environment.air_density,
            &orientation,
            &avg_linear,
            &avg_angular,
            &(environment.wind + self.settings.wind),
        );
        body.set_airspeed_body(drag.airspeed_body);

        let next_wrench = wrench + drag.wrench;

        let mut next = KinematicsState::default();
        next.accelerations.linear = next_wrench.force / body.mass() + environment.gravity;
        next.accelerations.angular = angular_acceleration(
            body.inertia(),
            body.inertia_inv(),
            &next_wrench.torque,
            &avg_angular,
        );

        next.twist.linear = verlet_velocity(
            &current.twist.linear,
            &current.accelerations.linear,
            &next.accelerations.linear,
            dt,
        );
        next.twist.angular = verlet_velocity(
            &current.twist.angular,
            &current.accelerations.angular,
            &next.accelerations.angular,
            dt,
        );

        let limits = &self.settings.speed_limits;
        if apply_speed_limit(
            &mut next.twist.linear,
            &mut next.accelerations.linear,
            limits.max_linear_speed,
        ) {
            debug!(body = body.name(), "linear speed clipped");
        }
        if apply_speed_limit(
            &mut next.twist.angular,
            &mut next.accelerations.angular,
            limits.max_angular_speed,
        ) {
            debug!(body = body.name(), "angular speed clipped");
        }

        next.pose = compute_next_pose(dt, &current.pose, &avg_linear, &avg_angular);
        (next, next_wrench)
    }
}

impl PhysicsEngine for FastPhysicsEngine {
    fn name(&self) -> &'static str {
        "FastPhysicsEngine"
    }

    fn insert(&mut self, body: &mut PhysicsBody, clock: &dyn Clock) -> Result<(), PhysicsError> {
        body.kinematics().validate()?;
        body.set_last_kinematics_time(clock.now_nanos());
        info!(
            body = body.name(),
            mass = body.mass(),
            "body inserted into {}",
            self.name()
        );
        Ok(())
    }

    fn update(&mut self, bodies: &mut [PhysicsBody], clock: &dyn Clock) {
        for body in bodies.iter_mut() {
            self.update_body(body, clock);
        }
    }

    fn set_wind(&mut self, wind: Vector3<f64>) {
        self.settings.wind = wind;
    }

    fn report_state(&self, bodies: &[PhysicsBody], reporter: &mut StateReporter) {
        reporter.write_value("Engine", self.name());
        reporter.write_value("Ground lock", self.settings.enable_ground_lock);
        reporter.write_vector("Wind", &self.settings.wind);
        for body in bodies {
            body.report_state(reporter);
        }
    }
}
