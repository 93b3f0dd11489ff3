use nalgebra::{Matrix3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::state::Pose;
use crate::utils::{clip_norm, SPEED_OF_LIGHT};

/// Safety ceilings on the integrated twist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimits {
    pub max_linear_speed: f64,
    pub max_angular_speed: f64,
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self {
            max_linear_speed: SPEED_OF_LIGHT,
            max_angular_speed: SPEED_OF_LIGHT,
        }
    }
}

/// Euler's rotation equation: `I⁻¹ (τ − ω × (I ω))`
pub fn angular_acceleration(
    inertia: &Matrix3<f64>,
    inertia_inv: &Matrix3<f64>,
    torque: &Vector3<f64>,
    angular_velocity: &Vector3<f64>,
) -> Vector3<f64> {
    let angular_momentum = inertia * angular_velocity;
    let angular_momentum_rate = torque - angular_velocity.cross(&angular_momentum);
    inertia_inv * angular_momentum_rate
}

/// Trapezoidal velocity update, `v + 0.5 (a_prev + a_next) dt`.
#[inline]
pub fn verlet_velocity(
    velocity: &Vector3<f64>,
    prev_acceleration: &Vector3<f64>,
    next_acceleration: &Vector3<f64>,
    dt: f64,
) -> Vector3<f64> {
    velocity + (prev_acceleration + next_acceleration) * (0.5 * dt)
}

/// Rescales `velocity` to `max_speed` when it exceeds it and zeroes the matching acceleration.
pub fn apply_speed_limit(
    velocity: &mut Vector3<f64>,
    acceleration: &mut Vector3<f64>,
    max_speed: f64,
) -> bool {
    let clipped = clip_norm(velocity, max_speed);
    if clipped {
        *acceleration = Vector3::zeros();
    }
    clipped
}

/// Advances a pose by the average twist over `dt`.
///
/// Angular velocity is body frame, so the increment composes on the right:
/// `q_next = q_prev * Δq`.
pub fn compute_next_pose(
    dt: f64,
    current: &Pose,
    avg_linear: &Vector3<f64>,
    avg_angular: &Vector3<f64>,
) -> Pose {
    let position = current.position + avg_linear * dt;

    let angle_per_unit = avg_angular.norm();
    if angle_per_unit.is_nan() || angle_per_unit <= f64::EPSILON {
        // undefined axis
        return Pose::new(position, current.orientation);
    }

    let axis = Unit::new_unchecked(avg_angular / angle_per_unit);
    let delta = UnitQuaternion::from_axis_angle(&axis, angle_per_unit * dt);
    let mut orientation = current.orientation * delta;

    if orientation.as_ref().coords.iter().any(|v| v.is_nan()) {
        error!(?avg_angular, dt, "orientation had NaN, keeping previous orientation");
        return Pose::new(position, current.orientation);
    }

    orientation.renormalize();
    Pose::new(position, orientation)
}
