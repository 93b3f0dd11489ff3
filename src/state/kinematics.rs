use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::error::StateError;

/// Position and orientation of a body in the world (NED) frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3<f64>,
    /// Body to world rotation.
    pub orientation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::zero()
    }
}

impl Pose {
    pub fn new(position: Vector3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn zero() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
        }
    }

    /// A pose with every field set to NaN, used as the "nothing committed yet" marker.
    pub fn nan_pose() -> Self {
        Self {
            position: Vector3::repeat(f64::NAN),
            orientation: UnitQuaternion::new_unchecked(nalgebra::Quaternion::new(
                f64::NAN,
                f64::NAN,
                f64::NAN,
                f64::NAN,
            )),
        }
    }

    pub fn has_nan(&self) -> bool {
        self.position.iter().any(|v| v.is_nan())
            || self.orientation.as_ref().coords.iter().any(|v| v.is_nan())
    }
}

/// Linear velocity (world frame) and angular velocity (body frame).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Twist {
    pub linear: Vector3<f64>,
    pub angular: Vector3<f64>,
}

impl Twist {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Accelerations cached from the previous step for the Verlet update.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Accelerations {
    pub linear: Vector3<f64>,
    pub angular: Vector3<f64>,
}

impl Accelerations {
    pub fn zero() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KinematicsState {
    pub pose: Pose,
    pub twist: Twist,
    pub accelerations: Accelerations,
}

impl KinematicsState {
    pub fn at_rest(pose: Pose) -> Self {
        Self {
            pose,
            twist: Twist::zero(),
            accelerations: Accelerations::zero(),
        }
    }

    pub fn has_nan(&self) -> bool {
        self.pose.has_nan()
            || self
                .twist
                .linear
                .iter()
                .chain(self.twist.angular.iter())
                .chain(self.accelerations.linear.iter())
                .chain(self.accelerations.angular.iter())
                .any(|v| v.is_nan())
    }

    /// Rejects states that would poison further integration.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.has_nan() {
            return Err(StateError::NonFinite(format!(
                "kinematics contains NaN: {:?}",
                self
            )));
        }
        Ok(())
    }
}
