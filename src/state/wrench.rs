use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Force and torque acting on a body.
///
/// Vertex wrenches are expressed in the body frame. Once aggregated by the
/// engine the force is rotated into the world frame while the torque stays in
/// the body frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wrench {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
}

impl Wrench {
    pub fn new(force: Vector3<f64>, torque: Vector3<f64>) -> Self {
        Self { force, torque }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn has_nan(&self) -> bool {
        self.force.iter().chain(self.torque.iter()).any(|v| v.is_nan())
    }
}

impl Add for Wrench {
    type Output = Wrench;

    fn add(self, rhs: Wrench) -> Wrench {
        Wrench {
            force: self.force + rhs.force,
            torque: self.torque + rhs.torque,
        }
    }
}

impl AddAssign for Wrench {
    fn add_assign(&mut self, rhs: Wrench) {
        self.force += rhs.force;
        self.torque += rhs.torque;
    }
}

impl Sum for Wrench {
    fn sum<I: Iterator<Item = Wrench>>(iter: I) -> Wrench {
        iter.fold(Wrench::zero(), |acc, w| acc + w)
    }
}
