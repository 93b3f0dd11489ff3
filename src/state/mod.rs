mod error;
mod kinematics;
mod wrench;

pub use error::StateError;
pub use kinematics::{Accelerations, KinematicsState, Pose, Twist};
pub use wrench::Wrench;
