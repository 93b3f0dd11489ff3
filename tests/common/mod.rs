#![allow(dead_code)]

mod assertions;
mod fixtures;
mod helpers;

pub use assertions::{
    assert_kinematics_finite, assert_orientation_normalized, assert_pose_eq, assert_position_eq,
};
pub use fixtures::*;
pub use helpers::*;
