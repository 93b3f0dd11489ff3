use approx::assert_relative_eq;
use nalgebra::{UnitQuaternion, Vector3};
use rotorsim::{KinematicsState, Pose};

/// Assert every kinematic quantity is finite
#[track_caller]
pub fn assert_kinematics_finite(kinematics: &KinematicsState) {
    let vectors = [
        ("position", kinematics.pose.position),
        ("linear velocity", kinematics.twist.linear),
        ("angular velocity", kinematics.twist.angular),
        ("linear acceleration", kinematics.accelerations.linear),
        ("angular acceleration", kinematics.accelerations.angular),
    ];
    for (name, v) in vectors {
        assert!(v.iter().all(|x| x.is_finite()), "{} is not finite: {:?}", name, v);
    }
    assert!(
        kinematics
            .pose
            .orientation
            .as_ref()
            .coords
            .iter()
            .all(|x| x.is_finite()),
        "orientation is not finite"
    );
}

/// Assert the stored quaternion has unit norm
#[track_caller]
pub fn assert_orientation_normalized(orientation: &UnitQuaternion<f64>, epsilon: f64) {
    assert_relative_eq!(orientation.as_ref().norm(), 1.0, epsilon = epsilon);
}

/// Assert that two positions are approximately equal
#[track_caller]
pub fn assert_position_eq(actual: &Vector3<f64>, expected: &Vector3<f64>, epsilon: f64) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(actual.z, expected.z, epsilon = epsilon);
}

/// Assert two poses match in position and orientation
#[track_caller]
pub fn assert_pose_eq(actual: &Pose, expected: &Pose, epsilon: f64) {
    assert_position_eq(&actual.position, &expected.position, epsilon);
    assert_relative_eq!(
        actual.orientation.angle_to(&expected.orientation),
        0.0,
        epsilon = epsilon
    );
}
