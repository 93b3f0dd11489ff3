use nalgebra::{Matrix3, Vector3};
use rotorsim::environment::ConstantEnvironment;
use rotorsim::state::Pose;
use rotorsim::vehicles::{
    build_aero_body, AeroBodyParams, DirectActuation, RotorParams, RotorVertex, ThrustModel,
    TurningDirection,
};
use rotorsim::PhysicsBody;

pub const TEST_MASS: f64 = 1.0;

/// Unit-mass body with identity inertia and no force contributors
pub fn create_test_ball(pose: Pose) -> PhysicsBody {
    PhysicsBody::new(
        "ball",
        TEST_MASS,
        Matrix3::identity(),
        pose,
        Box::new(ConstantEnvironment::default()),
        Box::new(DirectActuation::new(0)),
    )
    .expect("valid test body")
}

/// A body without gravity or air, for torque-free rotation checks
pub fn create_floating_body(inertia: Matrix3<f64>) -> PhysicsBody {
    PhysicsBody::new(
        "float",
        TEST_MASS,
        inertia,
        Pose::zero(),
        Box::new(ConstantEnvironment::vacuum()),
        Box::new(DirectActuation::new(0)),
    )
    .expect("valid test body")
}

/// Rotor with an instant throttle response and the linear thrust model
pub fn create_simple_rotor(position: Vector3<f64>, direction: TurningDirection) -> RotorVertex {
    let params = RotorParams {
        control_signal_filter_tc: 0.0,
        ..RotorParams::default()
    };
    RotorVertex::new(
        position,
        Vector3::new(0.0, 0.0, -1.0),
        direction,
        params,
        ThrustModel::Simple,
    )
    .expect("valid rotor")
}

/// Four rotor quad in X layout driven by a direct actuation controller
pub fn create_quad(controller: DirectActuation) -> PhysicsBody {
    let arm = 0.2;
    let rotors = vec![
        create_simple_rotor(Vector3::new(arm, arm, 0.0), TurningDirection::Ccw),
        create_simple_rotor(Vector3::new(-arm, -arm, 0.0), TurningDirection::Ccw),
        create_simple_rotor(Vector3::new(arm, -arm, 0.0), TurningDirection::Cw),
        create_simple_rotor(Vector3::new(-arm, arm, 0.0), TurningDirection::Cw),
    ];

    PhysicsBody::new(
        "quad",
        TEST_MASS,
        Matrix3::from_diagonal(&Vector3::new(0.01, 0.01, 0.02)),
        Pose::zero(),
        Box::new(ConstantEnvironment::default()),
        Box::new(controller),
    )
    .expect("valid quad")
    .with_wrench_vertices(rotors.into_iter().map(Into::into).collect())
}

pub fn create_tiltrotor(controller: DirectActuation) -> PhysicsBody {
    build_aero_body(
        "tiltrotor",
        &AeroBodyParams::tri_tiltrotor(),
        Box::new(controller),
        Box::new(ConstantEnvironment::default()),
        Pose::zero(),
    )
    .expect("valid tiltrotor")
}
