use nalgebra::{Matrix3, Vector3};
use tracing::debug;

use super::collision::{CollisionInfo, CollisionResponse, ContactProperties};
use super::error::PhysicsError;
use super::vertex::{DragVertex, VertexContext, WrenchSource};
use crate::environment::{Environment, EnvironmentState};
use crate::state::{KinematicsState, Pose, Wrench};
use crate::utils::{inertia_inverse, StateReporter, TimePoint};
use crate::vehicles::{VehicleApi, WrenchVertex};

/// A rigid body with its force contributors, controller and environment.
pub struct PhysicsBody {
    name: String,
    mass: f64,
    inertia: Matrix3<f64>,
    inertia_inv: Matrix3<f64>,
    restitution: f64,
    friction: f64,

    initial_kinematics: KinematicsState,
    kinematics: KinematicsState,
    wrench: Wrench,
    grounded: bool,
    last_kinematics_time: TimePoint,
    airspeed_body: Vector3<f64>,

    collision_info: CollisionInfo,
    collision_response: CollisionResponse,

    environment: Box<dyn Environment>,
    environment_state: EnvironmentState,
    controller: Box<dyn VehicleApi>,

    wrench_vertices: Vec<WrenchVertex>,
    drag_vertices: Vec<DragVertex>,
}

impl std::fmt::Debug for PhysicsBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsBody")
            .field("name", &self.name)
            .field("mass", &self.mass)
            .field("kinematics", &self.kinematics)
            .field("grounded", &self.grounded)
            .field("wrench_vertices", &self.wrench_vertices.len())
            .field("drag_vertices", &self.drag_vertices.len())
            .finish()
    }
}

impl PhysicsBody {
    /// Validates mass and inertia and caches the inverse inertia.
    pub fn new(
        name: impl Into<String>,
        mass: f64,
        inertia: Matrix3<f64>,
        initial_pose: Pose,
        environment: Box<dyn Environment>,
        controller: Box<dyn VehicleApi>,
    ) -> Result<Self, PhysicsError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidParameter(
                "Mass must be positive".into(),
            ));
        }

        let inertia_inv = inertia_inverse(&inertia).ok_or(PhysicsError::InvalidInertia)?;

        let kinematics = KinematicsState::at_rest(initial_pose);
        kinematics.validate()?;
        let environment_state = environment.state_at(&initial_pose.position);

        Ok(Self {
            name: name.into(),
            mass,
            inertia,
            inertia_inv,
            restitution: 0.55,
            friction: 0.5,
            initial_kinematics: kinematics,
            kinematics,
            wrench: Wrench::zero(),
            grounded: false,
            last_kinematics_time: 0,
            airspeed_body: Vector3::zeros(),
            collision_info: CollisionInfo::default(),
            collision_response: CollisionResponse::default(),
            environment,
            environment_state,
            controller,
            wrench_vertices: Vec::new(),
            drag_vertices: Vec::new(),
        })
    }

    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Index 0 is the aero surface by convention when the vehicle has one.
    pub fn with_wrench_vertices(mut self, vertices: Vec<WrenchVertex>) -> Self {
        self.wrench_vertices = vertices;
        self
    }

    pub fn with_drag_vertices(mut self, vertices: Vec<DragVertex>) -> Self {
        self.drag_vertices = vertices;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inertia(&self) -> &Matrix3<f64> {
        &self.inertia
    }

    pub fn inertia_inv(&self) -> &Matrix3<f64> {
        &self.inertia_inv
    }

    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn contact_properties(&self) -> ContactProperties {
        ContactProperties {
            mass: self.mass,
            inertia_inv: self.inertia_inv,
            restitution: self.restitution,
            friction: self.friction,
        }
    }

    pub fn kinematics(&self) -> &KinematicsState {
        &self.kinematics
    }

    pub fn pose(&self) -> Pose {
        self.kinematics.pose
    }

    pub fn wrench(&self) -> &Wrench {
        &self.wrench
    }

    pub fn set_wrench(&mut self, wrench: Wrench) {
        self.wrench = wrench;
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    pub fn last_kinematics_time(&self) -> TimePoint {
        self.last_kinematics_time
    }

    pub fn set_last_kinematics_time(&mut self, time: TimePoint) {
        self.last_kinematics_time = time;
    }

    pub(crate) fn last_kinematics_time_mut(&mut self) -> &mut TimePoint {
        &mut self.last_kinematics_time
    }

    pub fn airspeed_body(&self) -> Vector3<f64> {
        self.airspeed_body
    }

    /// Set by the drag computation, seen by vertices on their next update.
    pub fn set_airspeed_body(&mut self, airspeed_body: Vector3<f64>) {
        self.airspeed_body = airspeed_body;
    }

    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }

    /// Conditions at the last committed position.
    pub fn environment_state(&self) -> &EnvironmentState {
        &self.environment_state
    }

    pub fn collision_info(&self) -> &CollisionInfo {
        &self.collision_info
    }

    pub fn set_collision_info(&mut self, info: CollisionInfo) {
        self.collision_info = info;
    }

    pub fn collision_response(&self) -> &CollisionResponse {
        &self.collision_response
    }

    pub fn collision_response_mut(&mut self) -> &mut CollisionResponse {
        &mut self.collision_response
    }

    pub fn wrench_vertex_count(&self) -> usize {
        self.wrench_vertices.len()
    }

    /// Panics when `index` is out of range.
    pub fn wrench_vertex(&self, index: usize) -> &WrenchVertex {
        &self.wrench_vertices[index]
    }

    pub fn wrench_vertices(&self) -> &[WrenchVertex] {
        &self.wrench_vertices
    }

    pub fn drag_vertex_count(&self) -> usize {
        self.drag_vertices.len()
    }

    pub fn drag_vertices(&self) -> &[DragVertex] {
        &self.drag_vertices
    }

    /// Pins the servo angle of every tiltable rotor, in rotor order.
    pub fn overwrite_rotor_tilts(&mut self, angles: &[f64]) {
        let tiltables = self.wrench_vertices.iter_mut().filter_map(|v| match v {
            WrenchVertex::TiltableRotor(rotor) => Some(rotor),
            _ => None,
        });
        for (rotor, &angle) in tiltables.zip(angles) {
            rotor.overwrite_tilt(angle);
        }
    }

    /// Recomputes every vertex wrench for the coming integration step.
    pub fn update(&mut self, dt: f64) {
        let context = VertexContext {
            environment: &self.environment_state,
            airspeed_body: self.airspeed_body,
            angular_velocity: self.kinematics.twist.angular,
        };
        for vertex in self.wrench_vertices.iter_mut() {
            vertex.update(dt, &context);
        }
    }

    /// Commits integrated kinematics, then re-commands the actuators.
    pub fn update_kinematics(&mut self, next: KinematicsState) {
        self.kinematics = next;
        self.environment_state = self.environment.state_at(&self.kinematics.pose.position);

        self.controller
            .update(&self.kinematics, &self.environment_state);

        let mut channel = 0;
        let mut signals = Vec::with_capacity(3);
        for vertex in self.wrench_vertices.iter_mut() {
            let width = vertex.actuation_width();
            signals.clear();
            signals.extend((channel..channel + width).map(|i| self.controller.actuation(i)));
            vertex.set_actuation(&signals);
            channel += width;
        }
    }

    /// Teleports the body. Velocities are cleared and the ground lock released.
    pub fn set_pose(&mut self, pose: Pose) {
        debug!(body = %self.name, ?pose, "pose override");
        self.kinematics = KinematicsState::at_rest(pose);
        self.grounded = false;
        self.environment_state = self.environment.state_at(&pose.position);
    }

    pub fn reset(&mut self) {
        self.kinematics = self.initial_kinematics;
        self.wrench = Wrench::zero();
        self.grounded = false;
        self.airspeed_body = Vector3::zeros();
        self.collision_info = CollisionInfo::default();
        self.collision_response.reset();
        self.environment_state = self.environment.state_at(&self.kinematics.pose.position);
        self.controller.reset();

        for vertex in self.wrench_vertices.iter_mut() {
            vertex.reset();
        }
    }

    pub fn report_state(&self, reporter: &mut StateReporter) {
        reporter.start_heading(&self.name);
        reporter.write_vector("Position", &self.kinematics.pose.position);
        reporter.write_orientation("Orientation", &self.kinematics.pose.orientation);
        reporter.write_vector("Lin-Vel", &self.kinematics.twist.linear);
        reporter.write_vector("Ang-Vel", &self.kinematics.twist.angular);
        reporter.write_vector("Lin-Accl", &self.kinematics.accelerations.linear);
        reporter.write_vector("Ang-Accl", &self.kinematics.accelerations.angular);
        reporter.write_vector("Airspeed", &self.airspeed_body);
        reporter.write_value("Air density", self.environment_state.air_density);
        reporter.write_value("Collisions", self.collision_response.collision_count_raw);

        for (index, vertex) in self.wrench_vertices.iter().enumerate() {
            reporter.start_heading(&format!("{} {}", vertex.kind(), index));
            vertex.report_state(reporter);
            reporter.end_heading();
        }
        reporter.end_heading();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::ConstantEnvironment;
    use crate::vehicles::{
        DirectActuation, RotorParams, RotorVertex, ThrustModel, TurningDirection,
    };
    use nalgebra::UnitQuaternion;

    fn body_with_controller(controller: DirectActuation) -> PhysicsBody {
        let rotor = RotorVertex::new(
            Vector3::new(0.2, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            TurningDirection::Cw,
            RotorParams::default(),
            ThrustModel::Simple,
        )
        .unwrap();
        PhysicsBody::new(
            "test",
            1.0,
            Matrix3::identity(),
            Pose::zero(),
            Box::new(ConstantEnvironment::default()),
            Box::new(controller),
        )
        .unwrap()
        .with_wrench_vertices(vec![rotor.clone().into(), rotor.into()])
    }

    #[test]
    fn test_invalid_mass_and_inertia_rejected() {
        let make = |mass: f64, inertia: Matrix3<f64>| {
            PhysicsBody::new(
                "bad",
                mass,
                inertia,
                Pose::zero(),
                Box::new(ConstantEnvironment::default()),
                Box::new(DirectActuation::new(0)),
            )
        };

        assert!(matches!(
            make(0.0, Matrix3::identity()),
            Err(PhysicsError::InvalidParameter(_))
        ));
        assert!(matches!(
            make(1.0, Matrix3::from_diagonal(&Vector3::new(1.0, 0.0, 1.0))),
            Err(PhysicsError::InvalidInertia)
        ));
    }

    #[test]
    fn test_nan_initial_pose_rejected() {
        let result = PhysicsBody::new(
            "nan",
            1.0,
            Matrix3::identity(),
            Pose::nan_pose(),
            Box::new(ConstantEnvironment::default()),
            Box::new(DirectActuation::new(0)),
        );
        assert!(matches!(result, Err(PhysicsError::InvalidState(_))));
    }

    #[test]
    fn test_inverse_inertia_is_cached() {
        let body = body_with_controller(DirectActuation::new(0));
        assert_eq!(body.inertia() * body.inertia_inv(), Matrix3::identity());
    }

    #[test]
    fn test_actuation_is_distributed_in_vertex_order() {
        let controller = DirectActuation::with_signals(vec![0.25, 0.0, 0.75, 0.0]);
        let mut body = body_with_controller(controller);

        body.update_kinematics(KinematicsState::default());

        let input = |body: &PhysicsBody, i: usize| match body.wrench_vertex(i) {
            WrenchVertex::FixedRotor(rotor) => rotor.output().control_signal_input,
            _ => unreachable!(),
        };
        // control signals are latched, not yet filtered
        assert_eq!(input(&body, 0), 0.0);

        body.update(0.01);
        assert_eq!(input(&body, 0), 0.25);
        assert_eq!(input(&body, 1), 0.75);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut body = body_with_controller(DirectActuation::new(4));
        let mut moved = KinematicsState::default();
        moved.pose.position = Vector3::new(1.0, 2.0, 3.0);
        moved.twist.linear = Vector3::new(1.0, 0.0, 0.0);
        body.update_kinematics(moved);
        body.set_grounded(true);
        body.collision_response_mut().collision_count_raw = 4;

        body.reset();

        assert_eq!(*body.kinematics(), KinematicsState::default());
        assert!(!body.is_grounded());
        assert_eq!(body.collision_response().collision_count_raw, 0);
    }

    #[test]
    fn test_set_pose_clears_twist() {
        let mut body = body_with_controller(DirectActuation::new(4));
        let mut moving = KinematicsState::default();
        moving.twist.linear = Vector3::new(0.0, 0.0, 5.0);
        body.update_kinematics(moving);
        body.set_grounded(true);

        let target = Pose::new(
            Vector3::new(0.0, 0.0, -10.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, 1.0),
        );
        body.set_pose(target);

        assert_eq!(body.pose(), target);
        assert_eq!(body.kinematics().twist.linear, Vector3::zeros());
        assert!(!body.is_grounded());
    }
}
