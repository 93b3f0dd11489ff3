use nalgebra::{UnitQuaternion, Vector3};

use crate::physics::vertex::{DragVertex, WrenchSource};
use crate::state::Wrench;

/// Faces moving into the flow slower than this produce no drag.
pub const DRAG_MIN_VELOCITY: f64 = 0.1;

/// Net wrench of all contributors: force in the world frame, torque in the body frame.
///
/// Each vertex adds `position × force` on top of its own torque.
pub fn body_wrench<T: WrenchSource>(vertices: &[T], orientation: &UnitQuaternion<f64>) -> Wrench {
    let mut wrench = Wrench::zero();

    for vertex in vertices {
        let vertex_wrench = vertex.wrench();
        wrench += vertex_wrench;
        wrench.torque += vertex.position().cross(&vertex_wrench.force);
    }

    wrench.force = orientation.transform_vector(&wrench.force);
    wrench
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOutput {
    pub wrench: Wrench,
    /// Air-relative body velocity, body frame.
    pub airspeed_body: Vector3<f64>,
}

/// Quadratic drag over the body's faces, using velocity relative to the wind.
///
/// The linear term of drag is ignored; only `c v²` is modelled.
pub fn drag_wrench(
    drag_vertices: &[DragVertex],
    air_density: f64,
    orientation: &UnitQuaternion<f64>,
    linear_vel: &Vector3<f64>,
    angular_vel_body: &Vector3<f64>,
    wind_world: &Vector3<f64>,
) -> DragOutput {
    let mut wrench = Wrench::zero();

    let relative_vel = linear_vel - wind_world;
    let linear_vel_body = orientation.inverse_transform_vector(&relative_vel);

    for vertex in drag_vertices {
        let vel_vertex = linear_vel_body + angular_vel_body.cross(&vertex.position);
        let vel_comp = vertex.normal.dot(&vel_vertex);

        // faces moving away from the flow are culled
        if vel_comp > DRAG_MIN_VELOCITY {
            let drag_force = vertex.normal * (-vertex.drag_factor * air_density * vel_comp * vel_comp);
            wrench.torque += vertex.position.cross(&drag_force);
            wrench.force += drag_force;
        }
    }

    wrench.force = orientation.transform_vector(&wrench.force);

    DragOutput {
        wrench,
        airspeed_body: linear_vel_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::vertex::VertexContext;
    use crate::utils::StateReporter;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    struct FixedVertex {
        position: Vector3<f64>,
        wrench: Wrench,
    }

    impl WrenchSource for FixedVertex {
        fn position(&self) -> Vector3<f64> {
            self.position
        }
        fn normal(&self) -> Vector3<f64> {
            Vector3::x()
        }
        fn wrench(&self) -> Wrench {
            self.wrench
        }
        fn update(&mut self, _dt: f64, _context: &VertexContext<'_>) {}
        fn reset(&mut self) {}
        fn actuation_width(&self) -> usize {
            0
        }
        fn set_actuation(&mut self, _signals: &[f64]) {}
        fn report_state(&self, _reporter: &mut StateReporter) {}
    }

    #[test]
    fn test_off_center_force_adds_torque() {
        let vertices = vec![
            FixedVertex {
                position: Vector3::new(1.0, 0.0, 0.0),
                wrench: Wrench::new(Vector3::new(0.0, 0.0, -2.0), Vector3::new(0.0, 0.0, 0.1)),
            },
            FixedVertex {
                position: Vector3::new(-1.0, 0.0, 0.0),
                wrench: Wrench::new(Vector3::new(0.0, 0.0, -1.0), Vector3::zeros()),
            },
        ];

        let wrench = body_wrench(&vertices, &UnitQuaternion::identity());

        assert_eq!(wrench.force, Vector3::new(0.0, 0.0, -3.0));
        // (1,0,0) x (0,0,-2) = (0,2,0); (-1,0,0) x (0,0,-1) = (0,-1,0)
        assert_relative_eq!(wrench.torque, Vector3::new(0.0, 1.0, 0.1), epsilon = 1e-12);
    }

    #[test]
    fn test_force_rotated_to_world_torque_kept_in_body() {
        let vertices = vec![FixedVertex {
            position: Vector3::zeros(),
            wrench: Wrench::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)),
        }];
        let yawed = UnitQuaternion::from_euler_angles(0.0, 0.0, PI / 2.0);

        let wrench = body_wrench(&vertices, &yawed);

        assert_relative_eq!(wrench.force, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_eq!(wrench.torque, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_drag_opposes_motion_and_culls_trailing_faces() {
        let faces = vec![
            DragVertex::new(Vector3::new(0.5, 0.0, 0.0), Vector3::x(), 0.2),
            DragVertex::new(Vector3::new(-0.5, 0.0, 0.0), -Vector3::x(), 0.2),
        ];

        let output = drag_wrench(
            &faces,
            1.0,
            &UnitQuaternion::identity(),
            &Vector3::new(10.0, 0.0, 0.0),
            &Vector3::zeros(),
            &Vector3::zeros(),
        );

        assert_relative_eq!(output.wrench.force.x, -0.2 * 100.0, epsilon = 1e-9);
        assert_relative_eq!(output.wrench.torque.norm(), 0.0, epsilon = 1e-12);
        assert_eq!(output.airspeed_body, Vector3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_drag_uses_wind_relative_velocity() {
        let faces = vec![DragVertex::new(Vector3::zeros(), Vector3::x(), 0.5)];
        let output = drag_wrench(
            &faces,
            1.225,
            &UnitQuaternion::identity(),
            &Vector3::new(5.0, 0.0, 0.0),
            &Vector3::zeros(),
            &Vector3::new(5.0, 0.0, 0.0),
        );

        assert_eq!(output.wrench, Wrench::zero());
        assert_eq!(output.airspeed_body, Vector3::zeros());
    }
}
