use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::environment::EnvironmentState;
use crate::state::Wrench;
use crate::utils::StateReporter;

/// Inputs a force contributor sees when recomputing its wrench.
#[derive(Debug, Clone, Copy)]
pub struct VertexContext<'a> {
    pub environment: &'a EnvironmentState,
    /// Air-relative velocity of the body, body frame.
    pub airspeed_body: Vector3<f64>,
    /// Body angular velocity, body frame.
    pub angular_velocity: Vector3<f64>,
}

/// A point of application for force and torque on a rigid body.
///
/// Positions and normals are in the body frame, relative to the centre of mass.
/// The wrench is body frame too; the engine adds `position × force` and rotates
/// the force into the world frame.
pub trait WrenchSource {
    fn position(&self) -> Vector3<f64>;

    fn normal(&self) -> Vector3<f64>;

    /// Wrench computed by the last `update`.
    fn wrench(&self) -> Wrench;

    fn update(&mut self, dt: f64, context: &VertexContext<'_>);

    fn reset(&mut self);

    /// Number of actuation channels this vertex consumes.
    fn actuation_width(&self) -> usize;

    /// Receives exactly `actuation_width()` signals.
    fn set_actuation(&mut self, signals: &[f64]);

    fn report_state(&self, reporter: &mut StateReporter);
}

/// A face of the body that generates v² drag when moving into the flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragVertex {
    pub position: Vector3<f64>,
    /// Outward unit normal.
    pub normal: Vector3<f64>,
    /// Area times drag coefficient over two.
    pub drag_factor: f64,
}

impl DragVertex {
    pub fn new(position: Vector3<f64>, normal: Vector3<f64>, drag_factor: f64) -> Self {
        Self {
            position,
            normal,
            drag_factor,
        }
    }
}
