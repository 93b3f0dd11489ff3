use nalgebra::{Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::rotor::{RotorOutput, RotorParams, RotorVertex, ThrustModel, TurningDirection};
use crate::physics::{PhysicsError, VertexContext, WrenchSource};
use crate::state::Wrench;
use crate::utils::{FirstOrderFilter, StateReporter};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiltOutput {
    pub rotor_output: RotorOutput,
    pub angle_signal_filtered: f64,
    pub angle_signal_input: f64,
    /// Servo angle (rad)
    pub angle: f64,
}

/// Rotor whose thrust axis swings about a body-fixed axis.
///
/// The tilt command goes through two lags: the signal filter and the slower
/// servo filter on the resulting angle.
#[derive(Debug, Clone)]
pub struct TiltableRotor {
    rotor: RotorVertex,
    normal_nominal: Vector3<f64>,
    normal_current: Vector3<f64>,
    rotation_axis: Unit<Vector3<f64>>,
    max_angle: f64,
    angle_signal_filter: FirstOrderFilter,
    angle_filter: FirstOrderFilter,
}

impl TiltableRotor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: Vector3<f64>,
        normal_nominal: Vector3<f64>,
        turning_direction: TurningDirection,
        rotation_axis: Vector3<f64>,
        max_angle: f64,
        params: RotorParams,
        model: ThrustModel,
        angle_signal_filter_tc: f64,
        angle_filter_tc: f64,
    ) -> Result<Self, PhysicsError> {
        let rotor = RotorVertex::new(position, normal_nominal, turning_direction, params, model)?;
        let rotation_axis = Unit::try_new(rotation_axis, 1e-9).ok_or_else(|| {
            PhysicsError::InvalidParameter("tilt rotation axis must be non-zero".into())
        })?;
        let normal_nominal = rotor.normal();

        Ok(Self {
            rotor,
            normal_nominal,
            normal_current: normal_nominal,
            rotation_axis,
            max_angle,
            angle_signal_filter: FirstOrderFilter::new(angle_signal_filter_tc, 0.0, 0.0),
            angle_filter: FirstOrderFilter::new(angle_filter_tc, 0.0, 0.0),
        })
    }

    /// Tilt command in -1..1, scaled to ±max_angle.
    pub fn set_angle_signal(&mut self, signal: f64) {
        self.angle_signal_filter.set_input(signal.clamp(-1.0, 1.0));
    }

    pub fn set_control_signal(&mut self, signal: f64) {
        self.rotor.set_control_signal(signal);
    }

    /// Pins the servo angle, bypassing both filters.
    pub fn overwrite_tilt(&mut self, angle: f64) {
        let angle = angle.clamp(-self.max_angle.abs(), self.max_angle.abs());
        let signal = if self.max_angle.abs() > 0.0 {
            angle / self.max_angle
        } else {
            0.0
        };
        self.angle_signal_filter.set_input(signal);
        self.angle_signal_filter.set_output(signal);
        self.angle_filter.set_input(angle);
        self.angle_filter.set_output(angle);
        self.normal_current = self.tilted_normal(angle);
    }

    pub fn output(&self) -> TiltOutput {
        TiltOutput {
            rotor_output: self.rotor.output(),
            angle_signal_filtered: self.angle_signal_filter.output(),
            angle_signal_input: self.angle_signal_filter.input(),
            angle: self.angle_filter.output(),
        }
    }

    pub fn normal_nominal(&self) -> Vector3<f64> {
        self.normal_nominal
    }

    pub fn rotor(&self) -> &RotorVertex {
        &self.rotor
    }

    fn tilted_normal(&self, angle: f64) -> Vector3<f64> {
        UnitQuaternion::from_axis_angle(&self.rotation_axis, angle) * self.normal_nominal
    }
}

impl WrenchSource for TiltableRotor {
    fn position(&self) -> Vector3<f64> {
        self.rotor.position()
    }

    fn normal(&self) -> Vector3<f64> {
        self.normal_current
    }

    fn wrench(&self) -> Wrench {
        self.rotor.wrench()
    }

    fn update(&mut self, dt: f64, context: &VertexContext<'_>) {
        self.angle_signal_filter.update(dt);
        self.angle_filter
            .set_input(self.max_angle * self.angle_signal_filter.output());
        self.angle_filter.update(dt);
        self.normal_current = self.tilted_normal(self.angle_filter.output());

        let normal = self.normal_current;
        self.rotor.update_along(dt, &normal, context);
    }

    fn reset(&mut self) {
        self.rotor.reset_output();
        self.angle_signal_filter.reset();
        self.angle_filter.reset();
        self.normal_current = self.normal_nominal;
    }

    fn actuation_width(&self) -> usize {
        2
    }

    /// Throttle, then tilt.
    fn set_actuation(&mut self, signals: &[f64]) {
        if let Some(&throttle) = signals.first() {
            self.set_control_signal(throttle);
        }
        if let Some(&tilt) = signals.get(1) {
            self.set_angle_signal(tilt);
        }
    }

    fn report_state(&self, reporter: &mut StateReporter) {
        self.rotor.report_output(reporter);
        reporter.write_value("Angl-in", self.angle_signal_filter.input());
        reporter.write_value("Angl-fl", self.angle_signal_filter.output());
        reporter.write_value("Angle", self.angle_filter.output());
        reporter.write_vector("Normal", &self.normal_current);
    }
}
