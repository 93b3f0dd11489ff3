use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::physics::{PhysicsError, VertexContext, WrenchSource};
use crate::state::Wrench;
use crate::utils::{FirstOrderFilter, StateReporter, ISA_SEA_LEVEL_DENSITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurningDirection {
    Cw,
    Ccw,
}

impl TurningDirection {
    /// Sign applied to reaction torque.
    pub fn sign(self) -> f64 {
        match self {
            TurningDirection::Cw => 1.0,
            TurningDirection::Ccw => -1.0,
        }
    }
}

/// Static thrust and torque constants of a rotor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotorParams {
    /// Thrust coefficient.
    pub c_t: f64,
    /// Power coefficient.
    pub c_p: f64,
    /// Density the constants were measured at (kg/m^3)
    pub air_density: f64,
    pub max_rpm: f64,
    /// Propeller diameter (m)
    pub propeller_diameter: f64,
    /// Time constant of the throttle filter (s)
    pub control_signal_filter_tc: f64,
}

impl Default for RotorParams {
    fn default() -> Self {
        Self {
            c_t: 0.109919,
            c_p: 0.040164,
            air_density: ISA_SEA_LEVEL_DENSITY,
            max_rpm: 6396.667,
            propeller_diameter: 0.2286,
            control_signal_filter_tc: 0.005,
        }
    }
}

impl RotorParams {
    pub fn revolutions_per_second(&self) -> f64 {
        self.max_rpm / 60.0
    }

    /// Maximum angular speed (rad/s)
    pub fn max_speed(&self) -> f64 {
        self.revolutions_per_second() * 2.0 * PI
    }

    pub fn max_speed_square(&self) -> f64 {
        let max_speed = self.max_speed();
        max_speed * max_speed
    }

    /// `C_T ρ n² D⁴`
    pub fn max_thrust(&self) -> f64 {
        let n = self.revolutions_per_second();
        self.c_t * self.air_density * n * n * self.propeller_diameter.powi(4)
    }

    /// `C_P ρ n² D⁵ / 2π`
    pub fn max_torque(&self) -> f64 {
        let n = self.revolutions_per_second();
        self.c_p * self.air_density * n * n * self.propeller_diameter.powi(5) / (2.0 * PI)
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.max_rpm <= 0.0 || self.propeller_diameter <= 0.0 || self.air_density <= 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "rotor needs positive max_rpm, diameter and density: {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// Propeller and motor constants for the voltage driven model.
///
/// Default values are for the Aerosonde UAV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropellerParams {
    /// Battery voltage at full throttle (V)
    pub max_voltage: f64,
    /// Propeller diameter (m)
    pub prop_diameter: f64,
    /// Motor resistance (ohm)
    pub motor_resistance: f64,
    /// Motor torque constant (N m / A)
    pub motor_kq: f64,
    /// No-load current (A)
    pub no_load_current: f64,
    pub ct0: f64,
    pub ct1: f64,
    pub ct2: f64,
    pub cq0: f64,
    pub cq1: f64,
    pub cq2: f64,
}

impl Default for PropellerParams {
    fn default() -> Self {
        Self {
            max_voltage: 44.4,
            prop_diameter: 0.508,
            motor_resistance: 0.042,
            motor_kq: 0.0659,
            no_load_current: 1.5,
            ct0: 0.09357,
            ct1: -0.06044,
            ct2: -0.1079,
            cq0: 0.005230,
            cq1: 0.004970,
            cq2: -0.01664,
        }
    }
}

/// Motor/propeller equilibrium at a throttle setting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OperatingPoint {
    /// Angular speed (rad/s)
    pub omega: f64,
    pub advance_ratio: f64,
    pub thrust: f64,
    /// Unsigned propeller torque.
    pub torque: f64,
}

impl PropellerParams {
    /// Coefficients of `a Ω² + b Ω + c = 0` for the motor speed.
    fn quadratic(&self, throttle: f64, airspeed: f64, air_density: f64) -> (f64, f64, f64) {
        let d = self.prop_diameter;
        let v_in = self.max_voltage * throttle;
        let two_pi = 2.0 * PI;

        let a = self.cq0 * air_density * d.powi(5) / (two_pi * two_pi);
        let b = airspeed * self.cq1 * air_density * d.powi(4) / two_pi
            + self.motor_kq * self.motor_kq / self.motor_resistance;
        let c = airspeed * airspeed * self.cq2 * air_density * d.powi(3)
            - v_in * self.motor_kq / self.motor_resistance
            + self.motor_kq * self.no_load_current;
        (a, b, c)
    }

    /// Rejects parameter sets with no real motor speed in still air.
    pub fn validate(&self, air_density: f64) -> Result<(), PhysicsError> {
        if self.prop_diameter <= 0.0 || self.motor_resistance <= 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "propeller needs positive diameter and motor resistance: {:?}",
                self
            )));
        }

        for throttle in [0.0, 1.0] {
            let (a, b, c) = self.quadratic(throttle, 0.0, air_density);
            if a <= 0.0 {
                return Err(PhysicsError::InvalidParameter(format!(
                    "propeller CQ0 gives non-positive quadratic term {}",
                    a
                )));
            }
            let discriminant = b * b - 4.0 * a * c;
            if discriminant < 0.0 {
                return Err(PhysicsError::InvalidParameter(format!(
                    "motor parameters admit no operating speed at throttle {} (discriminant {})",
                    throttle, discriminant
                )));
            }
        }
        Ok(())
    }

    /// Solves for motor speed, then thrust and torque from the advance ratio polynomials.
    pub fn operating_point(&self, throttle: f64, airspeed: f64, air_density: f64) -> OperatingPoint {
        let (a, b, c) = self.quadratic(throttle.clamp(0.0, 1.0), airspeed, air_density);
        let discriminant = (b * b - 4.0 * a * c).max(0.0);
        let omega = (-b + discriminant.sqrt()) / (2.0 * a);

        if !omega.is_finite() || omega <= 0.0 {
            return OperatingPoint::default();
        }

        let d = self.prop_diameter;
        let j = 2.0 * PI * airspeed / (omega * d);
        let ct = self.ct2 * j * j + self.ct1 * j + self.ct0;
        let cq = self.cq2 * j * j + self.cq1 * j + self.cq0;
        let n = omega / (2.0 * PI);

        OperatingPoint {
            omega,
            advance_ratio: j,
            thrust: air_density * n * n * d.powi(4) * ct,
            torque: air_density * n * n * d.powi(5) * cq,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThrustModel {
    /// Thrust and torque linear in throttle, scaled by density ratio.
    Simple,
    /// Voltage driven motor with advance ratio dependent propeller.
    Aerodynamic(PropellerParams),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotorOutput {
    pub thrust: f64,
    pub torque_scaler: f64,
    /// Signed angular speed (rad/s)
    pub speed: f64,
    pub turning_direction: TurningDirection,
    pub control_signal_filtered: f64,
    pub control_signal_input: f64,
}

/// Rotor with a fixed thrust axis.
#[derive(Debug, Clone)]
pub struct RotorVertex {
    position: Vector3<f64>,
    normal: Vector3<f64>,
    turning_direction: TurningDirection,
    params: RotorParams,
    model: ThrustModel,
    control_signal_filter: FirstOrderFilter,
    output: RotorOutput,
    wrench: Wrench,
}

impl RotorVertex {
    pub fn new(
        position: Vector3<f64>,
        normal: Vector3<f64>,
        turning_direction: TurningDirection,
        params: RotorParams,
        model: ThrustModel,
    ) -> Result<Self, PhysicsError> {
        params.validate()?;
        if let ThrustModel::Aerodynamic(propeller) = &model {
            propeller.validate(params.air_density)?;
        }
        let norm = normal.norm();
        if norm.is_nan() || norm <= 0.0 {
            return Err(PhysicsError::InvalidParameter(
                "rotor normal must be non-zero".into(),
            ));
        }

        Ok(Self {
            position,
            normal: normal / norm,
            turning_direction,
            params,
            model,
            control_signal_filter: FirstOrderFilter::new(params.control_signal_filter_tc, 0.0, 0.0),
            output: RotorOutput {
                thrust: 0.0,
                torque_scaler: 0.0,
                speed: 0.0,
                turning_direction,
                control_signal_filtered: 0.0,
                control_signal_input: 0.0,
            },
            wrench: Wrench::zero(),
        })
    }

    /// Throttle in -1..1.
    pub fn set_control_signal(&mut self, signal: f64) {
        self.control_signal_filter.set_input(signal.clamp(-1.0, 1.0));
    }

    pub fn output(&self) -> RotorOutput {
        self.output
    }

    pub fn params(&self) -> &RotorParams {
        &self.params
    }

    pub fn model(&self) -> &ThrustModel {
        &self.model
    }

    pub fn turning_direction(&self) -> TurningDirection {
        self.turning_direction
    }

    /// Filters the throttle, then projects thrust and torque along `normal`.
    pub(crate) fn update_along(
        &mut self,
        dt: f64,
        normal: &Vector3<f64>,
        context: &VertexContext<'_>,
    ) {
        self.control_signal_filter.update(dt);
        let filtered = self.control_signal_filter.output();
        let direction = self.turning_direction.sign();
        let air_density = context.environment.air_density;

        let (thrust, torque_scaler, speed) = match &self.model {
            ThrustModel::Simple => {
                let density_ratio = air_density / self.params.air_density;
                let speed = filtered.signum() * (filtered.abs() * self.params.max_speed_square()).sqrt();
                (
                    filtered * self.params.max_thrust() * density_ratio,
                    filtered * self.params.max_torque() * direction * density_ratio,
                    speed,
                )
            }
            ThrustModel::Aerodynamic(propeller) => {
                let airspeed = normal.dot(&context.airspeed_body);
                let point = propeller.operating_point(filtered, airspeed, air_density);
                (point.thrust, point.torque * direction, point.omega * direction)
            }
        };

        self.output = RotorOutput {
            thrust,
            torque_scaler,
            speed,
            turning_direction: self.turning_direction,
            control_signal_filtered: filtered,
            control_signal_input: self.control_signal_filter.input(),
        };
        self.wrench = Wrench::new(normal * thrust, normal * torque_scaler);
    }

    pub(crate) fn report_output(&self, reporter: &mut StateReporter) {
        reporter.write_value("Dir", self.turning_direction.sign());
        reporter.write_value("Ctrl-in", self.output.control_signal_input);
        reporter.write_value("Ctrl-fl", self.output.control_signal_filtered);
        reporter.write_value("speed", self.output.speed);
        reporter.write_value("thrust", self.output.thrust);
        reporter.write_value("torque", self.output.torque_scaler);
    }

    pub(crate) fn reset_output(&mut self) {
        self.control_signal_filter.reset();
        self.output.thrust = 0.0;
        self.output.torque_scaler = 0.0;
        self.output.speed = 0.0;
        self.output.control_signal_filtered = self.control_signal_filter.output();
        self.output.control_signal_input = self.control_signal_filter.input();
        self.wrench = Wrench::zero();
    }
}

impl WrenchSource for RotorVertex {
    fn position(&self) -> Vector3<f64> {
        self.position
    }

    fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    fn wrench(&self) -> Wrench {
        self.wrench
    }

    fn update(&mut self, dt: f64, context: &VertexContext<'_>) {
        let normal = self.normal;
        self.update_along(dt, &normal, context);
    }

    fn reset(&mut self) {
        self.reset_output();
    }

    fn actuation_width(&self) -> usize {
        2
    }

    /// Throttle, then tilt (ignored).
    fn set_actuation(&mut self, signals: &[f64]) {
        if let Some(&throttle) = signals.first() {
            self.set_control_signal(throttle);
        }
    }

    fn report_state(&self, reporter: &mut StateReporter) {
        self.report_output(reporter);
    }
}
