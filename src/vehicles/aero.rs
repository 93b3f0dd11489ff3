use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::physics::{VertexContext, WrenchSource};
use crate::state::Wrench;
use crate::utils::{sgn, FirstOrderFilter, StateReporter};

/// Below this airspeed the surface generates no wrench.
pub const AERO_MIN_AIRSPEED: f64 = 0.1;

/// How the three flap channels map to elevator, aileron and rudder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AeroControlType {
    /// {elevator, aileron, rudder}
    ElevatorAileronRudder,
    /// {aileron, right ruddervator, left ruddervator}
    AileronRudderVator,
    /// {right elevon, left elevon, rudder}
    ElevonRudder,
}

impl AeroControlType {
    /// Matrix taking flap inputs to {elevator, aileron, rudder}.
    pub fn mixer(self) -> Matrix3<f64> {
        match self {
            AeroControlType::ElevatorAileronRudder => Matrix3::identity(),
            AeroControlType::AileronRudderVator => Matrix3::new(
                0.0, 0.5, 0.5, //
                1.0, 0.0, 0.0, //
                0.0, -0.5, 0.5,
            ),
            AeroControlType::ElevonRudder => Matrix3::new(
                0.5, 0.5, 0.0, //
                -0.5, 0.5, 0.0, //
                0.0, 0.0, 1.0,
            ),
        }
    }
}

/// Linear coefficient model: constant, states, rates and control deflections.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AeroCoefficient {
    pub o: f64,
    pub alpha: f64,
    pub beta: f64,
    pub p: f64,
    pub q: f64,
    pub r: f64,
    pub delta_a: f64,
    pub delta_e: f64,
    pub delta_r: f64,
}

impl AeroCoefficient {
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        o: f64,
        alpha: f64,
        beta: f64,
        p: f64,
        q: f64,
        r: f64,
        delta_a: f64,
        delta_e: f64,
        delta_r: f64,
    ) -> Self {
        Self {
            o,
            alpha,
            beta,
            p,
            q,
            r,
            delta_a,
            delta_e,
            delta_r,
        }
    }

    /// Sideslip, nondimensional rate and control terms.
    fn dynamic_terms(
        &self,
        air: &AirState,
        rates: &Vector3<f64>,
        deflection: &Deflection,
        b: f64,
        c: f64,
    ) -> f64 {
        let two_va = 2.0 * air.va;
        self.beta * air.beta
            + self.p * b / two_va * rates.x
            + self.q * c / two_va * rates.y
            + self.r * b / two_va * rates.z
            + self.delta_a * deflection.aileron
            + self.delta_e * deflection.elevator
            + self.delta_r * deflection.rudder
    }

    /// The full linear model.
    fn linear(
        &self,
        air: &AirState,
        rates: &Vector3<f64>,
        deflection: &Deflection,
        b: f64,
        c: f64,
    ) -> f64 {
        self.o + self.alpha * air.alpha + self.dynamic_terms(air, rates, deflection, b, c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroParams {
    /// Rise time of the flap filters (s)
    pub flap_rise_time: f64,
    /// Flap deflection at full signal (rad)
    pub flap_max_angle: f64,
    /// Wing area (m^2)
    pub s: f64,
    /// Wing span (m)
    pub b: f64,
    /// Mean chord (m)
    pub c: f64,
    pub aspect_ratio: f64,
    /// Oswald efficiency.
    pub e: f64,
    /// Stall blending rate.
    pub m: f64,
    /// Stall angle (rad)
    pub alpha0: f64,
    pub cl: AeroCoefficient,
    pub cd: AeroCoefficient,
    pub cy: AeroCoefficient,
    pub c_roll: AeroCoefficient,
    pub c_pitch: AeroCoefficient,
    pub c_yaw: AeroCoefficient,
}

impl Default for AeroParams {
    fn default() -> Self {
        let s = 0.2589;
        let b = 1.4224;
        Self {
            flap_rise_time: 0.05,
            flap_max_angle: PI / 6.0,
            s,
            b,
            c: 0.3305,
            aspect_ratio: b * b / s,
            e: 0.9,
            m: 50.0,
            alpha0: 0.47,
            cl: AeroCoefficient::new(0.005, 2.819, 0.0, 0.0, 3.242, 0.0, 0.0, 0.2, 0.0),
            cd: AeroCoefficient::new(0.022, 0.3, 0.0, 0.05, 0.0, 0.0, 0.0, 0.5, 0.0),
            cy: AeroCoefficient::new(0.0, 0.0, -0.318, 0.078, 0.0, 0.288, 0.000536, 0.0, 0.0),
            c_roll: AeroCoefficient::new(0.0, 0.0, -0.032, -0.207, 0.0, 0.036, 0.018, 0.0, 0.0),
            c_pitch: AeroCoefficient::new(0.0, -0.185, 0.0, 0.0, -1.093, 0.0, 0.0, -0.05, 0.0),
            c_yaw: AeroCoefficient::new(0.0, 0.0, 0.112, -0.053, 0.0, -0.104, -0.00328, 0.0, 0.0),
        }
    }
}

impl AeroParams {
    /// Stall blending weight, 0 in attached flow and 1 when fully stalled.
    pub fn sigma(&self, alpha: f64) -> f64 {
        let neg = (-self.m * (alpha - self.alpha0)).exp();
        let pos = (self.m * (alpha + self.alpha0)).exp();
        (1.0 + neg + pos) / ((1.0 + neg) * (1.0 + pos))
    }

    /// Lift coefficient blending the linear model into flat plate lift past stall.
    pub fn lift_coefficient(&self, alpha: f64) -> f64 {
        let sigma = self.sigma(alpha);
        let linear = self.cl.o + self.cl.alpha * alpha;
        let flat_plate = 2.0 * sgn(alpha) * alpha.sin().powi(2) * alpha.cos();
        (1.0 - sigma) * linear + sigma * flat_plate
    }

    /// Parabolic drag polar.
    pub fn drag_coefficient(&self, alpha: f64) -> f64 {
        let lift = self.cl.o + self.cl.alpha * alpha;
        self.cd.o + lift * lift / (PI * self.e * self.aspect_ratio)
    }
}

/// Air data seen by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AirState {
    /// Air-relative velocity, body frame.
    pub airspeed: Vector3<f64>,
    pub va: f64,
    pub alpha: f64,
    pub beta: f64,
    pub rho: f64,
}

impl AirState {
    pub fn from_airspeed(airspeed: Vector3<f64>, rho: f64) -> Self {
        let va = airspeed.norm();
        let alpha = if airspeed.x == 0.0 {
            sgn(airspeed.z) * PI / 2.0
        } else {
            airspeed.z.atan2(airspeed.x)
        };
        let beta = if va == 0.0 {
            sgn(airspeed.y) * PI / 2.0
        } else {
            (airspeed.y / va).clamp(-1.0, 1.0).asin()
        };

        Self {
            airspeed,
            va,
            alpha,
            beta,
            rho,
        }
    }
}

/// Control surface deflections (rad)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Deflection {
    pub elevator: f64,
    pub aileron: f64,
    pub rudder: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AeroOutput {
    pub air_state: AirState,
    pub deflection: Deflection,
    pub lift: f64,
    pub drag: f64,
}

/// Whole-aircraft aerodynamics lumped at the centre of mass.
#[derive(Debug, Clone)]
pub struct AeroSurface {
    params: AeroParams,
    control_type: AeroControlType,
    flap_filters: [FirstOrderFilter; 3],
    output: AeroOutput,
    wrench: Wrench,
}

impl AeroSurface {
    pub fn new(params: AeroParams, control_type: AeroControlType) -> Self {
        let filter = FirstOrderFilter::new(params.flap_rise_time, 0.0, 0.0);
        Self {
            params,
            control_type,
            flap_filters: [filter; 3],
            output: AeroOutput::default(),
            wrench: Wrench::zero(),
        }
    }

    /// Flap inputs in -1..1, mixed into elevator, aileron and rudder.
    pub fn set_flap_inputs(&mut self, inputs: &[f64]) {
        let mut flaps = Vector3::zeros();
        for (i, value) in inputs.iter().take(3).enumerate() {
            flaps[i] = value.clamp(-1.0, 1.0);
        }
        let mixed = self.control_type.mixer() * flaps;
        for (filter, value) in self.flap_filters.iter_mut().zip(mixed.iter()) {
            filter.set_input(value.clamp(-1.0, 1.0));
        }
    }

    pub fn output(&self) -> AeroOutput {
        self.output
    }

    pub fn params(&self) -> &AeroParams {
        &self.params
    }

    pub fn control_type(&self) -> AeroControlType {
        self.control_type
    }

    fn compute_wrench(
        &self,
        air: &AirState,
        rates: &Vector3<f64>,
        deflection: &Deflection,
    ) -> (Wrench, f64, f64) {
        if air.va < AERO_MIN_AIRSPEED {
            return (Wrench::zero(), 0.0, 0.0);
        }

        let p = &self.params;
        let dynamic_pressure = 0.5 * air.rho * air.va * air.va;
        let q_s = dynamic_pressure * p.s;

        let lift = q_s
            * (p.lift_coefficient(air.alpha) + p.cl.dynamic_terms(air, rates, deflection, p.b, p.c));
        let drag = q_s
            * (p.drag_coefficient(air.alpha) + p.cd.dynamic_terms(air, rates, deflection, p.b, p.c));
        let side = q_s * p.cy.linear(air, rates, deflection, p.b, p.c);

        // stability axes back to body axes
        let (sin_a, cos_a) = air.alpha.sin_cos();
        let force = Vector3::new(
            -drag * cos_a + lift * sin_a,
            side,
            -drag * sin_a - lift * cos_a,
        );

        let torque = Vector3::new(
            q_s * p.b * p.c_roll.linear(air, rates, deflection, p.b, p.c),
            q_s * p.c * p.c_pitch.linear(air, rates, deflection, p.b, p.c),
            q_s * p.b * p.c_yaw.linear(air, rates, deflection, p.b, p.c),
        );

        (Wrench::new(force, torque), lift, drag)
    }
}

impl WrenchSource for AeroSurface {
    fn position(&self) -> Vector3<f64> {
        Vector3::zeros()
    }

    fn normal(&self) -> Vector3<f64> {
        Vector3::new(0.0, 0.0, -1.0)
    }

    fn wrench(&self) -> Wrench {
        self.wrench
    }

    fn update(&mut self, dt: f64, context: &VertexContext<'_>) {
        for filter in self.flap_filters.iter_mut() {
            filter.update(dt);
        }
        let max_angle = self.params.flap_max_angle;
        let deflection = Deflection {
            elevator: self.flap_filters[0].output() * max_angle,
            aileron: self.flap_filters[1].output() * max_angle,
            rudder: self.flap_filters[2].output() * max_angle,
        };

        let air_state =
            AirState::from_airspeed(context.airspeed_body, context.environment.air_density);
        let (wrench, lift, drag) =
            self.compute_wrench(&air_state, &context.angular_velocity, &deflection);

        self.wrench = wrench;
        self.output = AeroOutput {
            air_state,
            deflection,
            lift,
            drag,
        };
    }

    fn reset(&mut self) {
        for filter in self.flap_filters.iter_mut() {
            filter.reset();
        }
        self.output = AeroOutput::default();
        self.wrench = Wrench::zero();
    }

    fn actuation_width(&self) -> usize {
        3
    }

    fn set_actuation(&mut self, signals: &[f64]) {
        self.set_flap_inputs(signals);
    }

    fn report_state(&self, reporter: &mut StateReporter) {
        reporter.write_value("Va", self.output.air_state.va);
        reporter.write_value("Alpha", self.output.air_state.alpha);
        reporter.write_value("Beta", self.output.air_state.beta);
        reporter.write_value("Elevator", self.output.deflection.elevator);
        reporter.write_value("Aileron", self.output.deflection.aileron);
        reporter.write_value("Rudder", self.output.deflection.rudder);
        reporter.write_value("Lift", self.output.lift);
        reporter.write_value("Drag", self.output.drag);
    }
}
