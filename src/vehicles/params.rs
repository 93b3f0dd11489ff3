use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;

use super::aero::{AeroControlType, AeroParams};
use super::rotor::{PropellerParams, RotorParams, ThrustModel, TurningDirection};
use crate::physics::{DragVertex, PhysicsError};
use crate::utils::{deg_to_rad, inertia_inverse};

/// Rotor constants shared by fixed and tiltable rotors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotorTiltableParams {
    /// Use the linear thrust model instead of the motor/propeller model.
    pub use_simple_rotor_model: bool,
    pub rotor_params: RotorParams,
    /// Time constant of the tilt command filter (s)
    pub angle_signal_filter_tc: f64,
    /// Time constant of the tilt servo (s)
    pub angle_filter_tc: f64,
    pub propeller: PropellerParams,
}

impl Default for RotorTiltableParams {
    fn default() -> Self {
        Self {
            use_simple_rotor_model: false,
            rotor_params: RotorParams::default(),
            angle_signal_filter_tc: 0.005,
            angle_filter_tc: 0.1,
            propeller: PropellerParams::default(),
        }
    }
}

impl RotorTiltableParams {
    pub fn thrust_model(&self) -> ThrustModel {
        if self.use_simple_rotor_model {
            ThrustModel::Simple
        } else {
            ThrustModel::Aerodynamic(self.propeller)
        }
    }
}

/// Placement of one rotor on the airframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotorTiltableConfig {
    /// Body frame offset from the centre of mass (m)
    pub position: Vector3<f64>,
    /// Thrust direction at zero tilt.
    pub normal_nominal: Vector3<f64>,
    pub rotation_axis: Vector3<f64>,
    pub is_fixed: bool,
    /// Tilt at full signal (rad)
    pub max_angle: f64,
    pub direction: TurningDirection,
    #[serde(default)]
    pub params: RotorTiltableParams,
}

/// Box shaped body approximated by six drag faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Box dimensions along body x, y, z (m)
    pub body_box: Vector3<f64>,
    pub linear_drag_coefficient: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            body_box: Vector3::new(0.18, 0.11, 0.04),
            linear_drag_coefficient: 1.3 / 4.0,
        }
    }
}

impl DragConfig {
    /// One face per box side, each placed at the face centre.
    pub fn drag_vertices(&self) -> Vec<DragVertex> {
        let (x, y, z) = (self.body_box.x, self.body_box.y, self.body_box.z);
        let coeff = self.linear_drag_coefficient / 2.0;

        let faces = [
            (Vector3::x(), x / 2.0, y * z),
            (Vector3::y(), y / 2.0, x * z),
            (Vector3::z(), z / 2.0, x * y),
        ];

        faces
            .iter()
            .flat_map(|&(axis, offset, area)| {
                [
                    DragVertex::new(axis * offset, axis, area * coeff),
                    DragVertex::new(-axis * offset, -axis, area * coeff),
                ]
            })
            .collect()
    }
}

/// Complete description of an aerodynamic vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeroBodyParams {
    pub rotor_configs: Vec<RotorTiltableConfig>,
    /// Vehicle mass (kg)
    pub mass: f64,
    /// Inertia about the centre of mass, body frame (kg m^2)
    pub inertia: Matrix3<f64>,
    pub aero_control_type: AeroControlType,
    #[serde(default)]
    pub aero_params: AeroParams,
    #[serde(default = "default_restitution")]
    pub restitution: f64,
    #[serde(default = "default_friction")]
    pub friction: f64,
    #[serde(default)]
    pub drag: Option<DragConfig>,
}

fn default_restitution() -> f64 {
    0.55
}

fn default_friction() -> f64 {
    0.5
}

fn small_airframe_inertia() -> Matrix3<f64> {
    Matrix3::new(
        0.0165, 0.0, 0.000048, //
        0.0, 0.025, 0.0, //
        0.000048, 0.0, 0.0282,
    )
}

impl AeroBodyParams {
    /// Single tractor rotor with elevons and rudder.
    pub fn generic_fixed_wing() -> Self {
        Self {
            rotor_configs: vec![RotorTiltableConfig {
                position: Vector3::new(1.0, 0.0, 0.0),
                normal_nominal: Vector3::x(),
                rotation_axis: Vector3::y(),
                is_fixed: true,
                max_angle: 0.0,
                direction: TurningDirection::Ccw,
                params: RotorTiltableParams::default(),
            }],
            mass: 1.0,
            inertia: small_airframe_inertia(),
            aero_control_type: AeroControlType::ElevonRudder,
            aero_params: AeroParams::default(),
            restitution: default_restitution(),
            friction: default_friction(),
            drag: None,
        }
    }

    /// Two tilting front rotors and one fixed rear lift rotor.
    pub fn tri_tiltrotor() -> Self {
        let front_normal = Vector3::new(FRAC_1_SQRT_2, 0.0, -FRAC_1_SQRT_2);
        let front = |y: f64| RotorTiltableConfig {
            position: Vector3::new(0.12, y, 0.0),
            normal_nominal: front_normal,
            rotation_axis: Vector3::y(),
            is_fixed: false,
            max_angle: deg_to_rad(60.0),
            direction: TurningDirection::Ccw,
            params: RotorTiltableParams::default(),
        };

        Self {
            rotor_configs: vec![
                front(-0.2),
                front(0.2),
                RotorTiltableConfig {
                    position: Vector3::new(-0.24, 0.0, 0.0),
                    normal_nominal: Vector3::new(0.0, 0.0, -1.0),
                    rotation_axis: Vector3::y(),
                    is_fixed: true,
                    max_angle: 0.0,
                    direction: TurningDirection::Ccw,
                    params: RotorTiltableParams::default(),
                },
            ],
            mass: 1.0,
            inertia: small_airframe_inertia(),
            aero_control_type: AeroControlType::ElevonRudder,
            aero_params: AeroParams::default(),
            restitution: default_restitution(),
            friction: default_friction(),
            drag: None,
        }
    }

    pub fn for_vehicle_type(vehicle_type: &str) -> Result<Self, PhysicsError> {
        match vehicle_type {
            "" | "TiltrotorSimple" => Ok(Self::tri_tiltrotor()),
            "FixedWing" => Ok(Self::generic_fixed_wing()),
            other => Err(PhysicsError::UnknownVehicleType(other.to_string())),
        }
    }

    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "vehicle mass must be positive, got {}",
                self.mass
            )));
        }
        if inertia_inverse(&self.inertia).is_none() {
            return Err(PhysicsError::InvalidInertia);
        }
        if !(0.0..=1.0).contains(&self.restitution) || self.friction < 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "restitution {} must lie in [0, 1] and friction {} be non-negative",
                self.restitution, self.friction
            )));
        }
        for config in &self.rotor_configs {
            config.params.rotor_params.validate()?;
        }
        Ok(())
    }
}
