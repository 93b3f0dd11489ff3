use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

use super::error::ConfigError;
use super::physics::PhysicsConfig;
use crate::environment::EnvironmentConfig;
use crate::physics::{PhysicsBody, PhysicsError};
use crate::state::Pose;
use crate::utils::deg_to_rad;
use crate::vehicles::{build_aero_body, AeroBodyParams, VehicleApi};

/// One vehicle to spawn into the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub name: String,
    /// `""`, `"TiltrotorSimple"` or `"FixedWing"`.
    pub vehicle_type: String,
    /// Spawn position, world frame (m)
    pub position: Vector3<f64>,
    /// Spawn roll, pitch, yaw (deg)
    pub rotation: Vector3<f64>,
    /// Replaces the vehicle type preset when present.
    pub params: Option<AeroBodyParams>,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            name: "SimpleFlight".to_string(),
            vehicle_type: String::new(),
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            params: None,
        }
    }
}

impl VehicleConfig {
    pub fn initial_pose(&self) -> Pose {
        Pose::new(
            self.position,
            UnitQuaternion::from_euler_angles(
                deg_to_rad(self.rotation.x),
                deg_to_rad(self.rotation.y),
                deg_to_rad(self.rotation.z),
            ),
        )
    }

    pub fn body_params(&self) -> Result<AeroBodyParams, ConfigError> {
        match &self.params {
            Some(params) => Ok(params.clone()),
            None => AeroBodyParams::for_vehicle_type(&self.vehicle_type).map_err(|err| match err {
                PhysicsError::UnknownVehicleType(name) => ConfigError::UnknownVehicleType(name),
                other => other.into(),
            }),
        }
    }
}

/// Top level simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub environment: EnvironmentConfig,
    pub vehicles: Vec<VehicleConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            environment: EnvironmentConfig::default(),
            vehicles: vec![VehicleConfig::default()],
        }
    }
}

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

impl SimulationConfig {
    /// Loads YAML or JSON by file extension and validates the result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let file = File::open(path)?;

        let config: Self = match format {
            Format::Yaml => serde_yaml::from_reader(file)?,
            Format::Json => serde_json::from_reader(file)?,
        };
        config.validate()?;

        info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let file = File::create(path)?;

        match format {
            Format::Yaml => serde_yaml::to_writer(file, self)?,
            Format::Json => serde_json::to_writer_pretty(file, self)?,
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        for vehicle in &self.vehicles {
            vehicle.body_params()?.validate()?;
        }
        Ok(())
    }

    /// Builds one vehicle with its own environment instance.
    pub fn build_vehicle(
        &self,
        vehicle: &VehicleConfig,
        controller: Box<dyn VehicleApi>,
    ) -> Result<PhysicsBody, ConfigError> {
        let params = vehicle.body_params()?;
        let body = build_aero_body(
            vehicle.name.clone(),
            &params,
            controller,
            self.environment.build(),
            vehicle.initial_pose(),
        )?;
        Ok(body)
    }
}
