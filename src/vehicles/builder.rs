use tracing::info;

use super::aero::AeroSurface;
use super::api::VehicleApi;
use super::params::{AeroBodyParams, RotorTiltableConfig};
use super::rotor::RotorVertex;
use super::tiltable::TiltableRotor;
use super::vertex::WrenchVertex;
use crate::environment::Environment;
use crate::physics::{PhysicsBody, PhysicsError};
use crate::state::Pose;

fn build_rotor(config: &RotorTiltableConfig) -> Result<WrenchVertex, PhysicsError> {
    let params = &config.params;
    let model = params.thrust_model();

    if config.is_fixed {
        let rotor = RotorVertex::new(
            config.position,
            config.normal_nominal,
            config.direction,
            params.rotor_params,
            model,
        )?;
        Ok(rotor.into())
    } else {
        let rotor = TiltableRotor::new(
            config.position,
            config.normal_nominal,
            config.direction,
            config.rotation_axis,
            config.max_angle,
            params.rotor_params,
            model,
            params.angle_signal_filter_tc,
            params.angle_filter_tc,
        )?;
        Ok(rotor.into())
    }
}

/// Assembles an aerodynamic vehicle. Vertex 0 is the aero surface, rotors follow
/// in configuration order.
pub fn build_aero_body(
    name: impl Into<String>,
    params: &AeroBodyParams,
    controller: Box<dyn VehicleApi>,
    environment: Box<dyn Environment>,
    initial_pose: Pose,
) -> Result<PhysicsBody, PhysicsError> {
    params.validate()?;

    let mut vertices = Vec::with_capacity(params.rotor_configs.len() + 1);
    vertices.push(WrenchVertex::from(AeroSurface::new(
        params.aero_params,
        params.aero_control_type,
    )));
    for config in &params.rotor_configs {
        vertices.push(build_rotor(config)?);
    }

    let drag_vertices = params
        .drag
        .map(|drag| drag.drag_vertices())
        .unwrap_or_default();

    let name = name.into();
    info!(
        "Building vehicle {} with {} rotors and {} drag faces",
        name,
        params.rotor_configs.len(),
        drag_vertices.len()
    );

    let body = PhysicsBody::new(
        name,
        params.mass,
        params.inertia,
        initial_pose,
        environment,
        controller,
    )?
    .with_restitution(params.restitution)
    .with_friction(params.friction)
    .with_wrench_vertices(vertices)
    .with_drag_vertices(drag_vertices);

    Ok(body)
}
