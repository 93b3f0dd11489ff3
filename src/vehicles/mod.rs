mod aero;
mod api;
mod builder;
mod params;
mod rotor;
mod tiltable;
mod vertex;

pub use aero::{
    AeroCoefficient, AeroControlType, AeroOutput, AeroParams, AeroSurface, AirState, Deflection,
    AERO_MIN_AIRSPEED,
};
pub use api::{ActuationHandle, DirectActuation, VehicleApi};
pub use builder::build_aero_body;
pub use params::{AeroBodyParams, DragConfig, RotorTiltableConfig, RotorTiltableParams};
pub use rotor::{
    OperatingPoint, PropellerParams, RotorOutput, RotorParams, RotorVertex, ThrustModel,
    TurningDirection,
};
pub use tiltable::{TiltOutput, TiltableRotor};
pub use vertex::WrenchVertex;
