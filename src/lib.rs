//! Rigid-body flight physics for multirotor, tiltrotor and fixed-wing vehicles.
//!
//! Bodies aggregate wrenches from rotors and aerodynamic surfaces, the
//! [`FastPhysicsEngine`](physics::FastPhysicsEngine) integrates them with a
//! velocity Verlet step and resolves contacts with impulses, and
//! [`PhysicsWorld`](world::PhysicsWorld) runs the fixed-period loop.

pub mod config;
pub mod environment;
pub mod physics;
pub mod state;
pub mod utils;
pub mod vehicles;
pub mod world;

pub use config::{ConfigError, PhysicsConfig, SimulationConfig, VehicleConfig};
pub use physics::{FastPhysicsEngine, PhysicsBody, PhysicsEngine, PhysicsError};
pub use state::{KinematicsState, Pose, Twist, Wrench};
pub use world::{BodyId, PhysicsWorld, WorldCommand, WorldError};
