mod command;
mod error;
mod physics_world;

pub use command::{BodyId, WorldCommand};
pub use error::WorldError;
pub use physics_world::PhysicsWorld;
