use thiserror::Error;

use super::command::BodyId;
use crate::physics::PhysicsError;

#[derive(Error, Debug)]
pub enum WorldError {
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("No body with id {0}")]
    UnknownBody(BodyId),

    #[error("Async updater is already running")]
    UpdaterRunning,

    #[error("Failed to start physics thread: {0}")]
    Thread(#[from] std::io::Error),
}
