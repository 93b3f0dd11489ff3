use nalgebra::Vector3;

use crate::physics::CollisionInfo;
use crate::state::Pose;

/// Index of a body in the world, in insertion order.
pub type BodyId = usize;

/// Mutations queued by callers and applied at the start of the next tick.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldCommand {
    SetPose { body: BodyId, pose: Pose },
    SetCollisionInfo { body: BodyId, info: CollisionInfo },
    SetWind(Vector3<f64>),
    Reset,
}

/// One drained batch, split into the order it is applied in.
#[derive(Debug, Default)]
pub(crate) struct CommandBatch {
    pub reset: bool,
    pub poses: Vec<(BodyId, Pose)>,
    pub collisions: Vec<(BodyId, CollisionInfo)>,
    pub wind: Option<Vector3<f64>>,
}

impl CommandBatch {
    pub fn is_empty(&self) -> bool {
        !self.reset && self.poses.is_empty() && self.collisions.is_empty() && self.wind.is_none()
    }
}

impl FromIterator<WorldCommand> for CommandBatch {
    fn from_iter<I: IntoIterator<Item = WorldCommand>>(commands: I) -> Self {
        let mut batch = Self::default();
        for command in commands {
            match command {
                WorldCommand::Reset => batch.reset = true,
                WorldCommand::SetPose { body, pose } => batch.poses.push((body, pose)),
                WorldCommand::SetCollisionInfo { body, info } => {
                    batch.collisions.push((body, info))
                }
                // last one wins
                WorldCommand::SetWind(wind) => batch.wind = Some(wind),
            }
        }
        batch
    }
}
