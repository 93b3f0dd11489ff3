mod forces;
mod motion;

pub use forces::{body_wrench, drag_wrench, DragOutput, DRAG_MIN_VELOCITY};
pub use motion::{
    angular_acceleration, apply_speed_limit, compute_next_pose, verlet_velocity, SpeedLimits,
};
