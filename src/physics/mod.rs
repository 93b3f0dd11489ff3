pub mod body;
pub mod collision;
pub mod components;
pub mod engine;
pub mod error;
pub mod external;
pub mod traits;
pub mod vertex;

pub use body::PhysicsBody;
pub use collision::{
    resolve_collision, CollisionInfo, CollisionResolution, CollisionResponse, ContactProperties,
};
pub use components::SpeedLimits;
pub use engine::{FastPhysicsEngine, FastPhysicsSettings};
pub use error::PhysicsError;
pub use external::ExternalPhysicsEngine;
pub use traits::PhysicsEngine;
pub use vertex::{DragVertex, VertexContext, WrenchSource};
