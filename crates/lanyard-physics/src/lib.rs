//! Thin rapier3d wrapper.
//!
//! Everything outside this crate talks glam; nalgebra types stay behind the
//! [`PhysicsWorld`] API. Lookups on a body that no longer exists return `None`
//! (or do nothing) instead of failing.

mod convert;

pub mod body;
pub mod debug;
pub mod joint;
pub mod world;

pub use body::{BodyDesc, BodyId, BodyType, ColliderDesc};
pub use debug::{DebugLine, DebugLineKind};
pub use joint::{JointDesc, JointId};
pub use world::{PhysicsWorld, WorldConfig};
