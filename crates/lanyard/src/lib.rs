//! Lanyard - a badge on a rope, simulated with rapier and drawn as a ribbon.
//!
//! The work is split across crates: camera and vertex types in `core`, the
//! spline and ribbon mesh in `geometry`, the rapier wrapper in `physics` and
//! the interactive band itself in `band`.

pub use lanyard_band as band;
pub use lanyard_core as core;
pub use lanyard_geometry as geometry;
pub use lanyard_physics as physics;

pub mod prelude {
    pub use crate::band::{
        Band, BandConfig, BandVariant, ChainLink, CursorStyle, FrameData, Scene, SceneConfig,
    };
    pub use crate::core::{Camera, LanyardError, Result, RibbonVertex, Viewport};
    pub use crate::geometry::{CatmullRomCurve, CurveType, RibbonGeometry, RibbonMaterial};
    pub use crate::physics::{PhysicsWorld, WorldConfig};
    pub use glam;
}
