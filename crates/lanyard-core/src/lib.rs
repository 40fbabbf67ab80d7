//! Core types shared by every lanyard crate.
//!
//! Nothing in here knows about physics or the band itself; it is the camera
//! maths, the viewport, the GPU-facing vertex layout and the error type.

pub mod camera;
pub mod error;
pub mod vertex;
pub mod viewport;

pub use camera::Camera;
pub use error::{LanyardError, Result};
pub use vertex::RibbonVertex;
pub use viewport::Viewport;

pub use glam;
