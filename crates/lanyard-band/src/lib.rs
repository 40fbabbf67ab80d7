//! The lanyard band.
//!
//! A fixed anchor, three rope-linked joints and a card hang in a rapier world.
//! Every frame the joint translations become the control points of a chordal
//! Catmull-Rom curve, and the sampled curve becomes the ribbon mesh. Pointer
//! drags move the card as a kinematic body.
//!
//! [`Scene`] is the entry point for hosts; [`Band`] can also be driven directly
//! against a [`lanyard_physics::PhysicsWorld`].

pub mod band;
pub mod chain;
pub mod config;
pub mod cursor;
pub mod damping;
pub mod drag;
pub mod frame;
pub mod scene;
pub mod smoothing;

pub use band::Band;
pub use chain::{Chain, ChainLink};
pub use config::{AssetUrls, BandConfig, BandVariant, SceneConfig, BAND_TEXTURE_URL, CARD_MODEL_URL};
pub use cursor::{CursorStyle, CursorTracker};
pub use damping::damp_yaw;
pub use drag::DragState;
pub use frame::{FrameData, ScreenLine};
pub use scene::Scene;
pub use smoothing::{clamped_distance, lerp_factor, LerpedPosition};
