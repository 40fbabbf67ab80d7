use std::path::Path;

use glam::Vec3;
use lanyard_core::{Camera, LanyardError, Result};
use lanyard_geometry::{CurveType, RibbonMaterial};
use lanyard_physics::WorldConfig;
use serde::{Deserialize, Serialize};

pub const CARD_MODEL_URL: &str = "https://assets.vercel.com/image/upload/contentful/image/e5382hct74si/5huRVDzcoDwnbgrKUo1Lzs/53b6dd7d6b4ffcdbd338fa60265949e1/tag.glb";
pub const BAND_TEXTURE_URL: &str = "https://assets.vercel.com/image/upload/contentful/image/e5382hct74si/SOT1hmCesOHxEYxL7vkoZ/c57b29c85912047c414311723320c16b/band.jpg";

/// Which flavour of band is mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandVariant {
    /// Smoothed joints, cursor feedback, textured ribbon and card model
    #[default]
    Full,
    /// Raw simulated positions, translucent untextured ribbon, plane card
    Raw,
}

impl BandVariant {
    pub fn smoothing(&self) -> bool {
        matches!(self, BandVariant::Full)
    }

    pub fn cursor_feedback(&self) -> bool {
        matches!(self, BandVariant::Full)
    }

    /// Ribbon material for this variant, derived from `base`.
    pub fn ribbon_material(&self, base: RibbonMaterial) -> RibbonMaterial {
        match self {
            BandVariant::Full => base.with_map(true).with_opacity(1.0),
            BandVariant::Raw => base.with_map(false).with_opacity(0.25),
        }
    }
}

/// Remote assets fetched when the full band mounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetUrls {
    pub card_model: String,
    pub band_texture: String,
}

impl Default for AssetUrls {
    fn default() -> Self {
        Self {
            card_model: CARD_MODEL_URL.to_string(),
            band_texture: BAND_TEXTURE_URL.to_string(),
        }
    }
}

/// Configuration builder for the band component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub variant: BandVariant,
    /// Smoothing rate at the 0.1 clamped distance
    pub min_speed: f32,
    /// Smoothing rate at the 1.0 clamped distance
    pub max_speed: f32,
    /// World position of the group the chain is mounted under
    pub origin: Vec3,
    /// Local positions of joint1..joint3
    pub joint_offsets: [Vec3; 3],
    pub card_offset: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub can_sleep: bool,
    pub joint_radius: f32,
    pub card_half_extents: Vec3,
    /// Max length of each rope segment
    pub rope_length: f32,
    /// Card-local anchor of the spherical joint
    pub card_anchor: Vec3,
    pub curve_type: CurveType,
    /// Segments the curve is resampled into (points = divisions + 1)
    pub curve_divisions: usize,
    /// Multiplier on the card's rotation y component subtracted from its yaw rate
    pub yaw_damping: f32,
    pub wake_on_damping: bool,
    pub line_width: f32,
    pub assets: AssetUrls,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            variant: BandVariant::Full,
            min_speed: 10.0,
            max_speed: 50.0,
            origin: Vec3::new(0.0, 4.0, 0.0),
            joint_offsets: [
                Vec3::new(0.5, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.5, 0.0, 0.0),
            ],
            card_offset: Vec3::new(2.0, 0.0, 0.0),
            linear_damping: 2.0,
            angular_damping: 2.0,
            can_sleep: true,
            joint_radius: 0.1,
            card_half_extents: Vec3::new(0.8, 1.125, 0.01),
            rope_length: 1.0,
            card_anchor: Vec3::new(0.0, 1.45, 0.0),
            curve_type: CurveType::Chordal,
            curve_divisions: 32,
            yaw_damping: 0.25,
            wake_on_damping: true,
            line_width: 1.0,
            assets: AssetUrls::default(),
        }
    }
}

impl BandConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw() -> Self {
        Self::default().with_variant(BandVariant::Raw)
    }

    pub fn with_variant(mut self, variant: BandVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_speeds(mut self, min_speed: f32, max_speed: f32) -> Self {
        self.min_speed = min_speed;
        self.max_speed = max_speed;
        self
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_curve_divisions(mut self, divisions: usize) -> Self {
        self.curve_divisions = divisions;
        self
    }

    pub fn with_curve_type(mut self, curve_type: CurveType) -> Self {
        self.curve_type = curve_type;
        self
    }

    pub fn with_yaw_damping(mut self, factor: f32) -> Self {
        self.yaw_damping = factor;
        self
    }

    pub fn with_wake_on_damping(mut self, wake: bool) -> Self {
        self.wake_on_damping = wake;
        self
    }

    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn ribbon_material(&self) -> RibbonMaterial {
        self.variant
            .ribbon_material(RibbonMaterial::new().with_line_width(self.line_width))
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(LanyardError::InvalidConfiguration(msg));

        if self.min_speed < 0.0 || self.min_speed > self.max_speed {
            return invalid(format!(
                "min_speed ({}) must be non-negative and not above max_speed ({})",
                self.min_speed, self.max_speed
            ));
        }
        if self.curve_divisions == 0 {
            return invalid("curve_divisions must be at least 1".into());
        }
        if self.rope_length <= 0.0 {
            return invalid(format!("rope_length must be positive, got {}", self.rope_length));
        }
        if self.joint_radius <= 0.0 || self.card_half_extents.min_element() <= 0.0 {
            return invalid("collider sizes must be positive".into());
        }
        if self.linear_damping < 0.0 || self.angular_damping < 0.0 {
            return invalid("damping must be non-negative".into());
        }
        if self.line_width < 0.0 {
            return invalid(format!("line_width must be non-negative, got {}", self.line_width));
        }
        Ok(())
    }
}

/// Everything needed to build a [`crate::Scene`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub world: WorldConfig,
    pub band: BandConfig,
    pub camera: Camera,
    /// Draw collider outlines and joint segments
    pub debug: bool,
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_world(mut self, world: WorldConfig) -> Self {
        self.world = world;
        self
    }

    pub fn with_band(mut self, band: BandConfig) -> Self {
        self.band = band;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading scene config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.world.validate()?;
        self.band.validate()?;
        if !(self.camera.fov_y > 0.0 && self.camera.near_plane > 0.0)
            || self.camera.far_plane <= self.camera.near_plane
        {
            return Err(LanyardError::InvalidConfiguration(
                "camera needs a positive fov and near < far".into(),
            ));
        }
        Ok(())
    }
}
