use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Drawable area in CSS/physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// `[width, height]` as the ribbon material expects it.
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Pixel coordinates (origin top-left) -> NDC (origin center, +Y up).
    pub fn to_ndc(&self, x: f32, y: f32) -> Vec2 {
        let res = self.resolution().max(Vec2::ONE);
        Vec2::new(x / res.x * 2.0 - 1.0, -(y / res.y) * 2.0 + 1.0)
    }

    /// NDC -> pixel coordinates.
    pub fn to_screen(&self, ndc: Vec2) -> Vec2 {
        let res = self.resolution();
        Vec2::new((ndc.x + 1.0) * 0.5 * res.x, (1.0 - ndc.y) * 0.5 * res.y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_corners() {
        let vp = Viewport::new(800, 600);
        assert_eq!(vp.to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(vp.to_ndc(400.0, 300.0), Vec2::ZERO);
    }

    #[test]
    fn screen_and_ndc_agree() {
        let vp = Viewport::new(1024, 512);
        let px = Vec2::new(100.0, 37.0);
        let back = vp.to_screen(vp.to_ndc(px.x, px.y));
        assert!(back.abs_diff_eq(px, 1e-3));
    }
}
