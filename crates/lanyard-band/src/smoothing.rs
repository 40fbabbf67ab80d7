//! Distance-dependent lag applied to the two middle joints before they feed the
//! curve. Far from its body the cache catches up fast, close to it slowly.

use glam::Vec3;

pub const MIN_CLAMPED_DISTANCE: f32 = 0.1;
pub const MAX_CLAMPED_DISTANCE: f32 = 1.0;

pub fn clamped_distance(cached: Vec3, live: Vec3) -> f32 {
    cached
        .distance(live)
        .clamp(MIN_CLAMPED_DISTANCE, MAX_CLAMPED_DISTANCE)
}

/// Interpolation factor for one frame. Not clamped to `[0, 1]`: a long frame
/// overshoots the live position.
pub fn lerp_factor(delta: f32, clamped_distance: f32, min_speed: f32, max_speed: f32) -> f32 {
    delta * (min_speed + clamped_distance * (max_speed - min_speed))
}

/// Smoothed stand-in for a body's translation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LerpedPosition {
    cached: Option<Vec3>,
}

impl LerpedPosition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Vec3> {
        self.cached
    }

    /// Moves the cache toward `live` and returns it. The first call only seeds
    /// the cache, so it then moves by zero.
    pub fn update(&mut self, live: Vec3, delta: f32, min_speed: f32, max_speed: f32) -> Vec3 {
        let cached = self.cached.get_or_insert(live);
        let t = lerp_factor(delta, clamped_distance(*cached, live), min_speed, max_speed);
        *cached = cached.lerp(live, t);
        *cached
    }

    pub fn reset(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamped_distance(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)), 1.0);
        assert_eq!(clamped_distance(Vec3::ONE, Vec3::ONE), 0.1);
        assert_eq!(clamped_distance(Vec3::ZERO, Vec3::new(0.0, 0.4, 0.0)), 0.4);
    }

    #[test]
    fn half_distance_halves_the_gap() {
        let t = lerp_factor(1.0 / 60.0, 0.5, 10.0, 50.0);
        assert_abs_diff_eq!(t, 0.5, epsilon = 1e-6);

        let mut lerped = LerpedPosition { cached: Some(Vec3::ZERO) };
        let moved = lerped.update(Vec3::new(0.5, 0.0, 0.0), 1.0 / 60.0, 10.0, 50.0);
        assert_abs_diff_eq!(moved.x, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn first_update_seeds_cache() {
        let mut lerped = LerpedPosition::new();
        assert!(lerped.get().is_none());
        let live = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(lerped.update(live, 1.0 / 60.0, 10.0, 50.0), live);
        assert_eq!(lerped.get(), Some(live));
        lerped.reset();
        assert!(lerped.get().is_none());
    }

    #[test]
    fn long_frame_overshoots() {
        let mut lerped = LerpedPosition { cached: Some(Vec3::ZERO) };
        let moved = lerped.update(Vec3::X, 0.1, 10.0, 50.0);
        assert!(moved.x > 1.0);
    }
}
