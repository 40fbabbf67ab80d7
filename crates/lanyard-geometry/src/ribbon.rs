use glam::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};
use lanyard_core::{RibbonVertex, Viewport};
use serde::{Deserialize, Serialize};

/// Material parameters the ribbon's vertex stage reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RibbonMaterial {
    pub color: [f32; 3],
    pub opacity: f32,
    pub line_width: f32,
    /// Viewport size in pixels; kept in sync with the canvas
    pub resolution: Vec2,
    /// Texture repeat along/across the ribbon
    pub repeat: Vec2,
    pub use_map: bool,
    pub depth_test: bool,
}

impl Default for RibbonMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            line_width: 1.0,
            resolution: Viewport::default().resolution(),
            repeat: Vec2::new(-3.0, 1.0),
            use_map: true,
            depth_test: false,
        }
    }
}

impl RibbonMaterial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width.max(0.0);
        self
    }

    pub fn with_map(mut self, use_map: bool) -> Self {
        self.use_map = use_map;
        self
    }

    pub fn set_resolution(&mut self, viewport: Viewport) {
        self.resolution = viewport.resolution();
    }

    pub fn aspect(&self) -> f32 {
        self.resolution.x / self.resolution.y.max(1.0)
    }
}

/// Triangle-strip style ribbon built from a polyline, two vertices per point.
#[derive(Debug, Clone, Default)]
pub struct RibbonGeometry {
    vertices: Vec<RibbonVertex>,
    indices: Vec<u32>,
}

impl RibbonGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        let mut geometry = Self::new();
        geometry.set_points(points);
        geometry
    }

    pub fn vertices(&self) -> &[RibbonVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertex buffer contents, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn point_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Rebuilds every attribute from `points`. Buffers are reused between calls.
    pub fn set_points(&mut self, points: &[Vec3]) {
        self.vertices.clear();
        self.indices.clear();

        let l = points.len();
        if l == 0 {
            return;
        }
        let closed = l > 2 && points[0] == points[l - 1];
        let last = l.saturating_sub(1).max(1) as f32;

        for (j, &position) in points.iter().enumerate() {
            let previous = match j {
                0 if closed => points[l - 2],
                0 => points[0],
                _ => points[j - 1],
            };
            let next = if j + 1 < l {
                points[j + 1]
            } else if closed {
                points[1]
            } else {
                points[l - 1]
            };

            let counter = j as f32 / last;
            for (side, v) in [(1.0, 0.0), (-1.0, 1.0)] {
                self.vertices.push(RibbonVertex::new(
                    position,
                    previous,
                    next,
                    side,
                    1.0,
                    counter,
                    Vec2::new(counter, v),
                ));
            }
        }

        for j in 0..l as u32 - 1 {
            let n = j * 2;
            self.indices.extend_from_slice(&[n, n + 1, n + 2, n + 2, n + 1, n + 3]);
        }
    }

    /// Runs the ribbon's vertex-stage extrusion on the CPU, writing one clip-space
    /// position per vertex into `out`.
    ///
    /// The direction is measured in aspect-corrected NDC and the half-width offset
    /// is applied in clip space before the divide, so the ribbon thins with depth.
    pub fn extrude_into(&self, view_proj: Mat4, material: &RibbonMaterial, out: &mut Vec<Vec4>) {
        out.clear();
        let aspect = material.aspect();
        let fix = |clip: Vec4| -> Vec2 {
            let ndc = clip.xy() / clip.w;
            Vec2::new(ndc.x * aspect, ndc.y)
        };

        out.extend(self.vertices.iter().map(|v| {
            let mut final_position = view_proj * v.position().extend(1.0);
            let prev_clip = view_proj * v.previous().extend(1.0);
            let next_clip = view_proj * v.next().extend(1.0);

            let current = fix(final_position);
            let prev = fix(prev_clip);
            let next = fix(next_clip);

            let dir = if next == current {
                (current - prev).normalize_or_zero()
            } else if prev == current {
                (next - current).normalize_or_zero()
            } else {
                let dir1 = (current - prev).normalize_or_zero();
                let dir2 = (next - current).normalize_or_zero();
                (dir1 + dir2).normalize_or_zero()
            };

            let w = material.line_width * v.width;
            let mut normal = Vec2::new(-dir.y, dir.x);
            normal.x /= aspect;
            let normal = normal * (0.5 * w);
            final_position.x += normal.x * v.side;
            final_position.y += normal.y * v.side;
            final_position
        }));
    }

    /// Extrudes and maps the result to pixel coordinates of `viewport`.
    pub fn screen_positions(&self, view_proj: Mat4, material: &RibbonMaterial, viewport: Viewport) -> Vec<Vec2> {
        let mut clip = Vec::with_capacity(self.vertices.len());
        self.extrude_into(view_proj, material, &mut clip);
        clip.into_iter()
            .map(|c| viewport.to_screen(c.xy() / c.w))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanyard_core::Camera;

    fn line(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect()
    }

    #[test]
    fn two_vertices_per_point() {
        let g = RibbonGeometry::from_points(&line(33));
        assert_eq!(g.vertices().len(), 66);
        assert_eq!(g.point_count(), 33);
        assert_eq!(g.indices().len(), 32 * 6);
        assert_eq!(&g.indices()[..6], &[0, 1, 2, 2, 1, 3]);
        assert_eq!(&g.indices()[6..12], &[2, 3, 4, 4, 3, 5]);
        assert_eq!(g.vertex_bytes().len(), 66 * std::mem::size_of::<RibbonVertex>());
        assert_eq!(g.index_bytes().len(), 32 * 6 * 4);
    }

    #[test]
    fn sides_and_counters() {
        let g = RibbonGeometry::from_points(&line(5));
        let v = g.vertices();
        assert_eq!(v[0].side, 1.0);
        assert_eq!(v[1].side, -1.0);
        assert_eq!(v[0].counter, 0.0);
        assert_eq!(v[4].counter, 0.5);
        assert_eq!(v[9].counter, 1.0);
        assert_eq!(v[8].uv, [1.0, 0.0]);
        assert_eq!(v[9].uv, [1.0, 1.0]);
    }

    #[test]
    fn open_ends_use_self_as_missing_neighbour() {
        let pts = line(4);
        let g = RibbonGeometry::from_points(&pts);
        let v = g.vertices();
        assert_eq!(v[0].previous(), pts[0]);
        assert_eq!(v[0].next(), pts[1]);
        assert_eq!(v[7].previous(), pts[2]);
        assert_eq!(v[7].next(), pts[3]);
    }

    #[test]
    fn closed_loop_wraps_neighbours() {
        let pts = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ZERO];
        let g = RibbonGeometry::from_points(&pts);
        let v = g.vertices();
        assert_eq!(v[0].previous(), pts[2]);
        assert_eq!(v[7].next(), pts[1]);
    }

    #[test]
    fn set_points_replaces_previous_geometry() {
        let mut g = RibbonGeometry::from_points(&line(10));
        g.set_points(&line(3));
        assert_eq!(g.vertices().len(), 6);
        assert_eq!(g.indices().len(), 12);
        g.set_points(&[]);
        assert!(g.is_empty());
        assert!(g.indices().is_empty());
    }

    #[test]
    fn extrusion_splits_sides_symmetrically() {
        let camera = Camera::default();
        let material = RibbonMaterial::default().with_line_width(0.5);
        let g = RibbonGeometry::from_points(&line(3));
        let mut clip = Vec::new();
        g.extrude_into(camera.view_projection_matrix(), &material, &mut clip);

        assert_eq!(clip.len(), 6);
        for pair in clip.chunks(2) {
            // a horizontal line extrudes vertically, one side up and one down
            approx::assert_abs_diff_eq!(pair[0].x, pair[1].x, epsilon = 1e-5);
            approx::assert_abs_diff_eq!(pair[0].y, -pair[1].y, epsilon = 1e-5);
            approx::assert_abs_diff_eq!((pair[0].y - pair[1].y).abs(), 0.5, epsilon = 1e-4);
        }
    }

    #[test]
    fn pixel_width_is_independent_of_orientation() {
        let viewport = Viewport::new(1280, 720);
        let mut camera = Camera::default();
        camera.set_aspect_ratio(viewport.aspect_ratio());
        let mut material = RibbonMaterial::default().with_line_width(0.2);
        material.set_resolution(viewport);

        let width = |points: &[Vec3]| {
            let s = RibbonGeometry::from_points(points).screen_positions(
                camera.view_projection_matrix(),
                &material,
                viewport,
            );
            s[2].distance(s[3])
        };
        let horizontal = width(&[Vec3::NEG_X, Vec3::ZERO, Vec3::X]);
        let vertical = width(&[Vec3::NEG_Y, Vec3::ZERO, Vec3::Y]);

        assert!(horizontal > 1.0);
        approx::assert_relative_eq!(horizontal, vertical, max_relative = 1e-3);
    }

    #[test]
    fn degenerate_polyline_stays_finite() {
        let camera = Camera::default();
        let g = RibbonGeometry::from_points(&[Vec3::ONE; 4]);
        let pts = g.screen_positions(camera.view_projection_matrix(), &RibbonMaterial::default(), Viewport::default());
        assert!(pts.iter().all(|p| p.is_finite()));
    }
}
