//! Draws a [`FrameData`] onto any 2D surface.
//!
//! The browser implements [`Surface`] over a canvas context; tests use a
//! recording surface.

use glam::{Affine2, Mat3, Vec2};
use lanyard::band::{BandVariant, FrameData};
use lanyard::physics::DebugLineKind;

pub const BACKGROUND: &str = "#202025";
pub const RIBBON_COLOR: &str = "#ffffff";
pub const CARD_COLOR: &str = "#f4f4f6";
pub const CARD_EDGE: &str = "#9a9aa2";
pub const COLLIDER_COLOR: &str = "#4cd964";
pub const JOINT_COLOR: &str = "#ff6b6b";

pub trait Surface {
    fn clear(&mut self, width: f32, height: f32, color: &str);

    fn fill_polygon(&mut self, points: &[Vec2], color: &str, alpha: f32);

    fn stroke_polygon(&mut self, points: &[Vec2], color: &str, width: f32);

    /// Fill `triangle` with the repeating texture, mapped through
    /// `texture_to_screen`. `texture_rect` bounds the triangle in texture pixels.
    fn fill_textured_triangle(
        &mut self,
        triangle: [Vec2; 3],
        texture_to_screen: Affine2,
        texture_rect: (Vec2, Vec2),
        alpha: f32,
    );

    fn stroke_line(&mut self, start: Vec2, end: Vec2, color: &str, width: f32);
}

/// Affine map taking each `from[i]` to `to[i]`. `None` for degenerate input.
pub fn triangle_affine(from: [Vec2; 3], to: [Vec2; 3]) -> Option<Affine2> {
    let src = Mat3::from_cols(from[0].extend(1.0), from[1].extend(1.0), from[2].extend(1.0));
    if src.determinant().abs() < 1e-9 {
        return None;
    }
    let dst = Mat3::from_cols(to[0].extend(1.0), to[1].extend(1.0), to[2].extend(1.0));
    let m = dst * src.inverse();
    m.is_finite().then(|| Affine2::from_mat3(m))
}

/// Paints one frame: background, card, ribbon on top of it, then the physics
/// overlay. `texture_size` is the band image size once it has loaded.
pub fn paint_frame<S: Surface>(surface: &mut S, frame: &FrameData, size: Vec2, texture_size: Option<Vec2>) {
    surface.clear(size.x, size.y, BACKGROUND);

    if let Some(card) = frame.card {
        match frame.variant {
            BandVariant::Full => {
                surface.fill_polygon(&card, CARD_COLOR, 1.0);
                surface.stroke_polygon(&card, CARD_EDGE, 1.0);
            }
            BandVariant::Raw => surface.fill_polygon(&card, RIBBON_COLOR, 0.25),
        }
    }

    let texture_size = texture_size.filter(|_| frame.ribbon_textured);
    for (tri, indices) in frame.ribbon_triangles() {
        let textured = texture_size.and_then(|tex| {
            let uv_at = |i: u32| frame.ribbon_uvs.get(i as usize).map(|uv| *uv * tex);
            let uv = [uv_at(indices[0])?, uv_at(indices[1])?, uv_at(indices[2])?];
            let affine = triangle_affine(uv, tri)?;
            let rect = (uv[0].min(uv[1]).min(uv[2]), uv[0].max(uv[1]).max(uv[2]));
            Some((affine, rect))
        });

        match textured {
            Some((affine, rect)) => surface.fill_textured_triangle(tri, affine, rect, frame.ribbon_opacity),
            None => surface.fill_polygon(&tri, RIBBON_COLOR, frame.ribbon_opacity),
        }
    }

    for line in &frame.debug_lines {
        let color = match line.kind {
            DebugLineKind::Collider => COLLIDER_COLOR,
            DebugLineKind::Joint => JOINT_COLOR,
        };
        surface.stroke_line(line.start, line.end, color, 1.0);
    }
}
