use glam::Vec2;
use lanyard_physics::DebugLineKind;

use crate::config::BandVariant;

/// Segment of the physics overlay in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLine {
    pub start: Vec2,
    pub end: Vec2,
    pub kind: DebugLineKind,
}

/// Everything a 2D host needs to draw one frame, in pixel coordinates.
#[derive(Debug, Clone, Default)]
pub struct FrameData {
    /// Extruded ribbon vertices, two per sampled point
    pub ribbon: Vec<Vec2>,
    pub ribbon_uvs: Vec<Vec2>,
    pub ribbon_indices: Vec<u32>,
    pub ribbon_opacity: f32,
    pub ribbon_textured: bool,
    /// Card face corners, counter-clockwise from bottom left
    pub card: Option<[Vec2; 4]>,
    pub variant: BandVariant,
    /// Empty unless the debug overlay is on
    pub debug_lines: Vec<ScreenLine>,
}

impl FrameData {
    /// Ribbon triangles as pixel-space corners with the vertex indices they
    /// came from. Triangles referencing missing vertices are skipped.
    pub fn ribbon_triangles(&self) -> impl Iterator<Item = ([Vec2; 3], [u32; 3])> + '_ {
        self.ribbon_indices.chunks_exact(3).filter_map(|tri| {
            let corner = |i: u32| self.ribbon.get(i as usize).copied();
            Some((
                [corner(tri[0])?, corner(tri[1])?, corner(tri[2])?],
                [tri[0], tri[1], tri[2]],
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangles_follow_indices() {
        let frame = FrameData {
            ribbon: vec![Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ONE],
            ribbon_indices: vec![0, 1, 2, 2, 1, 3],
            ..Default::default()
        };
        let tris: Vec<_> = frame.ribbon_triangles().collect();
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[1], ([Vec2::Y, Vec2::X, Vec2::ONE], [2, 1, 3]));
    }

    #[test]
    fn out_of_range_indices_are_skipped() {
        let frame = FrameData {
            ribbon: vec![Vec2::ZERO, Vec2::X],
            ribbon_indices: vec![0, 1, 5],
            ..Default::default()
        };
        assert_eq!(frame.ribbon_triangles().count(), 0);
    }
}
