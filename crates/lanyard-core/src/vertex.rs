use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// One ribbon vertex in the MeshLine layout: the line position plus both
/// neighbours, so the vertex stage can extrude it in screen space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RibbonVertex {
    pub position: [f32; 3],
    pub previous: [f32; 3],
    pub next: [f32; 3],
    /// `+1.0` or `-1.0`: which edge of the ribbon this vertex belongs to
    pub side: f32,
    pub width: f32,
    /// Normalized distance along the line, `0.0..=1.0`
    pub counter: f32,
    pub uv: [f32; 2],
}

impl RibbonVertex {
    pub fn new(
        position: Vec3,
        previous: Vec3,
        next: Vec3,
        side: f32,
        width: f32,
        counter: f32,
        uv: Vec2,
    ) -> Self {
        Self {
            position: position.to_array(),
            previous: previous.to_array(),
            next: next.to_array(),
            side,
            width,
            counter,
            uv: uv.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn previous(&self) -> Vec3 {
        Vec3::from_array(self.previous)
    }

    pub fn next(&self) -> Vec3 {
        Vec3::from_array(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<RibbonVertex>(), 14 * 4);
        let v = RibbonVertex::default();
        assert_eq!(bytemuck::bytes_of(&v).len(), 56);
    }
}
