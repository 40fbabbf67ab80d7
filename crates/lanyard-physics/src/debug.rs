use glam::Vec3;
use rapier3d::na;
use rapier3d::prelude::*;

use crate::convert::point_to_vec3;
use crate::world::PhysicsWorld;

const CIRCLE_SEGMENTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugLineKind {
    Collider,
    Joint,
}

/// World-space segment for the physics overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
    pub kind: DebugLineKind,
}

impl DebugLine {
    fn new(start: Vec3, end: Vec3, kind: DebugLineKind) -> Self {
        Self { start, end, kind }
    }
}

impl PhysicsWorld {
    /// Wireframe of every collider plus one segment per joint between its two
    /// world-space anchors.
    pub fn debug_lines(&self) -> Vec<DebugLine> {
        let mut lines = Vec::new();

        for (_, collider) in self.colliders.iter() {
            let iso = collider.position();
            let shape = collider.shape();
            if let Some(ball) = shape.as_ball() {
                push_ball(&mut lines, iso, ball.radius);
            } else if let Some(cuboid) = shape.as_cuboid() {
                push_cuboid(&mut lines, iso, &cuboid.half_extents);
            }
        }

        for (_, joint) in self.impulse_joints.iter() {
            let (Some(rb1), Some(rb2)) = (self.bodies.get(joint.body1), self.bodies.get(joint.body2)) else {
                continue;
            };
            let a = rb1.position() * joint.data.local_anchor1();
            let b = rb2.position() * joint.data.local_anchor2();
            lines.push(DebugLine::new(point_to_vec3(&a), point_to_vec3(&b), DebugLineKind::Joint));
        }

        lines
    }
}

fn push_segment(lines: &mut Vec<DebugLine>, iso: &Isometry<Real>, a: na::Point3<f32>, b: na::Point3<f32>) {
    lines.push(DebugLine::new(
        point_to_vec3(&(iso * a)),
        point_to_vec3(&(iso * b)),
        DebugLineKind::Collider,
    ));
}

// Three great circles, one per local axis.
fn push_ball(lines: &mut Vec<DebugLine>, iso: &Isometry<Real>, radius: f32) {
    let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
    for axis in 0..3 {
        let on_circle = |i: usize| {
            let (s, c) = (i as f32 * step).sin_cos();
            let (u, v) = (c * radius, s * radius);
            match axis {
                0 => na::Point3::new(0.0, u, v),
                1 => na::Point3::new(u, 0.0, v),
                _ => na::Point3::new(u, v, 0.0),
            }
        };
        for i in 0..CIRCLE_SEGMENTS {
            push_segment(lines, iso, on_circle(i), on_circle(i + 1));
        }
    }
}

fn push_cuboid(lines: &mut Vec<DebugLine>, iso: &Isometry<Real>, he: &na::Vector3<f32>) {
    let corner = |i: usize| {
        na::Point3::new(
            if i & 1 == 0 { -he.x } else { he.x },
            if i & 2 == 0 { -he.y } else { he.y },
            if i & 4 == 0 { -he.z } else { he.z },
        )
    };
    // Corners differing in exactly one bit share an edge.
    for i in 0..8usize {
        for bit in [1, 2, 4] {
            if i & bit == 0 {
                push_segment(lines, iso, corner(i), corner(i | bit));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BodyDesc, ColliderDesc, JointDesc, WorldConfig};

    #[test]
    fn counts_collider_and_joint_lines() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        let anchor = world.create_body(&BodyDesc::fixed());
        let ball = world.create_body(
            &BodyDesc::dynamic()
                .with_position(Vec3::X)
                .with_collider(ColliderDesc::Ball { radius: 0.1 }),
        );
        let card = world.create_body(
            &BodyDesc::dynamic()
                .with_position(Vec3::new(2.0, 0.0, 0.0))
                .with_collider(ColliderDesc::Cuboid {
                    half_extents: Vec3::new(0.8, 1.125, 0.01),
                }),
        );
        world.create_joint(anchor, ball, &JointDesc::rope(1.0));
        world.create_joint(ball, card, &JointDesc::spherical(Vec3::ZERO, Vec3::new(0.0, 1.45, 0.0)));

        let lines = world.debug_lines();
        let colliders = lines.iter().filter(|l| l.kind == DebugLineKind::Collider).count();
        let joints: Vec<_> = lines.iter().filter(|l| l.kind == DebugLineKind::Joint).collect();

        assert_eq!(colliders, 3 * CIRCLE_SEGMENTS + 12);
        assert_eq!(joints.len(), 2);
        assert!(joints.iter().any(|l| l.start == Vec3::ZERO));
        assert!(joints.iter().any(|l| l.end.abs_diff_eq(Vec3::new(2.0, 1.45, 0.0), 1e-5)));
    }

    #[test]
    fn cuboid_edges_lie_on_the_box() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        world.create_body(&BodyDesc::fixed().with_collider(ColliderDesc::Cuboid {
            half_extents: Vec3::new(1.0, 2.0, 3.0),
        }));
        for line in world.debug_lines() {
            for p in [line.start, line.end] {
                assert!(p.abs().abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
            }
        }
    }
}
