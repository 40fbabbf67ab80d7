use glam::Vec3;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::convert::vec3_to_point;

/// Description of a joint between two bodies. Anchors are in each body's local
/// frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JointDesc {
    /// Keeps the anchors at most `length` apart; slack below that.
    Rope {
        anchor_a: Vec3,
        anchor_b: Vec3,
        length: f32,
    },
    /// Ball-and-socket: the anchors coincide, rotation is free.
    Spherical { anchor_a: Vec3, anchor_b: Vec3 },
}

impl JointDesc {
    pub fn rope(length: f32) -> Self {
        JointDesc::Rope {
            anchor_a: Vec3::ZERO,
            anchor_b: Vec3::ZERO,
            length,
        }
    }

    pub fn spherical(anchor_a: Vec3, anchor_b: Vec3) -> Self {
        JointDesc::Spherical { anchor_a, anchor_b }
    }

    pub(crate) fn build(&self) -> GenericJoint {
        match *self {
            JointDesc::Rope {
                anchor_a,
                anchor_b,
                length,
            } => RopeJointBuilder::new(length)
                .local_anchor1(vec3_to_point(anchor_a))
                .local_anchor2(vec3_to_point(anchor_b))
                .build()
                .into(),
            JointDesc::Spherical { anchor_a, anchor_b } => SphericalJointBuilder::new()
                .local_anchor1(vec3_to_point(anchor_a))
                .local_anchor2(vec3_to_point(anchor_b))
                .build()
                .into(),
        }
    }
}

/// Handle to a joint in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointId(pub(crate) ImpulseJointHandle);
