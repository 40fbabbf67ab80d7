use glam::Vec3;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::convert::vec3_to_na;

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    Dynamic,
    Fixed,
    /// Moved by [`crate::PhysicsWorld::set_next_kinematic_translation`]
    KinematicPositionBased,
}

impl BodyType {
    pub(crate) fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
            BodyType::KinematicPositionBased => RigidBodyType::KinematicPositionBased,
        }
    }

    pub(crate) fn from_rapier(ty: RigidBodyType) -> Self {
        match ty {
            RigidBodyType::Dynamic => BodyType::Dynamic,
            RigidBodyType::Fixed => BodyType::Fixed,
            // velocity-based kinematics are never created here
            RigidBodyType::KinematicPositionBased | RigidBodyType::KinematicVelocityBased => {
                BodyType::KinematicPositionBased
            }
        }
    }
}

/// Collider shape attached to a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

impl ColliderDesc {
    pub(crate) fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
        }
    }
}

/// Description of a rigid body before creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub can_sleep: bool,
    /// Bodies without a collider (the fixed anchor) have no mass of their own.
    pub collider: Option<ColliderDesc>,
}

impl BodyDesc {
    pub fn dynamic() -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec3::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
            can_sleep: true,
            collider: None,
        }
    }

    pub fn fixed() -> Self {
        Self {
            body_type: BodyType::Fixed,
            ..Self::dynamic()
        }
    }

    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }

    pub fn with_can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    pub fn with_collider(mut self, collider: ColliderDesc) -> Self {
        self.collider = Some(collider);
        self
    }

    pub(crate) fn build_body(&self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type.to_rapier())
            .translation(vec3_to_na(self.position))
            .linear_damping(self.linear_damping)
            .angular_damping(self.angular_damping)
            .can_sleep(self.can_sleep)
            .build()
    }
}

/// Handle to a body owned by a [`crate::PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub(crate) RigidBodyHandle);
