use glam::Vec3;
use lanyard_physics::{BodyDesc, BodyId, BodyType, ColliderDesc, JointDesc, JointId, PhysicsWorld};

use crate::config::BandConfig;

/// The five bodies of the chain, anchor first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainLink {
    Anchor,
    Joint1,
    Joint2,
    Joint3,
    Card,
}

impl ChainLink {
    pub const ALL: [ChainLink; 5] = [
        ChainLink::Anchor,
        ChainLink::Joint1,
        ChainLink::Joint2,
        ChainLink::Joint3,
        ChainLink::Card,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Body and joint handles of a mounted chain.
///
/// Handles are optional: a link that was never created, or whose body has been
/// removed from the world, reads as missing and callers skip the work that
/// needs it.
#[derive(Debug, Default)]
pub struct Chain {
    bodies: [Option<BodyId>; 5],
    joints: Vec<JointId>,
}

impl Chain {
    /// Creates the bodies and joints in `world`.
    pub fn mount(world: &mut PhysicsWorld, config: &BandConfig) -> Self {
        let segment = |offset: Vec3| {
            BodyDesc::dynamic()
                .with_position(config.origin + offset)
                .with_linear_damping(config.linear_damping)
                .with_angular_damping(config.angular_damping)
                .with_can_sleep(config.can_sleep)
        };
        let ball = ColliderDesc::Ball {
            radius: config.joint_radius,
        };

        let anchor = world.create_body(&segment(Vec3::ZERO).with_body_type(BodyType::Fixed));
        let j1 = world.create_body(&segment(config.joint_offsets[0]).with_collider(ball));
        let j2 = world.create_body(&segment(config.joint_offsets[1]).with_collider(ball));
        let j3 = world.create_body(&segment(config.joint_offsets[2]).with_collider(ball));
        let card = world.create_body(&segment(config.card_offset).with_collider(ColliderDesc::Cuboid {
            half_extents: config.card_half_extents,
        }));

        let rope = JointDesc::rope(config.rope_length);
        let joints = vec![
            world.create_joint(anchor, j1, &rope),
            world.create_joint(j1, j2, &rope),
            world.create_joint(j2, j3, &rope),
            world.create_joint(j3, card, &JointDesc::spherical(Vec3::ZERO, config.card_anchor)),
        ];

        log::debug!("Mounted chain at {:?}: 5 bodies, {} joints", config.origin, joints.len());

        Self {
            bodies: [Some(anchor), Some(j1), Some(j2), Some(j3), Some(card)],
            joints,
        }
    }

    /// Removes every body and joint this chain created. Safe to call twice.
    pub fn unmount(&mut self, world: &mut PhysicsWorld) {
        for joint in self.joints.drain(..) {
            world.remove_joint(joint);
        }
        for body in self.bodies.iter_mut().filter_map(Option::take) {
            world.remove_body(body);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.bodies.iter().any(Option::is_some)
    }

    /// Handle of `link`, if it exists in `world`.
    pub fn body(&self, world: &PhysicsWorld, link: ChainLink) -> Option<BodyId> {
        self.bodies[link.index()].filter(|id| world.contains_body(*id))
    }

    pub fn translation(&self, world: &PhysicsWorld, link: ChainLink) -> Option<Vec3> {
        world.translation(self.body(world, link)?)
    }

    pub fn joints(&self) -> &[JointId] {
        &self.joints
    }

    pub fn wake_all(&self, world: &mut PhysicsWorld) {
        for body in self.bodies.iter().flatten() {
            world.wake_up(*body);
        }
    }

    #[cfg(test)]
    pub(crate) fn forget(&mut self, link: ChainLink) {
        self.bodies[link.index()] = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanyard_physics::WorldConfig;

    #[test]
    fn mounts_bodies_at_configured_offsets() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        let config = BandConfig::default();
        let chain = Chain::mount(&mut world, &config);

        assert_eq!(world.body_count(), 5);
        assert_eq!(world.joint_count(), 4);
        assert_eq!(chain.joints().len(), 4);
        assert_eq!(chain.translation(&world, ChainLink::Anchor), Some(Vec3::new(0.0, 4.0, 0.0)));
        assert_eq!(chain.translation(&world, ChainLink::Joint2), Some(Vec3::new(1.0, 4.0, 0.0)));
        assert_eq!(chain.translation(&world, ChainLink::Card), Some(Vec3::new(2.0, 4.0, 0.0)));

        let anchor = chain.body(&world, ChainLink::Anchor).unwrap();
        let card = chain.body(&world, ChainLink::Card).unwrap();
        assert_eq!(world.body_type(anchor), Some(BodyType::Fixed));
        assert_eq!(world.body_type(card), Some(BodyType::Dynamic));
    }

    #[test]
    fn unmount_clears_world() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        let mut chain = Chain::mount(&mut world, &BandConfig::default());
        chain.unmount(&mut world);
        chain.unmount(&mut world);

        assert!(!chain.is_mounted());
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.joint_count(), 0);
        assert!(chain.translation(&world, ChainLink::Card).is_none());
    }

    #[test]
    fn removed_body_reads_as_missing() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        let chain = Chain::mount(&mut world, &BandConfig::default());
        let j2 = chain.body(&world, ChainLink::Joint2).unwrap();
        world.remove_body(j2);
        assert!(chain.body(&world, ChainLink::Joint2).is_none());
        assert!(chain.body(&world, ChainLink::Joint1).is_some());
    }
}
