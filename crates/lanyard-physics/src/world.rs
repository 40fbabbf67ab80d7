use glam::{Quat, Vec3};
use lanyard_core::{LanyardError, Result};
use rapier3d::parry::query::{Ray, RayCast};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::body::{BodyDesc, BodyId, BodyType};
use crate::convert::{na_to_quat, na_to_vec3, vec3_to_na, vec3_to_point};
use crate::joint::{JointDesc, JointId};

/// Simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: Vec3,
    /// Fixed solver step in seconds
    pub time_step: f32,
    /// Upper bound on the frame time fed into the step accumulator
    pub max_frame_delta: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -40.0, 0.0),
            time_step: 1.0 / 60.0,
            max_frame_delta: 0.1,
        }
    }
}

impl WorldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_time_step(mut self, time_step: f32) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_max_frame_delta(mut self, max_frame_delta: f32) -> Self {
        self.max_frame_delta = max_frame_delta;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_step.is_nan() || self.time_step <= 0.0 {
            return Err(LanyardError::InvalidConfiguration(format!(
                "time_step must be positive, got {}",
                self.time_step
            )));
        }
        if self.max_frame_delta < self.time_step {
            return Err(LanyardError::InvalidConfiguration(format!(
                "max_frame_delta ({}) is shorter than one time_step ({})",
                self.max_frame_delta, self.time_step
            )));
        }
        if !self.gravity.is_finite() {
            return Err(LanyardError::InvalidConfiguration("gravity must be finite".into()));
        }
        Ok(())
    }
}

/// Owns all rapier state for one scene.
pub struct PhysicsWorld {
    config: WorldConfig,
    accumulator: f32,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    pub(crate) impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;

        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.time_step;

        log::debug!(
            "Physics world created: gravity={:?}, dt={}",
            config.gravity,
            config.time_step
        );

        Ok(Self {
            config,
            accumulator: 0.0,
            gravity: vec3_to_na(config.gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Advance by exactly one fixed step.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Feed one frame's elapsed time into the fixed-step accumulator and run as
    /// many steps as it covers. Returns the number of steps taken.
    pub fn advance(&mut self, frame_delta: f32) -> u32 {
        if frame_delta.is_finite() {
            self.accumulator += frame_delta.clamp(0.0, self.config.max_frame_delta);
        }

        let mut steps = 0;
        while self.accumulator >= self.config.time_step {
            self.step();
            self.accumulator -= self.config.time_step;
            steps += 1;
        }
        steps
    }

    // -- bodies --

    pub fn create_body(&mut self, desc: &BodyDesc) -> BodyId {
        let handle = self.bodies.insert(desc.build_body());
        if let Some(collider) = desc.collider {
            self.colliders
                .insert_with_parent(collider.build_collider().build(), handle, &mut self.bodies);
        }
        BodyId(handle)
    }

    /// Remove a body with its colliders and any joints attached to it.
    pub fn remove_body(&mut self, body: BodyId) {
        self.bodies.remove(
            body.0,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn contains_body(&self, body: BodyId) -> bool {
        self.bodies.contains(body.0)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn translation(&self, body: BodyId) -> Option<Vec3> {
        self.bodies.get(body.0).map(|rb| na_to_vec3(rb.translation()))
    }

    pub fn rotation(&self, body: BodyId) -> Option<Quat> {
        self.bodies.get(body.0).map(|rb| na_to_quat(rb.rotation()))
    }

    pub fn angvel(&self, body: BodyId) -> Option<Vec3> {
        self.bodies.get(body.0).map(|rb| na_to_vec3(rb.angvel()))
    }

    pub fn linvel(&self, body: BodyId) -> Option<Vec3> {
        self.bodies.get(body.0).map(|rb| na_to_vec3(rb.linvel()))
    }

    pub fn set_angvel(&mut self, body: BodyId, angvel: Vec3, wake_up: bool) {
        if let Some(rb) = self.bodies.get_mut(body.0) {
            rb.set_angvel(vec3_to_na(angvel), wake_up);
        }
    }

    pub fn set_next_kinematic_translation(&mut self, body: BodyId, translation: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.0) {
            rb.set_next_kinematic_translation(vec3_to_na(translation));
        }
    }

    pub fn body_type(&self, body: BodyId) -> Option<BodyType> {
        self.bodies
            .get(body.0)
            .map(|rb| BodyType::from_rapier(rb.body_type()))
    }

    pub fn set_body_type(&mut self, body: BodyId, body_type: BodyType) {
        if let Some(rb) = self.bodies.get_mut(body.0) {
            if BodyType::from_rapier(rb.body_type()) != body_type {
                rb.set_body_type(body_type.to_rapier(), true);
            }
        }
    }

    pub fn wake_up(&mut self, body: BodyId) {
        if let Some(rb) = self.bodies.get_mut(body.0) {
            rb.wake_up(true);
        }
    }

    pub fn is_sleeping(&self, body: BodyId) -> Option<bool> {
        self.bodies.get(body.0).map(|rb| rb.is_sleeping())
    }

    /// Closest hit of the ray `origin + dir * t` against the colliders of
    /// `body`. Returns the hit point.
    pub fn cast_ray_body(&self, body: BodyId, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<Vec3> {
        let rb = self.bodies.get(body.0)?;
        let ray = Ray::new(vec3_to_point(origin), vec3_to_na(dir));

        rb.colliders()
            .iter()
            .filter_map(|handle| self.colliders.get(*handle))
            .filter_map(|collider| {
                collider
                    .shape()
                    .cast_ray(collider.position(), &ray, max_distance, true)
            })
            .min_by(|a, b| a.total_cmp(b))
            .map(|toi| origin + dir * toi)
    }

    // -- joints --

    pub fn create_joint(&mut self, body_a: BodyId, body_b: BodyId, desc: &JointDesc) -> JointId {
        JointId(
            self.impulse_joints
                .insert(body_a.0, body_b.0, desc.build(), true),
        )
    }

    pub fn remove_joint(&mut self, joint: JointId) {
        self.impulse_joints.remove(joint.0, true);
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::ColliderDesc;

    fn ball_at(position: Vec3) -> BodyDesc {
        BodyDesc::dynamic()
            .with_position(position)
            .with_collider(ColliderDesc::Ball { radius: 0.1 })
    }

    #[test]
    fn rejects_bad_time_step() {
        assert!(WorldConfig::new().with_time_step(0.0).validate().is_err());
        assert!(WorldConfig::new().with_max_frame_delta(0.001).validate().is_err());
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn gravity_pulls_dynamic_body_down() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        let body = world.create_body(&ball_at(Vec3::new(0.0, 4.0, 0.0)));
        for _ in 0..10 {
            world.step();
        }
        assert!(world.translation(body).unwrap().y < 4.0);
    }

    #[test]
    fn fixed_body_does_not_move() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        let body = world.create_body(&BodyDesc::fixed().with_position(Vec3::new(0.0, 4.0, 0.0)));
        for _ in 0..10 {
            world.step();
        }
        assert_eq!(world.translation(body), Some(Vec3::new(0.0, 4.0, 0.0)));
    }

    #[test]
    fn accumulator_steps_in_fixed_increments() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        assert_eq!(world.advance(0.005), 0);
        assert_eq!(world.advance(0.05), 3);
        // frame time is capped at max_frame_delta
        assert!(world.advance(10.0) <= 7);
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        assert_eq!(world.advance(f32::NAN), 0);
        assert_eq!(world.advance(f32::INFINITY), 0);
        assert_eq!(world.advance(0.055), 3);
    }

    #[test]
    fn removed_body_reads_as_missing() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        let body = world.create_body(&ball_at(Vec3::ZERO));
        world.remove_body(body);
        assert!(world.translation(body).is_none());
        assert!(world.angvel(body).is_none());
        // writes to a missing body are ignored
        world.set_angvel(body, Vec3::ONE, true);
        world.wake_up(body);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn body_type_toggles() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        let body = world.create_body(&ball_at(Vec3::ZERO));
        assert_eq!(world.body_type(body), Some(BodyType::Dynamic));
        world.set_body_type(body, BodyType::KinematicPositionBased);
        assert_eq!(world.body_type(body), Some(BodyType::KinematicPositionBased));
        world.set_body_type(body, BodyType::Dynamic);
        assert_eq!(world.body_type(body), Some(BodyType::Dynamic));
    }

    #[test]
    fn kinematic_body_follows_command() {
        let mut world = PhysicsWorld::new(WorldConfig::default().with_gravity(Vec3::ZERO)).unwrap();
        let body = world.create_body(
            &ball_at(Vec3::ZERO).with_body_type(BodyType::KinematicPositionBased),
        );
        world.set_next_kinematic_translation(body, Vec3::new(1.0, 2.0, 3.0));
        world.step();
        let t = world.translation(body).unwrap();
        assert!(t.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5), "{t:?}");
    }

    #[test]
    fn rope_limits_separation() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        let anchor = world.create_body(&BodyDesc::fixed().with_position(Vec3::new(0.0, 4.0, 0.0)));
        let bob = world.create_body(&ball_at(Vec3::new(0.5, 4.0, 0.0)));
        world.create_joint(anchor, bob, &JointDesc::rope(1.0));
        assert_eq!(world.joint_count(), 1);

        for _ in 0..120 {
            world.step();
        }
        let d = world.translation(bob).unwrap().distance(Vec3::new(0.0, 4.0, 0.0));
        assert!(d < 1.1, "rope stretched to {d}");
    }

    #[test]
    fn ray_hits_cuboid_face() {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        let card = world.create_body(
            &BodyDesc::dynamic()
                .with_position(Vec3::new(2.0, 4.0, 0.0))
                .with_collider(ColliderDesc::Cuboid {
                    half_extents: Vec3::new(0.8, 1.125, 0.01),
                }),
        );

        let hit = world
            .cast_ray_body(card, Vec3::new(2.0, 4.0, 13.0), Vec3::NEG_Z, 100.0)
            .expect("ray should hit the card");
        approx::assert_abs_diff_eq!(hit.z, 0.01, epsilon = 1e-4);

        let miss = world.cast_ray_body(card, Vec3::new(5.0, 4.0, 13.0), Vec3::NEG_Z, 100.0);
        assert!(miss.is_none());
    }
}
