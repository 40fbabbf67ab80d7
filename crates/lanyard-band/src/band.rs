use glam::{Mat4, Vec2, Vec3};
use lanyard_core::{Camera, Result};
use lanyard_geometry::{CatmullRomCurve, RibbonGeometry, RibbonMaterial};
use lanyard_physics::{BodyType, PhysicsWorld};

use crate::chain::{Chain, ChainLink};
use crate::config::{BandConfig, BandVariant};
use crate::cursor::{CursorStyle, CursorTracker};
use crate::damping::damp_yaw;
use crate::drag::DragState;
use crate::smoothing::LerpedPosition;

/// Farthest a pointer ray is tested against the card.
const PICK_DISTANCE: f32 = 1000.0;

/// A lanyard hanging from a fixed point: the rope chain in the physics world
/// plus the ribbon rebuilt from it every frame.
pub struct Band {
    config: BandConfig,
    chain: Chain,
    curve: CatmullRomCurve,
    samples: Vec<Vec3>,
    ribbon: RibbonGeometry,
    material: RibbonMaterial,
    /// Smoothed joint1 / joint2
    lerped: [LerpedPosition; 2],
    drag: DragState,
    hovered: bool,
    cursor: CursorTracker,
}

impl Band {
    pub fn mount(world: &mut PhysicsWorld, config: BandConfig) -> Result<Self> {
        config.validate()?;

        let chain = Chain::mount(world, &config);
        let curve = CatmullRomCurve::default().with_curve_type(config.curve_type);
        let material = config.ribbon_material();

        log::info!("Band mounted ({:?})", config.variant);

        Ok(Self {
            samples: Vec::with_capacity(config.curve_divisions + 1),
            config,
            chain,
            curve,
            ribbon: RibbonGeometry::new(),
            material,
            lerped: [LerpedPosition::new(); 2],
            drag: DragState::Idle,
            hovered: false,
            cursor: CursorTracker::default(),
        })
    }

    /// Removes the chain from `world`. Returns the cursor reset if one is due.
    pub fn unmount(&mut self, world: &mut PhysicsWorld) -> Option<CursorStyle> {
        self.chain.unmount(world);
        self.drag = DragState::Idle;
        self.hovered = false;
        self.lerped.iter_mut().for_each(LerpedPosition::reset);
        log::info!("Band unmounted ({:?})", self.config.variant);
        self.cursor.reset()
    }

    /// Per-frame update, run after the physics step.
    ///
    /// `pointer` is in NDC. Links that are missing from the world make the
    /// affected stage a no-op for this frame.
    pub fn update(&mut self, world: &mut PhysicsWorld, camera: &Camera, pointer: Vec2, delta: f32) {
        if let Some(card) = self.chain.body(world, ChainLink::Card) {
            if let Some(target) = self.drag.target(camera.pointer_target(pointer)) {
                self.chain.wake_all(world);
                world.set_next_kinematic_translation(card, target);
            }
        }

        let links = (
            self.chain.translation(world, ChainLink::Anchor),
            self.chain.translation(world, ChainLink::Joint1),
            self.chain.translation(world, ChainLink::Joint2),
            self.chain.translation(world, ChainLink::Joint3),
        );
        let (Some(anchor), Some(mut j1), Some(mut j2), Some(j3)) = links else {
            return;
        };

        if self.config.variant.smoothing() {
            let (min, max) = (self.config.min_speed, self.config.max_speed);
            j1 = self.lerped[0].update(j1, delta, min, max);
            j2 = self.lerped[1].update(j2, delta, min, max);
        }

        // Card side first, anchor last.
        self.curve
            .control_points_mut()
            .copy_from_slice(&[j3, j2, j1, anchor]);
        self.curve
            .sample_into(self.config.curve_divisions, &mut self.samples);
        self.ribbon.set_points(&self.samples);

        if let Some(card) = self.chain.body(world, ChainLink::Card) {
            if let (Some(angvel), Some(rotation)) = (world.angvel(card), world.rotation(card)) {
                let damped = damp_yaw(angvel, rotation, self.config.yaw_damping);
                world.set_angvel(card, damped, self.config.wake_on_damping);
            }
        }
    }

    /// World point where the pointer ray meets the card, if it does.
    pub fn hit_test(&self, world: &PhysicsWorld, camera: &Camera, pointer: Vec2) -> Option<Vec3> {
        let card = self.chain.body(world, ChainLink::Card)?;
        let (origin, dir) = camera.ray_through(pointer);
        world.cast_ray_body(card, origin, dir, PICK_DISTANCE)
    }

    pub fn pointer_move(&mut self, world: &PhysicsWorld, camera: &Camera, pointer: Vec2) {
        self.hovered = self.hit_test(world, camera, pointer).is_some();
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
    }

    /// Grabs the card if the pointer is over it. Returns `true` when the
    /// pointer should be captured.
    pub fn pointer_down(&mut self, world: &mut PhysicsWorld, camera: &Camera, pointer: Vec2, pointer_id: i32) -> bool {
        let Some(hit) = self.hit_test(world, camera, pointer) else {
            return false;
        };
        self.hovered = true;

        let Some(card) = self.chain.body(world, ChainLink::Card) else {
            return false;
        };
        let Some(card_translation) = world.translation(card) else {
            return false;
        };
        if !self.drag.grab(pointer_id, hit, card_translation) {
            return false;
        }

        world.set_body_type(card, BodyType::KinematicPositionBased);
        log::debug!("Card grabbed by pointer {pointer_id} at {hit:?}");
        true
    }

    /// Lets go of the card. Returns `true` when `pointer_id`'s capture should be
    /// released.
    pub fn pointer_up(&mut self, world: &mut PhysicsWorld, pointer_id: i32) -> bool {
        if !self.drag.release(pointer_id) {
            return false;
        }
        if let Some(card) = self.chain.body(world, ChainLink::Card) {
            world.set_body_type(card, BodyType::Dynamic);
        }
        log::debug!("Card released by pointer {pointer_id}");
        true
    }

    /// Cursor style to apply, if it changed since the last call. Always `None`
    /// for variants without cursor feedback.
    pub fn cursor_change(&mut self) -> Option<CursorStyle> {
        if !self.config.variant.cursor_feedback() {
            return None;
        }
        self.cursor.update(self.hovered, self.drag.is_dragging())
    }

    /// Card model matrix: translation and rotation of the card body.
    pub fn card_transform(&self, world: &PhysicsWorld) -> Option<Mat4> {
        let card = self.chain.body(world, ChainLink::Card)?;
        Some(Mat4::from_rotation_translation(
            world.rotation(card)?,
            world.translation(card)?,
        ))
    }

    /// World-space corners of the card's face, counter-clockwise from bottom
    /// left.
    pub fn card_corners(&self, world: &PhysicsWorld) -> Option<[Vec3; 4]> {
        let transform = self.card_transform(world)?;
        let he = self.config.card_half_extents;
        Some([
            Vec2::new(-he.x, -he.y),
            Vec2::new(he.x, -he.y),
            Vec2::new(he.x, he.y),
            Vec2::new(-he.x, he.y),
        ]
        .map(|c| transform.transform_point3(c.extend(0.0))))
    }

    pub fn config(&self) -> &BandConfig {
        &self.config
    }

    pub fn variant(&self) -> BandVariant {
        self.config.variant
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn curve(&self) -> &CatmullRomCurve {
        &self.curve
    }

    /// Latest sampled polyline, card side first.
    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    pub fn ribbon(&self) -> &RibbonGeometry {
        &self.ribbon
    }

    pub fn material(&self) -> &RibbonMaterial {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut RibbonMaterial {
        &mut self.material
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn lerped(&self, link: ChainLink) -> Option<Vec3> {
        match link {
            ChainLink::Joint1 => self.lerped[0].get(),
            ChainLink::Joint2 => self.lerped[1].get(),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanyard_physics::WorldConfig;

    fn setup(config: BandConfig) -> (PhysicsWorld, Band) {
        let mut world = PhysicsWorld::new(WorldConfig::default()).unwrap();
        let band = Band::mount(&mut world, config).unwrap();
        (world, band)
    }

    #[test]
    fn first_update_builds_ribbon_from_chain() {
        let (mut world, mut band) = setup(BandConfig::default());
        band.update(&mut world, &Camera::default(), Vec2::ZERO, 1.0 / 60.0);

        assert_eq!(band.samples().len(), 33);
        assert_eq!(band.ribbon().point_count(), 33);
        let cps = band.curve().control_points();
        assert_eq!(cps[0], Vec3::new(1.5, 4.0, 0.0));
        assert_eq!(cps[3], Vec3::new(0.0, 4.0, 0.0));
        // lerp caches are seeded with the live positions
        assert_eq!(band.lerped(ChainLink::Joint1), Some(Vec3::new(0.5, 4.0, 0.0)));
        assert_eq!(band.lerped(ChainLink::Joint2), Some(Vec3::new(1.0, 4.0, 0.0)));
    }

    #[test]
    fn raw_variant_reads_live_positions() {
        let (mut world, mut band) = setup(BandConfig::raw());
        band.update(&mut world, &Camera::default(), Vec2::ZERO, 1.0 / 60.0);
        assert!(band.lerped(ChainLink::Joint1).is_none());
        assert_eq!(band.curve().control_points()[2], Vec3::new(0.5, 4.0, 0.0));
    }

    #[test]
    fn missing_link_skips_curve_update() {
        let (mut world, mut band) = setup(BandConfig::default());
        band.chain_mut().forget(ChainLink::Joint3);
        band.update(&mut world, &Camera::default(), Vec2::ZERO, 1.0 / 60.0);
        assert!(band.samples().is_empty());
        assert!(band.ribbon().is_empty());
    }

    #[test]
    fn missing_card_still_updates_curve() {
        let (mut world, mut band) = setup(BandConfig::default());
        band.chain_mut().forget(ChainLink::Card);
        band.update(&mut world, &Camera::default(), Vec2::ZERO, 1.0 / 60.0);
        assert_eq!(band.samples().len(), 33);
        assert!(band.card_transform(&world).is_none());
    }

    #[test]
    fn card_corners_span_the_collider() {
        let (world, band) = setup(BandConfig::default());
        let corners = band.card_corners(&world).unwrap();
        assert!(corners[0].abs_diff_eq(Vec3::new(1.2, 2.875, 0.0), 1e-5));
        assert!(corners[2].abs_diff_eq(Vec3::new(2.8, 5.125, 0.0), 1e-5));
    }

    #[test]
    fn unmount_resets_cursor_after_hover() {
        let (mut world, mut band) = setup(BandConfig::default());
        band.hovered = true;
        assert_eq!(band.cursor_change(), Some(CursorStyle::Grab));
        assert_eq!(band.unmount(&mut world), Some(CursorStyle::Auto));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn raw_variant_never_changes_cursor() {
        let (_world, mut band) = setup(BandConfig::raw());
        band.hovered = true;
        assert_eq!(band.cursor_change(), None);
    }
}
