use glam::{Vec2, Vec3};
use lanyard_core::{Camera, Result, Viewport};
use lanyard_physics::PhysicsWorld;

use crate::band::Band;
use crate::config::{BandVariant, SceneConfig};
use crate::cursor::CursorStyle;
use crate::frame::{FrameData, ScreenLine};

/// The whole interactive scene: physics world, camera, viewport and the band.
///
/// Hosts drive it with pointer events in pixel coordinates and one
/// [`Scene::tick`] per animation frame.
pub struct Scene {
    config: SceneConfig,
    world: PhysicsWorld,
    band: Band,
    camera: Camera,
    viewport: Viewport,
    /// Last pointer position in NDC
    pointer: Vec2,
    debug: bool,
    pending_cursor: Option<CursorStyle>,
    frame: u64,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Self> {
        config.validate()?;

        let mut world = PhysicsWorld::new(config.world)?;
        let band = Band::mount(&mut world, config.band.clone())?;
        let viewport = Viewport::default();
        let mut camera = config.camera;
        camera.set_aspect_ratio(viewport.aspect_ratio());

        log::info!(
            "Scene created: variant={:?}, debug={}",
            config.band.variant,
            config.debug
        );

        let mut scene = Self {
            debug: config.debug,
            config,
            world,
            band,
            camera,
            viewport,
            pointer: Vec2::ZERO,
            pending_cursor: None,
            frame: 0,
        };
        scene.band.material_mut().set_resolution(viewport);
        Ok(scene)
    }

    /// Physics first, then the band reads the new transforms. A non-finite or
    /// negative `delta` counts as a zero-length frame.
    pub fn tick(&mut self, delta: f32) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let steps = self.world.advance(delta);
        self.band
            .update(&mut self.world, &self.camera, self.pointer, delta);
        self.frame += 1;

        if steps == 0 {
            log::trace!("Frame {}: no physics step (delta {delta})", self.frame);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_aspect_ratio(self.viewport.aspect_ratio());
        self.band.material_mut().set_resolution(self.viewport);
        log::debug!("Viewport resized to {width}x{height}");
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = self.viewport.to_ndc(x, y);
        self.band
            .pointer_move(&self.world, &self.camera, self.pointer);
        self.queue_cursor();
    }

    /// Returns `true` if the host should capture the pointer.
    pub fn pointer_down(&mut self, x: f32, y: f32, pointer_id: i32) -> bool {
        self.pointer = self.viewport.to_ndc(x, y);
        let captured = self
            .band
            .pointer_down(&mut self.world, &self.camera, self.pointer, pointer_id);
        self.queue_cursor();
        captured
    }

    /// Returns `true` if the host should release the pointer capture.
    pub fn pointer_up(&mut self, pointer_id: i32) -> bool {
        let released = self.band.pointer_up(&mut self.world, pointer_id);
        self.queue_cursor();
        released
    }

    pub fn pointer_leave(&mut self) {
        self.band.pointer_leave();
        self.queue_cursor();
    }

    /// Cursor style the host should apply, if it changed.
    pub fn take_cursor_change(&mut self) -> Option<CursorStyle> {
        self.pending_cursor.take()
    }

    fn queue_cursor(&mut self) {
        if let Some(style) = self.band.cursor_change() {
            self.pending_cursor = Some(style);
        }
    }

    pub fn set_debug(&mut self, debug: bool) {
        if self.debug != debug {
            log::info!("Physics debug overlay {}", if debug { "on" } else { "off" });
        }
        self.debug = debug;
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Swaps the band for one of `variant` by unmounting and mounting again in
    /// the same world.
    pub fn set_variant(&mut self, variant: BandVariant) -> Result<()> {
        if self.band.variant() == variant {
            return Ok(());
        }

        let mut band_config = self.config.band.clone().with_variant(variant);
        band_config.validate()?;

        if let Some(style) = self.band.unmount(&mut self.world) {
            self.pending_cursor = Some(style);
        }
        let mut band = Band::mount(&mut self.world, band_config.clone())?;
        band.material_mut().set_resolution(self.viewport);

        self.band = band;
        self.config.band = band_config;
        Ok(())
    }

    pub fn variant(&self) -> BandVariant {
        self.band.variant()
    }

    /// Tears the band down, leaving an empty world.
    pub fn shutdown(&mut self) -> Option<CursorStyle> {
        self.band.unmount(&mut self.world)
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn band(&self) -> &Band {
        &self.band
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Pixel position of a world point.
    pub fn world_to_screen(&self, world: Vec3) -> Vec2 {
        self.viewport
            .to_screen(self.camera.project(world).truncate())
    }

    /// Projects the current state for drawing.
    pub fn frame_data(&self) -> FrameData {
        let material = self.band.material();
        let ribbon = self.band.ribbon().screen_positions(
            self.camera.view_projection_matrix(),
            material,
            self.viewport,
        );
        let repeat = material.repeat;
        let ribbon_uvs = self
            .band
            .ribbon()
            .vertices()
            .iter()
            .map(|v| Vec2::from(v.uv) * repeat)
            .collect();

        let card = self
            .band
            .card_corners(&self.world)
            .map(|corners| corners.map(|c| self.world_to_screen(c)));

        let debug_lines = if self.debug {
            self.world
                .debug_lines()
                .into_iter()
                .map(|line| ScreenLine {
                    start: self.world_to_screen(line.start),
                    end: self.world_to_screen(line.end),
                    kind: line.kind,
                })
                .collect()
        } else {
            Vec::new()
        };

        FrameData {
            ribbon,
            ribbon_uvs,
            ribbon_indices: self.band.ribbon().indices().to_vec(),
            ribbon_opacity: material.opacity,
            ribbon_textured: material.use_map,
            card,
            variant: self.band.variant(),
            debug_lines,
        }
    }
}
