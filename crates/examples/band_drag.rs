//! Scripted drag of the card.
//!
//! Lets the band settle, grabs the card under the pointer, walks the pointer
//! around a circle and lets go, logging where the card ends up and which
//! cursor the host would show at each step.

use glam::Vec2;
use lanyard::band::{BandVariant, ChainLink};
use lanyard::prelude::*;

const FRAME: f32 = 1.0 / 60.0;
const POINTER: i32 = 1;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let variant = match std::env::args().nth(1).as_deref() {
        Some("raw") => BandVariant::Raw,
        _ => BandVariant::Full,
    };

    if let Err(err) = run(variant) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn card_position(scene: &Scene) -> Option<glam::Vec3> {
    scene.band().chain().translation(scene.world(), ChainLink::Card)
}

fn log_cursor(scene: &mut Scene, step: &str) {
    if let Some(style) = scene.take_cursor_change() {
        log::info!("[{step}] cursor -> {}", style.as_css());
    }
}

fn run(variant: BandVariant) -> Result<()> {
    let config = SceneConfig::default().with_band(BandConfig::default().with_variant(variant));
    let mut scene = Scene::new(config)?;
    scene.resize(1280, 720);

    for _ in 0..180 {
        scene.tick(FRAME);
    }

    let card = card_position(&scene).ok_or_else(|| LanyardError::InvalidConfiguration("card missing".into()))?;
    let grab = scene.world_to_screen(card);
    log::info!("Settled card at {card:?}, on screen at {grab:?}");

    scene.pointer_move(grab.x, grab.y);
    log_cursor(&mut scene, "hover");

    if !scene.pointer_down(grab.x, grab.y, POINTER) {
        log::warn!("Pointer missed the card, nothing to drag");
        return Ok(());
    }
    log_cursor(&mut scene, "down");

    let radius = 150.0;
    for frame in 0..=120 {
        let angle = frame as f32 / 120.0 * std::f32::consts::TAU;
        let pointer = grab + Vec2::new(angle.cos() - 1.0, angle.sin()) * radius;
        scene.pointer_move(pointer.x, pointer.y);
        scene.tick(FRAME);

        if frame % 30 == 0 {
            if let Some(card) = card_position(&scene) {
                log::info!("drag frame {frame:3}: pointer={pointer:?} card={card:?}");
            }
        }
    }

    scene.pointer_up(POINTER);
    log_cursor(&mut scene, "up");

    for _ in 0..120 {
        scene.tick(FRAME);
    }
    if let Some(card) = card_position(&scene) {
        log::info!("Card after release: {card:?}");
    }

    scene.pointer_leave();
    log_cursor(&mut scene, "leave");
    if let Some(style) = scene.shutdown() {
        log::info!("[shutdown] cursor -> {}", style.as_css());
    }
    Ok(())
}
