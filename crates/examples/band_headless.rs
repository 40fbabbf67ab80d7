//! Headless run of the lanyard scene.
//!
//! Usage: band_headless [scene.json]
//!
//! Drops the band from its mount pose and logs the chain once per simulated
//! second until it comes to rest.

use lanyard::band::ChainLink;
use lanyard::prelude::*;

const FRAME: f32 = 1.0 / 60.0;
const SECONDS: usize = 8;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    let mut scene = Scene::new(config)?;

    for second in 1..=SECONDS {
        for _ in 0..60 {
            scene.tick(FRAME);
        }

        let band = scene.band();
        let link = |l| band.chain().translation(scene.world(), l).unwrap_or_default();
        let card = link(ChainLink::Card);
        let speed = band
            .chain()
            .body(scene.world(), ChainLink::Card)
            .and_then(|id| scene.world().linvel(id))
            .map(|v| v.length())
            .unwrap_or_default();

        log::info!(
            "t={second}s  card=({:+.3}, {:+.3}, {:+.3})  |v|={speed:.4}  j3=({:+.3}, {:+.3})",
            card.x,
            card.y,
            card.z,
            link(ChainLink::Joint3).x,
            link(ChainLink::Joint3).y,
        );
    }

    let band = scene.band();
    let samples = band.samples();
    let length: f32 = samples.windows(2).map(|w| w[0].distance(w[1])).sum();
    log::info!(
        "Ribbon: {} points, {} vertices, {} indices, arc length {length:.3}",
        samples.len(),
        band.ribbon().vertices().len(),
        band.ribbon().indices().len(),
    );

    let frame = scene.frame_data();
    if let Some(card) = frame.card {
        log::info!("Card on screen: {:?}", card.map(|c| (c.x.round(), c.y.round())));
    }

    scene.shutdown();
    Ok(())
}
