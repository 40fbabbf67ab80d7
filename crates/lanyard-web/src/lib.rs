//! Browser front-end for the lanyard scene.
//!
//! On wasm32 the `start` entry point builds a full-window canvas, a small
//! control panel and a `requestAnimationFrame` loop around
//! [`lanyard::band::Scene`]. Drawing goes through [`paint::Surface`], which
//! keeps the painting logic testable on native targets.

pub mod assets;
pub mod paint;

#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(target_arch = "wasm32")]
pub use app::start;

/// Route `log` output to the browser console (wasm32) or stderr (native).
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
    }
}
