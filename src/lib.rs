//! Simon Says core crate.
//!
//! The computer plays a growing sequence of pad flashes and sounds; the player
//! repeats it back. Game rules live in plain Rust modules (`game`, `level`,
//! `input`, `animation`) that run and test natively. Only `dom` talks to the
//! browser, and `start_game()` is the entrypoint the page calls.

use wasm_bindgen::prelude::*;

pub mod animation;
pub mod config;
mod dom;
pub mod game;
pub mod input;
pub mod level;
pub mod pad;

pub use config::{GameConfig, Timing};
pub use game::{ColorSource, Effect, GameSession, InputEvent, Outcome, Phase, RandomColors};
pub use level::{LevelError, SkillLevel, rounds_for_level};
pub use pad::{PADS, Pad, PadColor};

#[cfg(feature = "serde_json")]
pub use dom::session_snapshot;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Only the first call installs a logger.
    #[cfg(target_arch = "wasm32")]
    console_log::init_with_level(log::Level::Info).ok();
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    dom::mount()
}
