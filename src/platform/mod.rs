//! Platform hosts
//!
//! - `web`: browser host (canvas, DOM HUD, `<audio>`, keyboard, animation frames)
//! - `headless`: native runner with a virtual clock and an autopilot, used
//!   for balance checks and replaying seeds

pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod web;
