//! Storm Sword - a single-screen arcade game
//!
//! The hero throws a sword at a roaming bear while dodging lightning that
//! falls faster the higher the score gets.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, tick)
//! - `input`: Raw key events to held logical actions
//! - `session`: Start/reset/end lifecycle around the frame loop
//! - `assets`: Readiness gate for the required sprites
//! - `audio` / `renderer`: Collaborator traits plus browser backends
//! - `platform`: Browser host and headless native runner
//! - `tuning` / `settings`: Data-driven game balance and player preferences

pub mod assets;
pub mod audio;
pub mod error;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{GameError, Result};
pub use session::{Hud, LoopControl, Session};
pub use settings::Settings;
pub use tuning::Tuning;

/// Default game balance, mirrored by `Tuning::default()`
pub mod consts {
    /// Playfield (canvas) dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Hero defaults. The sprite is drawn at `PLAYER_RENDER_SCALE` times its
    /// logical size and every bound (clamping, hit-zone, weapon mount) uses
    /// the rendered size.
    pub const PLAYER_WIDTH: f32 = 100.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_RENDER_SCALE: f32 = 2.0;

    /// Bear defaults
    pub const TARGET_WIDTH: f32 = 100.0;
    pub const TARGET_HEIGHT: f32 = 100.0;
    pub const TARGET_Y: f32 = 50.0;

    /// Sword defaults (pixels per tick)
    pub const ATTACK_WIDTH: f32 = 40.0;
    pub const ATTACK_HEIGHT: f32 = 100.0;
    pub const ATTACK_SPEED: f32 = 2.0;

    /// Lightning defaults
    pub const HAZARD_WIDTH: f32 = 32.0;
    pub const HAZARD_HEIGHT: f32 = 64.0;
    pub const HAZARD_BASE_SPEED: f32 = 1.0;
    /// Extra speed per point of score
    pub const HAZARD_SPEED_SCALE: f32 = 0.5;
    /// Applied on top of the scaled speed so bolts stay dodgeable
    pub const HAZARD_SPEED_DAMPING: f32 = 0.2;

    /// Half-extent of the square hit-zone centred on the hero
    pub const HIT_ZONE_RADIUS: f32 = 10.0;

    /// Session length (5 minutes)
    pub const SESSION_SECS: u64 = 300;

    /// Per-tick chance of a random hero voice line
    pub const FLAVOR_PROBABILITY: f64 = 0.002;
    pub const FLAVOR_LINE_COUNT: usize = 4;
}
