//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only through the `now` passed to `tick`
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::SessionClock;
pub use collision::{hit_zone, overlaps};
pub use rect::Rect;
pub use spawn::SpawnPolicy;
pub use state::{Attack, EndOutcome, GameEvent, GamePhase, GameState, Hazard, Player, Target};
pub use tick::{TickInput, tick};
