//! Lightning spawn policy
//!
//! A bolt is called down exactly when a sword leaves the hero's hand, aimed
//! at where the hero was standing when they threw it. Only one bolt is ever
//! in the sky: a throw while a bolt is still falling replaces it.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use super::state::Hazard;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPolicy {
    base_speed: f32,
    speed_scale: f32,
    damping: f32,
    hazard_size: Vec2,
    playfield_width: f32,
}

impl SpawnPolicy {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            base_speed: tuning.hazard_base_speed,
            speed_scale: tuning.hazard_speed_scale,
            damping: tuning.hazard_speed_damping,
            hazard_size: Vec2::new(tuning.hazard_width, tuning.hazard_height),
            playfield_width: tuning.playfield_width,
        }
    }

    /// `attack_launched` is true only on the tick the sword goes from
    /// inactive to active. A bolt already falling does not block the spawn;
    /// the new one takes its place.
    pub fn should_spawn(&self, attack_launched: bool) -> bool {
        attack_launched
    }

    /// Fall speed in pixels per tick: linear in score
    pub fn hazard_speed(&self, score: u32) -> f32 {
        (self.base_speed + score as f32 * self.speed_scale) * self.damping
    }

    /// Create a bolt at the top of the playfield, somewhere within the band
    /// `[anchor_x, anchor_x + band_width - hazard_width]`, clamped so it is
    /// fully on screen
    pub fn spawn(&self, score: u32, anchor_x: f32, band_width: f32, rng: &mut impl Rng) -> Hazard {
        let spread = (band_width - self.hazard_size.x).max(0.0);
        let x = anchor_x + rng.random::<f32>() * spread;
        let max_x = (self.playfield_width - self.hazard_size.x).max(0.0);

        Hazard {
            bounds: Rect::from_pos_size(Vec2::new(x.clamp(0.0, max_x), 0.0), self.hazard_size),
            speed: self.hazard_speed(score),
        }
    }
}
