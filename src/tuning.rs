//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a JSON file can rebalance
//! the game without a rebuild. Missing fields fall back to `consts`.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};
use crate::sim::Rect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield_width: f32,
    pub playfield_height: f32,

    pub player_width: f32,
    pub player_height: f32,
    /// Horizontal pixels per tick while a direction is held
    pub player_speed: f32,
    pub player_render_scale: f32,

    pub target_width: f32,
    pub target_height: f32,
    pub target_y: f32,

    pub attack_width: f32,
    pub attack_height: f32,
    pub attack_speed: f32,

    pub hazard_width: f32,
    pub hazard_height: f32,
    pub hazard_base_speed: f32,
    pub hazard_speed_scale: f32,
    pub hazard_speed_damping: f32,

    pub hit_zone_radius: f32,

    pub session_secs: u64,

    pub flavor_probability: f64,
    pub flavor_line_count: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            player_render_scale: PLAYER_RENDER_SCALE,

            target_width: TARGET_WIDTH,
            target_height: TARGET_HEIGHT,
            target_y: TARGET_Y,

            attack_width: ATTACK_WIDTH,
            attack_height: ATTACK_HEIGHT,
            attack_speed: ATTACK_SPEED,

            hazard_width: HAZARD_WIDTH,
            hazard_height: HAZARD_HEIGHT,
            hazard_base_speed: HAZARD_BASE_SPEED,
            hazard_speed_scale: HAZARD_SPEED_SCALE,
            hazard_speed_damping: HAZARD_SPEED_DAMPING,

            hit_zone_radius: HIT_ZONE_RADIUS,

            session_secs: SESSION_SECS,

            flavor_probability: FLAVOR_PROBABILITY,
            flavor_line_count: FLAVOR_LINE_COUNT,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot honour
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_render_scale", self.player_render_scale),
            ("target_width", self.target_width),
            ("target_height", self.target_height),
            ("attack_width", self.attack_width),
            ("attack_height", self.attack_height),
            ("attack_speed", self.attack_speed),
            ("hazard_width", self.hazard_width),
            ("hazard_height", self.hazard_height),
            ("hit_zone_radius", self.hit_zone_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidTuning(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let render = self.player_render_size();
        if render.x > self.playfield_width || render.y > self.playfield_height {
            return Err(GameError::InvalidTuning(format!(
                "rendered player {}x{} does not fit the {}x{} playfield",
                render.x, render.y, self.playfield_width, self.playfield_height
            )));
        }
        if self.target_width > self.playfield_width || self.hazard_width > self.playfield_width {
            return Err(GameError::InvalidTuning(
                "target and hazard must be narrower than the playfield".into(),
            ));
        }
        let speeds = [
            ("player_speed", self.player_speed),
            ("hazard_base_speed", self.hazard_base_speed),
            ("hazard_speed_scale", self.hazard_speed_scale),
            ("hazard_speed_damping", self.hazard_speed_damping),
        ];
        for (name, value) in speeds {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GameError::InvalidTuning(format!(
                    "{name} cannot be negative, got {value}"
                )));
            }
        }
        let max_target_y = self.playfield_height - self.target_height;
        if !(0.0..=max_target_y).contains(&self.target_y) {
            return Err(GameError::InvalidTuning(format!(
                "target_y must be within [0, {max_target_y}], got {}",
                self.target_y
            )));
        }
        if !(0.0..=1.0).contains(&self.flavor_probability) {
            return Err(GameError::InvalidTuning(format!(
                "flavor_probability must be within [0, 1], got {}",
                self.flavor_probability
            )));
        }
        if self.flavor_line_count == 0 {
            return Err(GameError::InvalidTuning(
                "flavor_line_count must be at least 1".into(),
            ));
        }
        if self.session_secs == 0 {
            return Err(GameError::InvalidTuning("session_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn playfield(&self) -> Rect {
        Rect::new(0.0, 0.0, self.playfield_width, self.playfield_height)
    }

    pub fn session_duration(&self) -> Duration {
        Duration::from_secs(self.session_secs)
    }

    /// Size the hero sprite is drawn at
    pub fn player_render_size(&self) -> Vec2 {
        Vec2::new(self.player_width, self.player_height) * self.player_render_scale
    }

    /// Hero spawn point: horizontally centred on its logical width, resting
    /// on the bottom edge with its rendered height
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(
            self.playfield_width / 2.0 - self.player_width / 2.0,
            self.playfield_height - self.player_render_size().y,
        )
    }
}
