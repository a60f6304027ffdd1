//! Headless runner
//!
//! Drives a full session without a browser: a virtual clock advances a fixed
//! step per frame, and an optional autopilot plays by pressing the same keys
//! a player would.

use std::time::Duration;

use serde::Serialize;

use crate::assets::{AssetTracker, REQUIRED_IMAGES};
use crate::audio::SilentAudio;
use crate::error::Result;
use crate::input::{Action, InputState};
use crate::renderer::{Frame, NullRenderer};
use crate::session::{Hud, LoopControl, Session};
use crate::settings::Settings;
use crate::sim::{EndOutcome, GameState, TickInput};
use crate::tuning::Tuning;

/// 60 Hz, the refresh rate the per-tick speeds were balanced for
pub const FRAME_STEP: Duration = Duration::from_nanos(16_666_667);

#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub seed: u64,
    /// Stop early after this many frames
    pub max_frames: Option<u64>,
    pub frame_step: Duration,
    pub autopilot: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_frames: None,
            frame_step: FRAME_STEP,
            autopilot: true,
        }
    }
}

/// Result of a headless run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub frames: u64,
    pub score: u32,
    /// None when the run was cut short by `max_frames`
    pub outcome: Option<EndOutcome>,
    pub final_message: Option<String>,
    pub frame: Frame,
}

/// HUD that keeps the latest values and logs the final message
#[derive(Debug, Default)]
pub struct LogHud {
    pub score: u32,
    pub remaining_secs: u64,
    pub final_message: Option<String>,
    pub loss_indicator: bool,
}

impl Hud for LogHud {
    fn show_score(&mut self, score: u32) {
        if score != self.score {
            log::debug!("Score: {score}");
        }
        self.score = score;
    }

    fn show_time(&mut self, remaining_secs: u64) {
        self.remaining_secs = remaining_secs;
    }

    fn show_final_message(&mut self, message: &str) {
        log::info!("{message}");
        self.final_message = Some(message.to_owned());
    }

    fn set_loss_indicator(&mut self, visible: bool) {
        self.loss_indicator = visible;
    }

    fn clear_final_message(&mut self) {
        self.final_message = None;
    }
}

/// Simple bot: line the sword up under the bear, sidestep falling lightning
#[derive(Debug, Default, Clone, Copy)]
pub struct Autopilot;

impl Autopilot {
    /// Lightning this close (horizontally) to the hit-zone is worth dodging
    const DODGE_MARGIN: f32 = 24.0;

    pub fn steer(&self, state: &GameState) -> TickInput {
        let zone = state.player.hit_zone(state.tuning.hit_zone_radius);

        if let Some(hazard) = &state.hazard {
            let b = hazard.bounds;
            let threatening = b.right() + Self::DODGE_MARGIN > zone.left()
                && b.left() - Self::DODGE_MARGIN < zone.right()
                && b.bottom() <= zone.top();
            if threatening {
                let go_left = b.center().x >= zone.center().x;
                let blocked = if go_left {
                    state.player.pos.x <= 0.0
                } else {
                    state.player.render_bounds().right() >= state.tuning.playfield_width
                };
                // Pinned against a wall: run the other way through it
                let go_left = go_left != blocked;
                return TickInput {
                    left: go_left,
                    right: !go_left,
                    attack: false,
                };
            }
        }

        let sword_x = state.weapon_mount().x + state.attack.bounds.size.x / 2.0;
        let target_x = state.target.bounds.center().x;
        let dx = target_x - sword_x;
        let aligned = dx.abs() < state.target.bounds.size.x / 4.0;

        TickInput {
            left: !aligned && dx < 0.0,
            right: !aligned && dx > 0.0,
            attack: aligned && !state.attack.active,
        }
    }
}

/// Press or release the first key bound to each action so that `wanted`
/// is what the session sees next frame
fn apply_keys<R, A, H>(session: &mut Session<R, A, H>, wanted: &TickInput)
where
    R: crate::renderer::Renderer,
    A: crate::audio::AudioPlayer,
    H: Hud,
{
    for (action, want) in [
        (Action::Left, wanted.left),
        (Action::Right, wanted.right),
        (Action::Attack, wanted.attack),
    ] {
        let Some(key) = session.input().bindings().keys_for(action).first().cloned() else {
            continue;
        };
        if want != session.input().is_held(action) {
            if want {
                session.key_down(&key);
            } else {
                session.key_up(&key);
            }
        }
    }
}

/// Play one session to completion (or `max_frames`)
pub fn run(tuning: Tuning, settings: &Settings, config: &HeadlessConfig) -> Result<RunReport> {
    tuning.validate()?;

    let mut now = Duration::ZERO;
    let mut session = Session::new(
        GameState::new(tuning, config.seed, now),
        InputState::new(settings.bindings.clone()),
        AssetTracker::preloaded(REQUIRED_IMAGES),
        NullRenderer,
        SilentAudio,
        LogHud::default(),
    );
    session.start(now)?;

    let autopilot = Autopilot;
    let mut frames = 0u64;
    loop {
        if config.max_frames.is_some_and(|max| frames >= max) {
            log::info!("Stopping after {frames} frames");
            break;
        }
        if config.autopilot {
            let wanted = autopilot.steer(session.state());
            apply_keys(&mut session, &wanted);
        }

        now += config.frame_step;
        frames += 1;
        if session.frame(now) == LoopControl::Stop {
            break;
        }
    }

    let state = session.state();
    Ok(RunReport {
        seed: config.seed,
        frames,
        score: state.score,
        outcome: state.outcome(),
        final_message: session.hud().final_message.clone(),
        frame: Frame::capture(state),
    })
}
