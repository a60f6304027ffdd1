//! Session controller
//!
//! Owns the game state and every collaborator, and wraps the tick in the
//! start / reset / end lifecycle. The host drives it by calling `frame`
//! from its frame callback and stops rescheduling once it returns
//! `LoopControl::Stop`.

use std::time::Duration;

use crate::assets::{AssetTracker, Readiness};
use crate::audio::{AudioPlayer, SoundEffect};
use crate::error::Result;
use crate::input::InputState;
use crate::renderer::{Frame, Renderer};
use crate::sim::{EndOutcome, GameEvent, GameState, tick};

/// Whether the host should request another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Display fields around the playfield
pub trait Hud {
    fn show_score(&mut self, score: u32);
    fn show_time(&mut self, remaining_secs: u64);
    fn show_final_message(&mut self, message: &str);
    fn set_loss_indicator(&mut self, visible: bool);
    fn clear_final_message(&mut self);
}

/// Text shown when a session ends
pub fn final_message(score: u32, outcome: EndOutcome) -> String {
    match outcome {
        EndOutcome::TimeExpired => format!("Time's up! Final Score: {score}"),
        EndOutcome::HazardHit => format!("Struck by lightning! Final Score: {score}"),
    }
}

pub struct Session<R, A, H> {
    state: GameState,
    input: InputState,
    assets: AssetTracker,
    renderer: R,
    audio: A,
    hud: H,
    /// Frames are being scheduled
    started: bool,
    /// Set by the first `end`
    final_score: Option<u32>,
}

impl<R: Renderer, A: AudioPlayer, H: Hud> Session<R, A, H> {
    pub fn new(
        state: GameState,
        input: InputState,
        assets: AssetTracker,
        renderer: R,
        audio: A,
        hud: H,
    ) -> Self {
        Self {
            state,
            input,
            assets,
            renderer,
            audio,
            hud,
            started: false,
            final_score: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Score recorded when the session ended
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    pub fn release_keys(&mut self) {
        self.input.release_all();
    }

    /// Report a loaded asset. Starts the session when this was the last one;
    /// returns whether it did.
    pub fn asset_loaded(&mut self, id: &str, now: Duration) -> Result<bool> {
        match self.assets.mark_loaded(id)? {
            Readiness::Ready if !self.started && self.final_score.is_none() => {
                self.start(now)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Report a failed asset; returns the readiness after this report.
    /// Once any asset has failed the session will not start.
    pub fn asset_failed(&mut self, id: &str, reason: &str) -> Result<Readiness> {
        self.assets.mark_failed(id, reason)
    }

    /// Begin scheduling frames. Requires every asset to be loaded.
    pub fn start(&mut self, now: Duration) -> Result<()> {
        if self.started {
            log::debug!("start() ignored: session already running");
            return Ok(());
        }
        if !self.state.is_running() {
            log::debug!("start() ignored: session has ended, reset first");
            return Ok(());
        }
        if let Err(e) = self.assets.ensure_ready() {
            log::error!("Cannot start session: {e}");
            return Err(e);
        }

        // The countdown starts with the first frame, not when the state was built
        if self.state.time_ticks == 0 {
            self.state.clock.reset(now);
        }
        self.started = true;
        self.audio.play_background_loop();
        self.hud.show_score(self.state.score);
        self.hud.show_time(self.state.clock.remaining_secs(now));
        log::info!("Session started (seed {})", self.state.seed);
        Ok(())
    }

    /// Put everything back to its start-of-session values and start again
    pub fn reset(&mut self, now: Duration) -> Result<()> {
        self.state.reset(now);
        self.input.release_all();
        self.started = false;
        self.final_score = None;
        self.hud.clear_final_message();
        self.hud.set_loss_indicator(false);
        log::info!("Session reset");
        self.start(now)
    }

    /// Stop the session. Only the first call has any effect.
    pub fn end(&mut self, outcome: EndOutcome) {
        if self.final_score.is_some() {
            return;
        }
        self.state.finish(outcome);
        // A tick may already have ended it for a different reason
        let outcome = self.state.outcome().unwrap_or(outcome);
        let score = self.state.score;

        self.final_score = Some(score);
        self.started = false;
        self.audio.pause_background_loop();
        self.audio.stop_all_effects();
        self.hud.show_final_message(&final_message(score, outcome));
        if outcome.is_loss() {
            self.hud.set_loss_indicator(true);
        }
        log::info!("Final score: {score}");
    }

    /// One scheduler step: tick, side effects, draw
    pub fn frame(&mut self, now: Duration) -> LoopControl {
        if !self.started {
            return LoopControl::Stop;
        }

        let input = self.input.snapshot();
        tick(&mut self.state, &input, now);

        let mut ended = None;
        for event in self.state.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }
            if let GameEvent::Ended(outcome) = event {
                ended = Some(outcome);
            }
        }

        self.renderer.draw(&Frame::capture(&self.state));
        self.hud.show_score(self.state.score);
        self.hud.show_time(self.state.clock.remaining_secs(now));

        if let Some(outcome) = ended {
            self.end(outcome);
        }

        if self.started {
            LoopControl::Continue
        } else {
            LoopControl::Stop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::REQUIRED_IMAGES;
    use crate::error::GameError;
    use crate::sim::{GamePhase, Hazard, Rect};
    use crate::tuning::Tuning;

    #[derive(Debug, Default)]
    struct RecordingAudio {
        calls: Vec<String>,
    }

    impl RecordingAudio {
        fn count(&self, call: &str) -> usize {
            self.calls.iter().filter(|c| *c == call).count()
        }
    }

    impl AudioPlayer for RecordingAudio {
        fn play_hit_sound(&mut self) {
            self.calls.push("hit".into());
        }
        fn play_flavor_line(&mut self, index: usize) {
            self.calls.push(format!("line{index}"));
        }
        fn play_background_loop(&mut self) {
            self.calls.push("music".into());
        }
        fn pause_background_loop(&mut self) {
            self.calls.push("pause".into());
        }
        fn stop_all_effects(&mut self) {
            self.calls.push("stop".into());
        }
    }

    #[derive(Debug, Default)]
    struct RecordingHud {
        score: u32,
        time: u64,
        messages: Vec<String>,
        loss: bool,
    }

    impl Hud for RecordingHud {
        fn show_score(&mut self, score: u32) {
            self.score = score;
        }
        fn show_time(&mut self, remaining_secs: u64) {
            self.time = remaining_secs;
        }
        fn show_final_message(&mut self, message: &str) {
            self.messages.push(message.to_owned());
        }
        fn set_loss_indicator(&mut self, visible: bool) {
            self.loss = visible;
        }
        fn clear_final_message(&mut self) {
            self.messages.clear();
        }
    }

    #[derive(Debug, Default)]
    struct CountingRenderer {
        frames: usize,
    }

    impl Renderer for CountingRenderer {
        fn draw(&mut self, _frame: &Frame) {
            self.frames += 1;
        }
    }

    type TestSession = Session<CountingRenderer, RecordingAudio, RecordingHud>;

    fn session_with(assets: AssetTracker) -> TestSession {
        let tuning = Tuning {
            flavor_probability: 0.0,
            ..Tuning::default()
        };
        Session::new(
            GameState::new(tuning, 42, Duration::ZERO),
            InputState::default(),
            assets,
            CountingRenderer::default(),
            RecordingAudio::default(),
            RecordingHud::default(),
        )
    }

    fn started() -> TestSession {
        let mut session = session_with(AssetTracker::preloaded(REQUIRED_IMAGES));
        session.start(Duration::ZERO).unwrap();
        session
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_start_waits_for_assets() {
        let mut session = session_with(AssetTracker::for_game());
        assert!(matches!(
            session.start(Duration::ZERO),
            Err(GameError::AssetsPending { remaining: 5 })
        ));
        assert!(!session.is_started());
        assert_eq!(session.frame(ms(16)), LoopControl::Stop);
        assert_eq!(session.state().time_ticks, 0);

        let (last, rest) = REQUIRED_IMAGES.split_last().unwrap();
        for id in rest {
            assert!(!session.asset_loaded(id, ms(5)).unwrap());
        }
        assert!(session.asset_loaded(last, ms(1000)).unwrap());
        assert!(session.is_started());
        assert_eq!(session.audio.count("music"), 1);
        // Clock starts when the session does
        assert_eq!(
            session.state().clock.remaining(ms(1000)),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn test_asset_failure_prevents_start() {
        let mut session = session_with(AssetTracker::for_game());
        assert_eq!(
            session.asset_failed("lightning", "decode error").unwrap(),
            Readiness::Failed {
                asset: "lightning".into(),
                reason: "decode error".into(),
            }
        );
        assert!(matches!(
            session.asset_failed("dragon", "missing"),
            Err(GameError::UnknownAsset(_))
        ));
        for id in REQUIRED_IMAGES {
            assert!(!session.asset_loaded(id, ms(5)).unwrap());
        }
        assert!(!session.is_started());
        assert!(matches!(
            session.start(ms(5)),
            Err(GameError::AssetLoad { .. })
        ));
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut session = started();
        session.frame(ms(16));
        session.start(ms(32)).unwrap();
        assert_eq!(session.audio.count("music"), 1);
        assert_eq!(session.state().time_ticks, 1);
    }

    #[test]
    fn test_keys_drive_the_hero() {
        let mut session = started();
        assert!(session.key_down("ArrowLeft"));
        for n in 1..=10 {
            assert_eq!(session.frame(ms(16 * n)), LoopControl::Continue);
        }
        assert_eq!(session.state().player.pos.x, 300.0);
        session.key_up("ArrowLeft");
        session.frame(ms(176));
        assert_eq!(session.state().player.pos.x, 300.0);
        assert_eq!(session.renderer.frames, 11);
    }

    #[test]
    fn test_hit_plays_sound_and_updates_hud() {
        let mut session = started();
        let mount = session.state.weapon_mount();
        session.state.target.bounds.pos = mount - glam::Vec2::new(30.0, 50.0);
        session.key_down(" ");
        session.frame(ms(16));

        assert_eq!(session.state().score, 1);
        assert_eq!(session.hud.score, 1);
        assert_eq!(session.audio.count("hit"), 1);
        // First throw restarts the music
        assert_eq!(session.audio.count("music"), 2);
    }

    #[test]
    fn test_time_up_reports_final_score() {
        let mut session = started();
        session.state.score = 7;

        assert_eq!(session.frame(Duration::from_secs(300)), LoopControl::Stop);

        assert_eq!(
            session.state().phase,
            GamePhase::Ended(EndOutcome::TimeExpired)
        );
        assert_eq!(session.final_score(), Some(7));
        assert_eq!(session.hud.messages, vec!["Time's up! Final Score: 7"]);
        assert!(!session.hud.loss);
        assert_eq!(session.hud.time, 0);
        assert_eq!(session.audio.count("pause"), 1);
        assert_eq!(session.audio.count("stop"), 1);
    }

    #[test]
    fn test_lightning_strike_shows_loss() {
        let mut session = started();
        let center = session.state.player.render_bounds().center();
        session.state.hazard = Some(Hazard {
            bounds: Rect::new(center.x - 16.0, center.y - 32.0, 32.0, 64.0),
            speed: 0.5,
        });

        assert_eq!(session.frame(ms(16)), LoopControl::Stop);
        assert_eq!(session.state().outcome(), Some(EndOutcome::HazardHit));
        assert!(session.hud.loss);
        assert_eq!(session.hud.messages.len(), 1);
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut session = started();
        session.end(EndOutcome::TimeExpired);
        session.end(EndOutcome::HazardHit);
        assert_eq!(session.hud.messages.len(), 1);
        assert_eq!(session.audio.count("pause"), 1);
        assert!(!session.hud.loss);
        assert_eq!(session.state().outcome(), Some(EndOutcome::TimeExpired));
    }

    #[test]
    fn test_ended_session_ignores_frames_and_start() {
        let mut session = started();
        session.end(EndOutcome::HazardHit);
        let frames = session.renderer.frames;
        session.key_down("ArrowRight");
        for n in 1..=20 {
            assert_eq!(session.frame(ms(16 * n)), LoopControl::Stop);
        }
        session.start(ms(400)).unwrap();
        assert!(!session.is_started());
        assert_eq!(session.renderer.frames, frames);
        assert_eq!(session.state().player.pos.x, 350.0);
    }

    #[test]
    fn test_reset_after_end() {
        let mut session = started();
        session.key_down("ArrowRight");
        for n in 1..=5 {
            session.frame(ms(16 * n));
        }
        session.state.score = 4;
        session.end(EndOutcome::HazardHit);

        session.reset(Duration::from_secs(50)).unwrap();

        assert!(session.is_started());
        assert_eq!(session.state().phase, GamePhase::Running);
        assert_eq!(session.state().score, 0);
        assert_eq!(session.state().player.pos.x, 350.0);
        assert_eq!(
            session.state().clock.remaining(Duration::from_secs(50)),
            Duration::from_secs(300)
        );
        assert_eq!(session.final_score(), None);
        assert!(session.hud.messages.is_empty());
        assert!(!session.hud.loss);
        // Keys held before the reset are forgotten
        assert!(!session.input().snapshot().right);
        assert_eq!(session.frame(Duration::from_secs(51)), LoopControl::Continue);
    }
}
