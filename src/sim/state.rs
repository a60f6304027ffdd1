//! Game state and core simulation types
//!
//! `GameState` is the whole session aggregate: every entity, the score, the
//! clock and the seeded RNG. Nothing lives in globals; `tick` receives it
//! explicitly.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SessionClock;
use super::collision::hit_zone;
use super::rect::Rect;
use crate::tuning::Tuning;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndOutcome {
    /// Survived until the clock ran out
    TimeExpired,
    /// Struck by lightning
    HazardHit,
}

impl EndOutcome {
    pub fn is_loss(&self) -> bool {
        matches!(self, EndOutcome::HazardHit)
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// Terminal until an explicit reset
    Ended(EndOutcome),
}

/// Discrete things that happened during a tick, drained by the session to
/// drive audio and HUD side effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    AttackLaunched,
    /// First sword of the session; (re)start the music
    FirstAttack,
    HazardSpawned,
    TargetHit { score: u32 },
    AttackMissed,
    HazardCleared,
    FlavorLine(usize),
    Ended(EndOutcome),
}

/// The hero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Logical size; the sprite is drawn at `size * render_scale`
    pub size: Vec2,
    pub speed: f32,
    pub render_scale: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.player_start(),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            speed: tuning.player_speed,
            render_scale: tuning.player_render_scale,
        }
    }

    pub fn render_size(&self) -> Vec2 {
        self.size * self.render_scale
    }

    /// Bounds as drawn on screen
    pub fn render_bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.render_size())
    }

    /// The only part of the hero the lightning can hit
    pub fn hit_zone(&self, radius: f32) -> Rect {
        hit_zone(&self.render_bounds(), radius)
    }

    /// Where the sword sits before it is thrown
    pub fn weapon_mount(&self, attack_size: Vec2) -> Vec2 {
        Vec2::new(
            self.pos.x + self.render_size().x / 2.0 - attack_size.x / 2.0,
            self.pos.y,
        )
    }

    /// Move horizontally by `direction * speed`, then clamp into the playfield
    pub fn step(&mut self, direction: f32, playfield: &Rect) {
        self.pos.x += direction * self.speed;
        self.clamp_to(playfield);
    }

    pub fn clamp_to(&mut self, playfield: &Rect) {
        let render = self.render_size();
        let max = Vec2::new(playfield.right() - render.x, playfield.bottom() - render.y)
            .max(playfield.pos);
        self.pos = self.pos.clamp(playfield.pos, max);
    }
}

/// The bear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub bounds: Rect,
}

impl Target {
    pub fn new(tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let mut target = Self {
            bounds: Rect::new(0.0, tuning.target_y, tuning.target_width, tuning.target_height),
        };
        target.reposition(tuning.playfield_width, rng);
        target
    }

    /// Jump to a random column in `[0, playfield_width - width]`
    pub fn reposition(&mut self, playfield_width: f32, rng: &mut impl Rng) {
        let span = (playfield_width - self.bounds.size.x).max(0.0);
        self.bounds.pos.x = rng.random::<f32>() * span;
    }
}

/// The sword. A single instance exists for the whole session; `active`
/// says whether it is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub bounds: Rect,
    pub speed: f32,
    pub active: bool,
}

impl Attack {
    pub fn new(tuning: &Tuning, mount: Vec2) -> Self {
        Self {
            bounds: Rect::from_pos_size(
                mount,
                Vec2::new(tuning.attack_width, tuning.attack_height),
            ),
            speed: tuning.attack_speed,
            active: false,
        }
    }

    /// Throw from `mount`. Returns false if a sword is already in flight.
    pub fn launch(&mut self, mount: Vec2) -> bool {
        if self.active {
            return false;
        }
        self.bounds.pos = mount;
        self.active = true;
        true
    }

    pub fn advance(&mut self) {
        self.bounds.translate(Vec2::new(0.0, -self.speed));
    }

    /// Return to the hero's hand
    pub fn stow(&mut self, mount: Vec2) {
        self.active = false;
        self.bounds.pos = mount;
    }
}

/// A lightning bolt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub bounds: Rect,
    pub speed: f32,
}

impl Hazard {
    pub fn advance(&mut self) {
        self.bounds.translate(Vec2::new(0.0, self.speed));
    }
}

/// Complete session state (deterministic for a given seed, inputs and
/// timestamps)
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    /// Ticks processed while running
    pub time_ticks: u64,
    pub clock: SessionClock,
    pub player: Player,
    pub target: Target,
    pub attack: Attack,
    pub hazard: Option<Hazard>,
    /// Whether a sword has been thrown this session
    pub first_attack_thrown: bool,
    /// Shown after a lightning strike
    pub loss_indicator: bool,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new running session with the given seed, clock starting at `now`
    pub fn new(tuning: Tuning, seed: u64, now: Duration) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Player::new(&tuning);
        let target = Target::new(&tuning, &mut rng);
        let attack = Attack::new(
            &tuning,
            player.weapon_mount(Vec2::new(tuning.attack_width, tuning.attack_height)),
        );
        let clock = SessionClock::new(tuning.session_duration(), now);

        Self {
            tuning,
            seed,
            rng,
            phase: GamePhase::Running,
            score: 0,
            time_ticks: 0,
            clock,
            player,
            target,
            attack,
            hazard: None,
            first_attack_thrown: false,
            loss_indicator: false,
            events: Vec::new(),
        }
    }

    /// Put every entity, the score and the clock back to their
    /// start-of-session values. The RNG keeps its stream so the bear does
    /// not reappear where it started last time.
    pub fn reset(&mut self, now: Duration) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.time_ticks = 0;
        self.clock.reset(now);
        self.player = Player::new(&self.tuning);
        self.target = Target::new(&self.tuning, &mut self.rng);
        let mount = self.weapon_mount();
        self.attack = Attack::new(&self.tuning, mount);
        self.hazard = None;
        self.first_attack_thrown = false;
        self.loss_indicator = false;
        self.events.clear();
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn outcome(&self) -> Option<EndOutcome> {
        match self.phase {
            GamePhase::Running => None,
            GamePhase::Ended(outcome) => Some(outcome),
        }
    }

    /// Current sword mount on the hero
    pub fn weapon_mount(&self) -> Vec2 {
        self.player.weapon_mount(self.attack_size())
    }

    fn attack_size(&self) -> Vec2 {
        Vec2::new(self.tuning.attack_width, self.tuning.attack_height)
    }

    /// Enter the terminal phase. Only the first call has any effect.
    pub fn finish(&mut self, outcome: EndOutcome) {
        if !self.is_running() {
            return;
        }
        self.phase = GamePhase::Ended(outcome);
        if outcome.is_loss() {
            self.loss_indicator = true;
        }
        self.events.push(GameEvent::Ended(outcome));
        log::info!("Session ended ({:?}) with score {}", outcome, self.score);
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of swords and bolts currently in play
    pub fn live_projectiles(&self) -> (usize, usize) {
        (usize::from(self.attack.active), usize::from(self.hazard.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(Tuning::default(), 7, Duration::ZERO);
        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.player.pos, Vec2::new(350.0, 400.0));
        assert!(!state.attack.active);
        assert!(state.hazard.is_none());
        assert!(state.target.bounds.left() >= 0.0 && state.target.bounds.right() <= 800.0);
        assert_eq!(state.clock.remaining(Duration::ZERO), Duration::from_secs(300));
    }

    #[test]
    fn test_weapon_mount_centered_on_rendered_hero() {
        let state = GameState::new(Tuning::default(), 7, Duration::ZERO);
        // 350 + 200/2 - 40/2
        assert_eq!(state.weapon_mount(), Vec2::new(430.0, 400.0));
        assert_eq!(state.attack.bounds.pos, state.weapon_mount());
    }

    #[test]
    fn test_player_clamps_to_rendered_width() {
        let tuning = Tuning::default();
        let field = tuning.playfield();
        let mut player = Player::new(&tuning);
        for _ in 0..500 {
            player.step(1.0, &field);
        }
        assert_eq!(player.pos.x, 600.0);
        for _ in 0..500 {
            player.step(-1.0, &field);
        }
        assert_eq!(player.pos.x, 0.0);
    }

    #[test]
    fn test_attack_rejects_second_launch() {
        let tuning = Tuning::default();
        let mut attack = Attack::new(&tuning, Vec2::new(10.0, 10.0));
        assert!(attack.launch(Vec2::new(10.0, 10.0)));
        attack.advance();
        assert!(!attack.launch(Vec2::new(50.0, 50.0)));
        assert_eq!(attack.bounds.pos, Vec2::new(10.0, 8.0));
        attack.stow(Vec2::new(50.0, 50.0));
        assert!(!attack.active);
        assert_eq!(attack.bounds.pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_finish_is_sticky() {
        let mut state = GameState::new(Tuning::default(), 7, Duration::ZERO);
        state.finish(EndOutcome::TimeExpired);
        state.finish(EndOutcome::HazardHit);
        assert_eq!(state.outcome(), Some(EndOutcome::TimeExpired));
        assert!(!state.loss_indicator);
        assert_eq!(state.drain_events(), vec![GameEvent::Ended(EndOutcome::TimeExpired)]);
    }

    #[test]
    fn test_reset_restores_start_values() {
        let mut state = GameState::new(Tuning::default(), 7, Duration::ZERO);
        state.score = 9;
        state.player.pos.x = 12.0;
        state.hazard = Some(Hazard {
            bounds: Rect::new(0.0, 0.0, 32.0, 64.0),
            speed: 1.0,
        });
        state.finish(EndOutcome::HazardHit);

        state.reset(Duration::from_secs(400));
        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.player.pos, Vec2::new(350.0, 400.0));
        assert!(state.hazard.is_none());
        assert!(!state.loss_indicator);
        assert!(state.events().is_empty());
        assert_eq!(
            state.clock.remaining(Duration::from_secs(400)),
            Duration::from_secs(300)
        );
    }
}
