//! Per-frame simulation tick
//!
//! Core game loop step. Runs once per rendered frame; speeds are in pixels
//! per tick, so the game runs at the host's refresh rate like the arcade
//! original did.

use std::time::Duration;

use rand::Rng;

use super::collision::{exited_bottom, exited_top, overlaps};
use super::spawn::SpawnPolicy;
use super::state::{EndOutcome, GameEvent, GameState};

/// Held actions for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub attack: bool,
}

impl TickInput {
    /// -1 left, +1 right, 0 when neither or both are held
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the game state by one tick at wall-clock time `now`
pub fn tick(state: &mut GameState, input: &TickInput, now: Duration) {
    // Ended is terminal until reset
    if !state.is_running() {
        return;
    }

    if state.clock.is_expired(now) {
        state.finish(EndOutcome::TimeExpired);
        return;
    }

    state.time_ticks += 1;
    let playfield = state.tuning.playfield();

    // Hero movement
    state.player.step(input.horizontal(), &playfield);

    // Throw the sword
    if input.attack {
        let mount = state.weapon_mount();
        if state.attack.launch(mount) {
            state.events.push(GameEvent::AttackLaunched);
            if !state.first_attack_thrown {
                state.first_attack_thrown = true;
                state.events.push(GameEvent::FirstAttack);
            }

            let policy = SpawnPolicy::from_tuning(&state.tuning);
            if policy.should_spawn(true) {
                if state.hazard.is_some() {
                    log::trace!("Falling bolt replaced by a new one");
                }
                let hazard = policy.spawn(
                    state.score,
                    state.player.pos.x,
                    state.player.render_size().x,
                    &mut state.rng,
                );
                state.hazard = Some(hazard);
                state.events.push(GameEvent::HazardSpawned);
            }
        }
    }

    // Sword flight
    if state.attack.active {
        state.attack.advance();

        if overlaps(&state.attack.bounds, &state.target.bounds) {
            state.score += 1;
            let mount = state.weapon_mount();
            state.attack.stow(mount);
            state
                .target
                .reposition(playfield.size.x, &mut state.rng);
            state.events.push(GameEvent::TargetHit { score: state.score });
        } else if exited_top(&state.attack.bounds) {
            let mount = state.weapon_mount();
            state.attack.stow(mount);
            state.events.push(GameEvent::AttackMissed);
        }
    }

    // Lightning
    if let Some(hazard) = state.hazard.as_mut() {
        hazard.advance();

        let zone = state.player.hit_zone(state.tuning.hit_zone_radius);
        let struck = overlaps(&hazard.bounds, &zone);
        let gone = exited_bottom(&hazard.bounds, &playfield);

        if struck {
            state.finish(EndOutcome::HazardHit);
            return;
        }
        if gone {
            state.hazard = None;
            state.events.push(GameEvent::HazardCleared);
        }
    }

    // Random hero voice line
    if state.rng.random_bool(state.tuning.flavor_probability) {
        let line = state.rng.random_range(0..state.tuning.flavor_line_count);
        state.events.push(GameEvent::FlavorLine(line));
    }
}
