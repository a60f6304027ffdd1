//! Audio
//!
//! The simulation only records events; the session turns them into calls on
//! an `AudioPlayer`. Every call is fire-and-forget.

use crate::sim::GameEvent;

/// Sound cues the game can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Sword hits the bear
    Hit,
    /// One of the hero's voice lines
    FlavorLine(usize),
    /// Start (or restart) the background loop
    Music,
}

impl SoundEffect {
    /// Sound to play for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::TargetHit { .. } => Some(SoundEffect::Hit),
            GameEvent::FlavorLine(line) => Some(SoundEffect::FlavorLine(*line)),
            GameEvent::FirstAttack => Some(SoundEffect::Music),
            _ => None,
        }
    }
}

/// Audio collaborator driven by the session
pub trait AudioPlayer {
    fn play_hit_sound(&mut self);
    fn play_flavor_line(&mut self, index: usize);
    fn play_background_loop(&mut self);
    fn pause_background_loop(&mut self);
    /// Silence every one-shot effect currently playing
    fn stop_all_effects(&mut self);

    fn play(&mut self, effect: SoundEffect) {
        match effect {
            SoundEffect::Hit => self.play_hit_sound(),
            SoundEffect::FlavorLine(line) => self.play_flavor_line(line),
            SoundEffect::Music => self.play_background_loop(),
        }
    }
}

/// Player that only logs; used by the headless runner
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioPlayer for SilentAudio {
    fn play_hit_sound(&mut self) {
        log::trace!("audio: hit");
    }

    fn play_flavor_line(&mut self, index: usize) {
        log::trace!("audio: flavor line {index}");
    }

    fn play_background_loop(&mut self) {
        log::trace!("audio: music on");
    }

    fn pause_background_loop(&mut self) {
        log::trace!("audio: music paused");
    }

    fn stop_all_effects(&mut self) {
        log::trace!("audio: effects stopped");
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::HtmlAudio;

/// `<audio>` element backend
#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::HtmlAudioElement;

    use super::AudioPlayer;
    use crate::settings::Settings;

    pub struct HtmlAudio {
        hit: Option<HtmlAudioElement>,
        lines: Vec<HtmlAudioElement>,
        music: Option<HtmlAudioElement>,
        sfx_volume: f64,
        music_volume: f64,
    }

    impl HtmlAudio {
        /// Wrap elements that already exist (e.g. `<audio>` tags in the page)
        pub fn from_elements(
            hit: Option<HtmlAudioElement>,
            lines: Vec<HtmlAudioElement>,
            music: Option<HtmlAudioElement>,
            settings: &Settings,
        ) -> Self {
            if let Some(music) = &music {
                music.set_loop(true);
            }
            let audio = Self {
                hit,
                lines,
                music,
                sfx_volume: settings.effective_sfx_volume() as f64,
                music_volume: settings.effective_music_volume() as f64,
            };
            audio.apply_volumes();
            audio
        }

        pub fn set_muted(&mut self, muted: bool, settings: &Settings) {
            let (sfx, music) = if muted {
                (0.0, 0.0)
            } else {
                (
                    settings.effective_sfx_volume() as f64,
                    settings.effective_music_volume() as f64,
                )
            };
            self.sfx_volume = sfx;
            self.music_volume = music;
            self.apply_volumes();
        }

        fn apply_volumes(&self) {
            for el in self.hit.iter().chain(self.lines.iter()) {
                el.set_volume(self.sfx_volume);
            }
            if let Some(music) = &self.music {
                music.set_volume(self.music_volume);
            }
        }

        fn start(el: &HtmlAudioElement) {
            // Autoplay may be refused until the first user gesture
            if let Err(e) = el.play() {
                log::debug!("Audio play rejected: {e:?}");
            }
        }
    }

    impl AudioPlayer for HtmlAudio {
        fn play_hit_sound(&mut self) {
            if let Some(hit) = &self.hit {
                hit.set_current_time(0.0);
                Self::start(hit);
            }
        }

        fn play_flavor_line(&mut self, index: usize) {
            if self.lines.is_empty() {
                return;
            }
            let line = &self.lines[index % self.lines.len()];
            Self::start(line);
        }

        fn play_background_loop(&mut self) {
            if let Some(music) = &self.music {
                Self::start(music);
            }
        }

        fn pause_background_loop(&mut self) {
            if let Some(music) = &self.music {
                if let Err(e) = music.pause() {
                    log::debug!("Audio pause rejected: {e:?}");
                }
            }
        }

        fn stop_all_effects(&mut self) {
            for el in self.hit.iter().chain(self.lines.iter()) {
                if let Err(e) = el.pause() {
                    log::debug!("Audio pause rejected: {e:?}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EndOutcome;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::TargetHit { score: 3 }),
            Some(SoundEffect::Hit)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::FlavorLine(2)),
            Some(SoundEffect::FlavorLine(2))
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::FirstAttack),
            Some(SoundEffect::Music)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::AttackLaunched), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Ended(EndOutcome::HazardHit)),
            None
        );
    }
}
