//! Browser host
//!
//! Wires a session to the page: sprite images on a 2D canvas, `<audio>`
//! tags, the DOM HUD, keyboard and focus events, the reset button, and the
//! animation-frame loop.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlAudioElement, HtmlCanvasElement, HtmlElement, HtmlImageElement,
    KeyboardEvent, Window,
};

use crate::assets::{AssetTracker, Readiness};
use crate::audio::HtmlAudio;
use crate::input::InputState;
use crate::renderer::{CanvasRenderer, SpriteKind};
use crate::session::{Hud, LoopControl, Session};
use crate::settings::Settings;
use crate::sim::GameState;
use crate::tuning::Tuning;

const CANVAS_ID: &str = "gameCanvas";
const HIT_SOUND_ID: &str = "hitSound";
const FLAVOR_LINE_IDS: [&str; 4] = ["heman1", "heman2", "heman3", "heman4"];
const MUSIC_SRC: &str = "background.mp3";

fn image_src(kind: SpriteKind) -> &'static str {
    match kind {
        SpriteKind::Background => "background.png",
        SpriteKind::Player => "heman.png",
        SpriteKind::Target => "bear.png",
        SpriteKind::Attack => "sword.png",
        SpriteKind::Hazard => "lightning.png",
    }
}

/// HUD backed by page elements. Missing elements are skipped.
pub struct DomHud {
    score: Option<Element>,
    time: Option<Element>,
    final_score: Option<Element>,
    game_over: Option<HtmlElement>,
}

impl DomHud {
    pub fn new(document: &Document) -> Self {
        Self {
            score: document.get_element_by_id("score"),
            time: document.get_element_by_id("time"),
            final_score: document.get_element_by_id("finalScore"),
            game_over: document
                .get_element_by_id("gameOverMessage")
                .and_then(|el| el.dyn_into().ok()),
        }
    }
}

impl Hud for DomHud {
    fn show_score(&mut self, score: u32) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&format!("Score: {score}")));
        }
    }

    fn show_time(&mut self, remaining_secs: u64) {
        if let Some(el) = &self.time {
            el.set_text_content(Some(&format!("Time: {remaining_secs} seconds")));
        }
    }

    fn show_final_message(&mut self, message: &str) {
        if let Some(el) = &self.final_score {
            el.set_text_content(Some(message));
        }
    }

    fn set_loss_indicator(&mut self, visible: bool) {
        if let Some(el) = &self.game_over {
            let display = if visible { "block" } else { "none" };
            if let Err(e) = el.style().set_property("display", display) {
                log::debug!("Failed to toggle loss indicator: {e:?}");
            }
        }
    }

    fn clear_final_message(&mut self) {
        if let Some(el) = &self.final_score {
            el.set_text_content(Some(""));
        }
    }
}

type WebSession = Session<CanvasRenderer, HtmlAudio, DomHud>;

struct WebGame {
    session: WebSession,
    settings: Settings,
    /// An animation frame is pending
    loop_active: bool,
}

type SharedGame = Rc<RefCell<WebGame>>;

fn millis_to_duration(ms: f64) -> Duration {
    Duration::from_secs_f64(ms.max(0.0) / 1000.0)
}

/// Same time base as animation-frame timestamps
fn now() -> Duration {
    let ms = web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now);
    millis_to_duration(ms)
}

fn request_animation_frame(game: SharedGame) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        game_loop(game, time);
    });
    if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {e:?}");
        return;
    }
    closure.forget();
}

fn game_loop(game: SharedGame, time: f64) {
    let control = {
        let mut g = game.borrow_mut();
        let control = g.session.frame(millis_to_duration(time));
        if control == LoopControl::Stop {
            g.loop_active = false;
        }
        control
    };

    if control == LoopControl::Continue {
        request_animation_frame(game);
    }
}

/// Schedule frames unless a loop is already running
fn ensure_loop(game: &SharedGame) {
    let schedule = {
        let mut g = game.borrow_mut();
        if g.loop_active || !g.session.is_started() {
            false
        } else {
            g.loop_active = true;
            true
        }
    };
    if schedule {
        request_animation_frame(game.clone());
    }
}

fn page_audio(document: &Document, id: &str) -> Option<HtmlAudioElement> {
    let Some(el) = document.get_element_by_id(id) else {
        log::warn!("No <audio id=\"{id}\"> in page");
        return None;
    };
    el.dyn_into().ok()
}

fn load_images(game: &SharedGame) -> Result<(), JsValue> {
    for kind in SpriteKind::ALL {
        let image = HtmlImageElement::new()?;
        let src = image_src(kind);

        {
            let game = game.clone();
            let onload = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let result = game.borrow_mut().session.asset_loaded(kind.asset_id(), now());
                match result {
                    Ok(true) => ensure_loop(&game),
                    Ok(false) => {}
                    Err(e) => log::error!("{e}"),
                }
            });
            image.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();
        }

        {
            let game = game.clone();
            let onerror = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let reason = format!("could not load {src}");
                let result = game.borrow_mut().session.asset_failed(kind.asset_id(), &reason);
                match result {
                    Ok(Readiness::Failed { asset, reason }) => {
                        log::error!("Game cannot start: `{asset}` failed ({reason})");
                    }
                    Ok(_) => {}
                    Err(e) => log::error!("{e}"),
                }
            });
            image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        }

        game.borrow_mut()
            .session
            .renderer_mut()
            .set_image(kind, image.clone());
        image.set_src(src);
    }
    Ok(())
}

fn setup_keyboard(document: &Document, game: &SharedGame) -> Result<(), JsValue> {
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            // Bound keys must not scroll the page
            if game.borrow_mut().session.key_down(&event.key()) {
                event.prevent_default();
            }
        });
        document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if game.borrow_mut().session.key_up(&event.key()) {
                event.prevent_default();
            }
        });
        document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

fn setup_focus(window: &Window, game: &SharedGame) -> Result<(), JsValue> {
    // Key-ups that happen while unfocused never arrive
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut guard = game.borrow_mut();
            let g = &mut *guard;
            g.session.release_keys();
            if g.settings.mute_on_blur {
                g.session.audio_mut().set_muted(true, &g.settings);
            }
            log::debug!("Window blurred, keys released");
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut guard = game.borrow_mut();
            let g = &mut *guard;
            if g.settings.mute_on_blur {
                g.session.audio_mut().set_muted(g.settings.muted, &g.settings);
            }
        });
        window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

fn setup_reset_button(document: &Document, game: &SharedGame) -> Result<(), JsValue> {
    let Some(btn) = document.get_element_by_id("resetButton") else {
        log::warn!("No #resetButton in page");
        return Ok(());
    };

    let game = game.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
        let result = game.borrow_mut().session.reset(now());
        match result {
            Ok(()) => ensure_loop(&game),
            Err(e) => log::error!("Cannot restart: {e}"),
        }
    });
    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Set up the page and start loading sprites. The session starts by itself
/// once the last sprite has loaded.
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {e}").into());
    }

    log::info!("Storm Sword starting...");

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or("no #gameCanvas element")?
        .dyn_into()?;

    let tuning = Tuning::default();
    canvas.set_width(tuning.playfield_width as u32);
    canvas.set_height(tuning.playfield_height as u32);

    let settings = Settings::default();
    let renderer = CanvasRenderer::new(&canvas).ok_or("2d canvas context unavailable")?;
    let music = match HtmlAudioElement::new_with_src(MUSIC_SRC) {
        Ok(el) => Some(el),
        Err(e) => {
            log::warn!("Failed to create background music: {e:?}");
            None
        }
    };
    let audio = HtmlAudio::from_elements(
        page_audio(&document, HIT_SOUND_ID),
        FLAVOR_LINE_IDS
            .iter()
            .filter_map(|id| page_audio(&document, id))
            .collect(),
        music,
        &settings,
    );
    let mut hud = DomHud::new(&document);
    hud.set_loss_indicator(false);

    let seed = js_sys::Date::now() as u64;
    let session = Session::new(
        GameState::new(tuning, seed, now()),
        InputState::new(settings.bindings.clone()),
        AssetTracker::for_game(),
        renderer,
        audio,
        hud,
    );
    let game = Rc::new(RefCell::new(WebGame {
        session,
        settings,
        loop_active: false,
    }));

    setup_keyboard(&document, &game)?;
    setup_focus(&window, &game)?;
    setup_reset_button(&document, &game)?;
    load_images(&game)?;

    log::info!("Game initialized with seed: {seed}");
    Ok(())
}
