//! Rendering
//!
//! The simulation never draws. Each frame the session captures a `Frame`
//! (what to draw, where, whether it is visible) and hands it to a
//! `Renderer`. The browser backend draws it on a 2D canvas.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use serde::{Deserialize, Serialize};

use crate::sim::{GameState, Rect};

/// What a sprite depicts; each kind maps to one image asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Background,
    Player,
    Target,
    Attack,
    Hazard,
}

impl SpriteKind {
    /// Draw order, back to front
    pub const ALL: [SpriteKind; 5] = [
        SpriteKind::Background,
        SpriteKind::Player,
        SpriteKind::Target,
        SpriteKind::Attack,
        SpriteKind::Hazard,
    ];

    /// Id of the image asset this sprite is drawn with
    pub fn asset_id(&self) -> &'static str {
        match self {
            SpriteKind::Background => "background",
            SpriteKind::Player => "hero",
            SpriteKind::Target => "bear",
            SpriteKind::Attack => "sword",
            SpriteKind::Hazard => "lightning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub bounds: Rect,
    pub visible: bool,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    /// Back to front
    pub sprites: Vec<Sprite>,
    pub loss_indicator: bool,
}

impl Frame {
    pub fn capture(state: &GameState) -> Self {
        let playfield = state.tuning.playfield();
        let hazard = state.hazard.as_ref();

        let sprites = SpriteKind::ALL
            .into_iter()
            .map(|kind| {
                let (bounds, visible) = match kind {
                    SpriteKind::Background => (playfield, true),
                    SpriteKind::Player => (state.player.render_bounds(), true),
                    SpriteKind::Target => (state.target.bounds, true),
                    SpriteKind::Attack => (state.attack.bounds, state.attack.active),
                    SpriteKind::Hazard => (
                        hazard.map(|h| h.bounds).unwrap_or_default(),
                        hazard.is_some(),
                    ),
                };
                Sprite {
                    kind,
                    bounds,
                    visible,
                }
            })
            .collect();

        Self {
            width: playfield.size.x,
            height: playfield.size.y,
            sprites,
            loss_indicator: state.loss_indicator,
        }
    }

    pub fn sprite(&self, kind: SpriteKind) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.kind == kind)
    }

    pub fn visible(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(|s| s.visible)
    }
}

/// Draws frames. Returns nothing the game depends on.
pub trait Renderer {
    fn draw(&mut self, frame: &Frame);
}

/// Renderer that draws nothing; used by the headless runner
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _frame: &Frame) {}
}
