//! Canvas 2D renderer
//!
//! Draws each visible sprite with its image, stretched to the sprite bounds.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Frame, Renderer, SpriteKind};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    images: HashMap<SpriteKind, HtmlImageElement>,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            images: HashMap::new(),
        })
    }

    pub fn set_image(&mut self, kind: SpriteKind, image: HtmlImageElement) {
        self.images.insert(kind, image);
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, frame: &Frame) {
        self.ctx
            .clear_rect(0.0, 0.0, frame.width as f64, frame.height as f64);

        for sprite in frame.visible() {
            let Some(image) = self.images.get(&sprite.kind) else {
                continue;
            };
            let b = sprite.bounds;
            if let Err(e) = self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(
                    image,
                    b.pos.x as f64,
                    b.pos.y as f64,
                    b.size.x as f64,
                    b.size.y as f64,
                )
            {
                log::warn!("Render error: {:?}", e);
            }
        }
    }
}
