//! Canvas 2D renderer
//!
//! Draws directly into a `CanvasRenderingContext2d`. Text y coordinates are
//! baselines; a centered y is offset by half the font size.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::platform::{Anchor, Font, Renderer, TextPos};
use crate::sim::Rect;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    fn fill_line(&self, line: &str, x: Anchor, y: f64) {
        let x = match x {
            Anchor::Center => {
                let width = self.ctx.measure_text(line).map(|m| m.width()).unwrap_or(0.0);
                self.width / 2.0 - width / 2.0
            }
            Anchor::At(x) => x as f64,
        };
        if let Err(e) = self.ctx.fill_text(line, x, y) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }
}

impl Renderer for CanvasRenderer {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            rect.pos.x as f64,
            rect.pos.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn draw_text(&mut self, text: &str, pos: TextPos, font: Font, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font(&font.css());

        let size = font.size_px as f64;
        let mut y = match pos.y {
            Anchor::Center => self.height / 2.0 + size / 2.0,
            Anchor::At(y) => y as f64,
        };
        for line in text.split('\n') {
            self.fill_line(line, pos.x, y);
            y += size;
        }
    }

    fn measure_text(&mut self, text: &str, font: Font) -> f32 {
        self.ctx.set_font(&font.css());
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }
}
