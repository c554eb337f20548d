//! Platform abstraction layer
//!
//! The match controller only talks to these traits. Browser implementations
//! live in `renderer`, `audio`, and `highscores`; headless ones are here.

use crate::error::StoreError;
use crate::sim::{Rect, SoundEvent};

/// Horizontal or vertical text placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Centered on the canvas along this axis
    Center,
    /// Absolute canvas coordinate (x: left edge, y: baseline)
    At(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPos {
    pub x: Anchor,
    pub y: Anchor,
}

impl TextPos {
    pub fn new(x: Anchor, y: Anchor) -> Self {
        Self { x, y }
    }

    pub fn centered() -> Self {
        Self::new(Anchor::Center, Anchor::Center)
    }
}

/// Font by pixel size; the family is fixed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size_px: f32,
}

impl Font {
    pub fn px(size_px: f32) -> Self {
        Self { size_px }
    }

    /// CSS font shorthand, e.g. `30px Arial`
    pub fn css(&self) -> String {
        format!("{}px {}", self.size_px, crate::consts::FONT_FAMILY)
    }
}

/// Immediate-mode 2D drawing surface
pub trait Renderer {
    fn clear(&mut self);
    fn draw_rect(&mut self, rect: Rect, color: &str);
    /// Draw text; `\n` starts a new line one font size lower
    fn draw_text(&mut self, text: &str, pos: TextPos, font: Font, color: &str);
    fn measure_text(&mut self, text: &str, font: Font) -> f32;
}

/// Fire-and-forget sound playback
pub trait SoundSink {
    fn play(&mut self, event: SoundEvent);
}

/// Persistent best 1-player rally
pub trait RallyStore {
    /// Stored best; missing or unreadable values read as 0
    fn max_rally(&self) -> u32;
    fn set_max_rally(&mut self, rally: u32) -> Result<(), StoreError>;
}

/// Renderer that draws nothing (headless runs)
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn clear(&mut self) {}

    fn draw_rect(&mut self, _rect: Rect, _color: &str) {}

    fn draw_text(&mut self, _text: &str, _pos: TextPos, _font: Font, _color: &str) {}

    fn measure_text(&mut self, text: &str, font: Font) -> f32 {
        text.chars().count() as f32 * font.size_px * 0.5
    }
}

/// Sound sink that only logs
#[derive(Debug, Default)]
pub struct LogSound;

impl SoundSink for LogSound {
    fn play(&mut self, event: SoundEvent) {
        log::trace!("sound: {:?}", event);
    }
}

/// Collects every event; handy for assertions
impl SoundSink for Vec<SoundEvent> {
    fn play(&mut self, event: SoundEvent) {
        self.push(event);
    }
}
