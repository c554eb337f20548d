//! Browser rendering module
//!
//! Immediate-mode drawing on a 2D canvas context.

pub mod canvas;

pub use canvas::CanvasRenderer;
