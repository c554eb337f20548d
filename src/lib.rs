//! Canvas Pong - classic two-paddle Pong for the browser
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (entities, collisions, goals)
//! - `game`: Match controller and phase state machine
//! - `platform`: Collaborator traits (renderer, sound, rally store)
//! - `ui`: Scene composition for menus, HUD, and the court
//! - `input`: Key/pointer mapping to controller events
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod game;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use error::{ConfigError, StoreError};
pub use game::{MatchController, MatchOptions, MatchOutcome, MatchPhase};
pub use settings::Settings;
pub use tuning::Tuning;

/// Presentation constants
pub mod consts {
    /// Foreground color for court, text, and underlines
    pub const FOREGROUND: &str = "#fff";
    /// Title color
    pub const TITLE: &str = "#f00";
    /// Font family used for every label
    pub const FONT_FAMILY: &str = "Arial";

    /// Baseline of two-option menu labels
    pub const MENU_Y: f32 = 350.0;
    /// Thickness of the selected-option underline
    pub const UNDERLINE_HEIGHT: f32 = 5.0;
    /// Baseline of the controls hint shown before a serve
    pub const HINT_Y: f32 = 300.0;
    /// Baseline of the 1P rally counter
    pub const RALLY_Y: f32 = 60.0;
    /// Baseline of the 2P scoreline and 1P best rally
    pub const SCORE_Y: f32 = 100.0;

    pub const TITLE_FONT_PX: f32 = 80.0;
    pub const MENU_FONT_PX: f32 = 30.0;
    pub const HINT_FONT_PX: f32 = 20.0;
    pub const RALLY_FONT_PX: f32 = 40.0;
    pub const SCORE_FONT_PX: f32 = 60.0;
    pub const BANNER_FONT_PX: f32 = 30.0;
}
