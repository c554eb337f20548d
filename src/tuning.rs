//! Data-driven game balance
//!
//! Defaults reproduce the classic feel. Any subset of fields can be
//! overridden from JSON; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::Playfield;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Gameplay constants, all in canvas pixels and per-tick units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield: Playfield,
    /// Ball edge length (the ball is square)
    pub ball_size: f32,
    /// Per-axis speed of a fresh serve
    pub serve_speed: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between a side wall and its paddle
    pub paddle_inset: f32,
    /// Vertical paddle speed while a direction is held
    pub paddle_speed: f32,
    /// Added to horizontal ball speed on every paddle rebound
    pub rebound_speedup: f32,
    /// First to this many goals wins a 2-player match
    pub winning_score: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            ball_size: 10.0,
            serve_speed: 3.0,
            paddle_width: 10.0,
            paddle_height: 70.0,
            paddle_inset: 20.0,
            paddle_speed: 6.0,
            rebound_speedup: 0.6,
            winning_score: 5,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON and validate the result
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Same tuning on a differently sized court (e.g. the canvas)
    pub fn with_playfield(mut self, width: f32, height: f32) -> Self {
        self.playfield = Playfield::new(width, height);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("playfield.width", self.playfield.width),
            ("playfield.height", self.playfield.height),
            ("ball_size", self.ball_size),
            ("serve_speed", self.serve_speed),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.paddle_inset < 0.0 || self.rebound_speedup < 0.0 {
            return Err(ConfigError::Invalid(
                "paddle_inset and rebound_speedup cannot be negative".into(),
            ));
        }
        if self.paddle_height > self.playfield.height {
            return Err(ConfigError::Invalid(format!(
                "paddle_height {} exceeds playfield height {}",
                self.paddle_height, self.playfield.height
            )));
        }
        if self.ball_size >= self.playfield.height {
            return Err(ConfigError::Invalid("ball does not fit on the court".into()));
        }
        if 2.0 * (self.paddle_inset + self.paddle_width) >= self.playfield.width {
            return Err(ConfigError::Invalid("paddles overlap across the court".into()));
        }
        if self.winning_score == 0 {
            return Err(ConfigError::Invalid("winning_score must be at least 1".into()));
        }
        Ok(())
    }
}
