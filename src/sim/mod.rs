//! Deterministic simulation module
//!
//! All court physics lives here. This module must be pure and deterministic:
//! - Fixed tick only, no delta time
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{crossed_paddle, goal_scorer, hits_wall, rebound_side};
pub use state::{Ball, Bounds, Court, Motion, Paddle, Playfield, Rect, Side, SoundEvent};
pub use tick::{Opponent, StepReport, step};
