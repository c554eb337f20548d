//! Fixed-tick simulation step
//!
//! Every tick applies the same per-frame increments; there is no delta time.

use rand::Rng;

use super::collision::{goal_scorer, hits_wall, rebound_side};
use super::state::{Court, Side, SoundEvent};
use crate::tuning::Tuning;

/// Who drives the right paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opponent {
    /// Second player; moves by velocity like the left paddle
    Human,
    /// AI that snaps its center to the ball every tick
    Tracking,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Sounds raised, in the order they happened
    pub sounds: Vec<SoundEvent>,
    /// Paddle the ball rebounded off
    pub rebound: Option<Side>,
    /// Player who scored; the court has already been reset for the next serve
    pub goal: Option<Side>,
}

/// Advance the court by one tick
pub fn step<R: Rng + ?Sized>(
    court: &mut Court,
    tuning: &Tuning,
    opponent: Opponent,
    rng: &mut R,
) -> StepReport {
    let field = tuning.playfield;
    let mut report = StepReport::default();

    court.ball.advance();
    if hits_wall(&court.ball, field) {
        court.ball.vel.y = -court.ball.vel.y;
        report.sounds.push(SoundEvent::Wall);
    }

    court.left.advance(field);
    match opponent {
        Opponent::Human => {
            court.right.advance(field);
        }
        Opponent::Tracking => court.right.follow(&court.ball),
    }

    report.rebound = rebound_side(&court.ball, &court.left, &court.right);
    if let Some(side) = report.rebound {
        court.ball.rebound(tuning.rebound_speedup);
        report.sounds.push(SoundEvent::Paddle);
        log::debug!("Rebound off {:?} paddle, u={:.1}", side, court.ball.vel.x);
        // A rebounding ball cannot also score this tick
        return report;
    }

    if let Some(scorer) = goal_scorer(&court.ball, field) {
        court.paddle_mut(scorer).score += 1;
        court.reset_positions(tuning, rng);
        report.sounds.push(SoundEvent::Goal);
        report.goal = Some(scorer);
        log::debug!("Goal for {:?}: {} - {}", scorer, court.left.score, court.right.score);
    }

    report
}
