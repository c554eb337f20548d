//! Court entities and core simulation types
//!
//! Everything here is plain data plus the per-entity motion rules. The
//! ordering of a full tick lives in `tick`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Which end of the court a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Player 1 (the human in 1-player mode)
    Left,
    /// Player 2, or the AI in 1-player mode
    Right,
}

/// Requested paddle motion; maps onto a fixed vertical speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    Up,
    Down,
    Stop,
}

impl Motion {
    /// Vertical velocity for this motion (screen y grows downward)
    pub fn velocity(self, speed: f32) -> f32 {
        match self {
            Motion::Up => -speed,
            Motion::Down => speed,
            Motion::Stop => 0.0,
        }
    }
}

/// Fire-and-forget notifications raised during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEvent {
    /// Ball bounced off the top or bottom wall
    Wall,
    /// Ball rebounded off a paddle
    Paddle,
    /// Ball left the court
    Goal,
}

/// Court dimensions in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(800.0, 500.0)
    }
}

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// True if `other` spans no more vertically than this rect does
    pub fn contains_vertically(&self, other: &Rect) -> bool {
        other.top() >= self.top() && other.bottom() <= self.bottom()
    }
}

/// Anything that occupies a rectangle on the court
pub trait Bounds {
    fn rect(&self) -> Rect;

    fn left(&self) -> f32 {
        self.rect().left()
    }

    fn right(&self) -> f32 {
        self.rect().right()
    }

    fn top(&self) -> f32 {
        self.rect().top()
    }

    fn bottom(&self) -> f32 {
        self.rect().bottom()
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub size: Vec2,
    /// Per-tick velocity (u, v)
    pub vel: Vec2,
}

impl Ball {
    /// Create a centered ball already served in a random diagonal
    pub fn new<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            size: Vec2::splat(tuning.ball_size),
            vel: Vec2::ZERO,
        };
        ball.reset(tuning, rng);
        ball
    }

    /// Recenter and pick a fresh direction; each axis sign is independent
    pub fn reset<R: Rng + ?Sized>(&mut self, tuning: &Tuning, rng: &mut R) {
        self.pos = tuning.playfield.center() - self.size / 2.0;
        let sign_u = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let sign_v = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(sign_u, sign_v) * tuning.serve_speed;
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Left edge one tick ago
    pub fn prev_left(&self) -> f32 {
        self.left() - self.vel.x
    }

    /// Right edge one tick ago
    pub fn prev_right(&self) -> f32 {
        self.right() - self.vel.x
    }

    pub fn center_y(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }

    /// Reverse horizontal direction and add `speedup` to its magnitude
    pub fn rebound(&mut self, speedup: f32) {
        self.vel.x = -(self.vel.x + speedup.copysign(self.vel.x));
    }
}

impl Bounds for Ball {
    fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A player paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity per tick: one of -speed, 0, +speed
    pub vel_y: f32,
    pub score: u32,
}

impl Paddle {
    pub fn new(side: Side, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.paddle_width, tuning.paddle_height);
        let x = match side {
            Side::Left => tuning.paddle_inset,
            Side::Right => tuning.playfield.width - tuning.paddle_inset - size.x,
        };
        let mut paddle = Self {
            side,
            pos: Vec2::new(x, 0.0),
            size,
            vel_y: 0.0,
            score: 0,
        };
        paddle.reset(tuning.playfield);
        paddle
    }

    /// Recenter vertically and stop; score is left alone
    pub fn reset(&mut self, field: Playfield) {
        self.pos.y = field.height / 2.0 - self.size.y / 2.0;
        self.vel_y = 0.0;
    }

    pub fn set_motion(&mut self, motion: Motion, speed: f32) {
        self.vel_y = motion.velocity(speed);
    }

    /// Apply velocity if the paddle stays fully on the court.
    ///
    /// A rejected move leaves both position and velocity as they were.
    /// Returns whether the paddle moved.
    pub fn advance(&mut self, field: Playfield) -> bool {
        let next = self.pos.y + self.vel_y;
        if next >= 0.0 && next + self.size.y <= field.height {
            self.pos.y = next;
            true
        } else {
            false
        }
    }

    /// Snap so the vertical centers match. Unclamped: may leave the court.
    pub fn follow(&mut self, ball: &Ball) {
        self.pos.y = ball.center_y() - self.size.y / 2.0;
    }

    /// Center on a pointer y coordinate, clamped onto the court
    pub fn place_center(&mut self, y: f32, field: Playfield) {
        let max = (field.height - self.size.y).max(0.0);
        self.pos.y = (y - self.size.y / 2.0).clamp(0.0, max);
    }

    /// The edge the ball has to cross to rebound
    pub fn face(&self) -> f32 {
        match self.side {
            Side::Left => self.right(),
            Side::Right => self.left(),
        }
    }
}

impl Bounds for Paddle {
    fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Ball plus both paddles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    pub ball: Ball,
    pub left: Paddle,
    pub right: Paddle,
}

impl Court {
    pub fn new<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Self {
        Self {
            ball: Ball::new(tuning, rng),
            left: Paddle::new(Side::Left, tuning),
            right: Paddle::new(Side::Right, tuning),
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Serve position: ball centered with a new direction, paddles centered
    pub fn reset_positions<R: Rng + ?Sized>(&mut self, tuning: &Tuning, rng: &mut R) {
        self.ball.reset(tuning, rng);
        self.left.reset(tuning.playfield);
        self.right.reset(tuning.playfield);
    }

    /// Fresh match: serve position and both scores zeroed
    pub fn reset<R: Rng + ?Sized>(&mut self, tuning: &Tuning, rng: &mut R) {
        self.reset_positions(tuning, rng);
        self.left.score = 0;
        self.right.score = 0;
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.left.score, self.right.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_paddle_start_positions() {
        let tuning = Tuning::default();
        let left = Paddle::new(Side::Left, &tuning);
        let right = Paddle::new(Side::Right, &tuning);

        assert_eq!(left.pos.x, 20.0);
        assert_eq!(right.pos.x, 800.0 - 20.0 - 10.0);
        assert_eq!(left.pos.y, 250.0 - 35.0);
        assert_eq!(left.face(), 30.0);
        assert_eq!(right.face(), 770.0);
    }

    #[test]
    fn test_paddle_rejects_move_off_court() {
        let field = Playfield::default();
        let mut paddle = Paddle::new(Side::Left, &Tuning::default());
        paddle.pos.y = 3.0;
        paddle.set_motion(Motion::Up, 6.0);

        assert!(!paddle.advance(field));
        assert_eq!(paddle.pos.y, 3.0);
        // Velocity survives the rejection
        assert_eq!(paddle.vel_y, -6.0);

        paddle.pos.y = 6.0;
        assert!(paddle.advance(field));
        assert_eq!(paddle.pos.y, 0.0);
    }

    #[test]
    fn test_paddle_follow_can_leave_court() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ball = Ball::new(&tuning, &mut rng);
        ball.pos.y = 0.0;
        let mut paddle = Paddle::new(Side::Right, &tuning);

        paddle.follow(&ball);
        assert_eq!(paddle.pos.y, 5.0 - 35.0);
        assert!(paddle.top() < 0.0);
    }

    #[test]
    fn test_place_center_clamps() {
        let field = Playfield::default();
        let mut paddle = Paddle::new(Side::Left, &Tuning::default());

        paddle.place_center(10.0, field);
        assert_eq!(paddle.pos.y, 0.0);
        paddle.place_center(495.0, field);
        assert_eq!(paddle.pos.y, 430.0);
        paddle.place_center(200.0, field);
        assert_eq!(paddle.pos.y, 165.0);
    }

    #[test]
    fn test_ball_rebound_adds_speed() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ball = Ball::new(&tuning, &mut rng);

        ball.vel.x = -3.0;
        ball.rebound(0.6);
        assert!((ball.vel.x - 3.6).abs() < 1e-6);
        ball.rebound(0.6);
        assert!((ball.vel.x + 4.2).abs() < 1e-6);
    }

    #[test]
    fn test_court_reset_zeroes_scores() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut court = Court::new(&tuning, &mut rng);
        court.left.score = 3;
        court.right.score = 4;
        court.ball.pos = Vec2::new(12.0, 400.0);
        court.left.pos.y = 0.0;
        court.right.vel_y = 6.0;

        court.reset(&tuning, &mut rng);

        assert_eq!(court.scores(), (0, 0));
        assert_eq!(court.ball.pos, Vec2::new(395.0, 245.0));
        assert_eq!(court.ball.vel.x.abs(), 3.0);
        assert_eq!(court.ball.vel.y.abs(), 3.0);
        assert_eq!(court.left.pos.y, 215.0);
        assert_eq!(court.right.pos.y, 215.0);
        assert_eq!(court.right.vel_y, 0.0);
    }

    #[test]
    fn test_serve_directions_cover_all_diagonals() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut ball = Ball::new(&tuning, &mut rng);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..64 {
            ball.reset(&tuning, &mut rng);
            seen.insert((ball.vel.x > 0.0, ball.vel.y > 0.0));
        }
        assert_eq!(seen.len(), 4);
    }

    proptest! {
        #[test]
        fn prop_paddle_clamp_or_reject(start in 0u32..=430, up in any::<bool>()) {
            let field = Playfield::default();
            let mut paddle = Paddle::new(Side::Left, &Tuning::default());
            paddle.pos.y = start as f32;
            paddle.set_motion(if up { Motion::Up } else { Motion::Down }, 6.0);

            for _ in 0..200 {
                let before = paddle.pos.y;
                paddle.advance(field);
                let after = paddle.pos.y;
                let in_bounds = after >= 0.0 && after <= field.height - paddle.size.y;
                prop_assert!(in_bounds || after == before);
            }
        }
    }
}
