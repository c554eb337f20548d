//! Discrete collision tests for the ball
//!
//! Rebounds compare the ball's previous and current horizontal edges against
//! a paddle face. There is no swept test, so a ball moving fast enough can
//! skip over a paddle between two ticks.

use super::state::{Ball, Bounds, Paddle, Playfield, Side};

/// Ball touches or passes the top or bottom wall
pub fn hits_wall(ball: &Ball, field: Playfield) -> bool {
    ball.top() <= 0.0 || ball.bottom() >= field.height
}

/// Ball crossed `paddle`'s face since last tick while fully inside its
/// vertical span
pub fn crossed_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    let face = paddle.face();
    let crossed = match paddle.side {
        Side::Left => ball.prev_left() >= face && ball.left() <= face,
        Side::Right => ball.prev_right() <= face && ball.right() >= face,
    };
    crossed && paddle.rect().contains_vertically(&ball.rect())
}

/// First paddle the ball rebounds off this tick, left checked first
pub fn rebound_side(ball: &Ball, left: &Paddle, right: &Paddle) -> Option<Side> {
    if crossed_paddle(ball, left) {
        Some(Side::Left)
    } else if crossed_paddle(ball, right) {
        Some(Side::Right)
    } else {
        None
    }
}

/// Ball fully left the court. The scorer is read from the direction of
/// travel: moving right means it went out past the right paddle.
pub fn goal_scorer(ball: &Ball, field: Playfield) -> Option<Side> {
    if ball.right() <= 0.0 || ball.left() >= field.width {
        Some(if ball.vel.x > 0.0 { Side::Left } else { Side::Right })
    } else {
        None
    }
}
