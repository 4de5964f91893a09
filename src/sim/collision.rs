//! Collision detection and response
//!
//! Axis-aligned checks between the ball, the arena's top and bottom walls
//! and the two paddles. Only the ball's velocity is changed; positions are
//! left alone, so a ball that overshoots a paddle face still bounces back.

use glam::Vec2;

use super::state::{Arena, Ball, Paddle, Side};

/// What a collision pass did to the ball
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResult {
    /// Vertical velocity was inverted by the top or bottom wall
    pub wall: bool,
    /// Paddle that returned the ball
    pub paddle: Option<Side>,
}

/// Resolve wall and paddle contacts for one tick
///
/// The wall check always runs first. The paddle checked depends only on
/// the sign of the horizontal velocity: negative checks the left paddle,
/// anything else (zero included) checks the right one.
pub fn resolve_collisions(
    ball: &mut Ball,
    left: &Paddle,
    right: &Paddle,
    arena: &Arena,
    max_velocity: f32,
) -> CollisionResult {
    let mut result = CollisionResult::default();

    if touches_wall(ball, arena) {
        ball.set_vel(Vec2::new(ball.vel().x, -ball.vel().y));
        result.wall = true;
    }

    let (side, paddle) = if ball.vel().x < 0.0 {
        (Side::Left, left)
    } else {
        (Side::Right, right)
    };

    let hit = match side {
        Side::Left => hits_left_paddle(ball, paddle),
        Side::Right => hits_right_paddle(ball, paddle),
    };

    if hit {
        let vy = deflection(ball.pos().y, paddle, max_velocity);
        ball.set_vel(Vec2::new(-ball.vel().x, vy));
        result.paddle = Some(side);
    }

    result
}

/// Ball's vertical extent touches or crosses the top or bottom edge
#[inline]
pub fn touches_wall(ball: &Ball, arena: &Arena) -> bool {
    let y = ball.pos().y;
    y + ball.radius() >= arena.height || y - ball.radius() <= 0.0
}

/// Ball is level with the paddle and its left edge reached the right face
#[inline]
pub fn hits_left_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    paddle.spans_y(ball.pos().y) && ball.pos().x - ball.radius() <= paddle.right_face()
}

/// Ball is level with the paddle and its right edge reached the left face
#[inline]
pub fn hits_right_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    paddle.spans_y(ball.pos().y) && ball.pos().x + ball.radius() >= paddle.left_face()
}

/// Vertical velocity after a paddle hit
///
/// Linear in the strike offset from the paddle center, normalized by half
/// the paddle height: the center gives 0, the top edge `-max_velocity`, the
/// bottom edge `+max_velocity`.
#[inline]
pub fn deflection(ball_y: f32, paddle: &Paddle, max_velocity: f32) -> f32 {
    let half = paddle.height() / 2.0;
    (ball_y - paddle.center_y()) / half * max_velocity
}
