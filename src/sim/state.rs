//! Game state and core simulation types
//!
//! Coordinates follow the screen: origin at the top-left corner of the
//! arena, y grows downward. Paddle positions name their top-left corner,
//! ball positions name the ball center.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::{Settings, SettingsError};

/// Immutable play area bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Arena center (ball spawn point)
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// One of the two players, named by the side they defend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

/// Paddle move command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pos: Vec2,
    original_pos: Vec2,
    size: Vec2,
    /// Distance covered by one move command
    velocity: f32,
    /// Lowest allowed top edge (arena height minus paddle height)
    max_y: f32,
}

impl Paddle {
    pub fn new(pos: Vec2, width: f32, height: f32, velocity: f32, arena: &Arena) -> Self {
        let max_y = (arena.height - height).max(0.0);
        let pos = Vec2::new(pos.x, pos.y.clamp(0.0, max_y));
        Self {
            pos,
            original_pos: pos,
            size: Vec2::new(width, height),
            velocity,
            max_y,
        }
    }

    /// Shift by one step and clamp inside the arena
    pub fn move_toward(&mut self, direction: Direction) {
        let step = match direction {
            Direction::Up => -self.velocity,
            Direction::Down => self.velocity,
        };
        self.pos.y = (self.pos.y + step).clamp(0.0, self.max_y);
    }

    /// Return to the starting position
    pub fn reset(&mut self) {
        self.pos = self.original_pos;
    }

    /// Top-left corner
    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn original_pos(&self) -> Vec2 {
        self.original_pos
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Vertical center of the paddle face
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }

    /// x of the face pointing right (the left paddle's hitting face)
    #[inline]
    pub fn right_face(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// x of the face pointing left (the right paddle's hitting face)
    #[inline]
    pub fn left_face(&self) -> f32 {
        self.pos.x
    }

    /// Whether `y` lies on the closed vertical span of the paddle
    #[inline]
    pub fn spans_y(&self, y: f32) -> bool {
        self.pos.y <= y && y <= self.pos.y + self.size.y
    }

    /// Place the paddle directly (clamped like a move)
    pub(crate) fn set_y(&mut self, y: f32) {
        self.pos.y = y.clamp(0.0, self.max_y);
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pos: Vec2,
    original_pos: Vec2,
    vel: Vec2,
    radius: f32,
}

impl Ball {
    /// Ball at `pos` serving toward the right at `speed`
    pub fn new(pos: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            pos,
            original_pos: pos,
            vel: Vec2::new(speed, 0.0),
            radius,
        }
    }

    /// Advance by one tick of velocity (no containment)
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Serve again from the spawn point toward the other side
    pub fn reset(&mut self) {
        self.pos = self.original_pos;
        self.vel = Vec2::new(-self.vel.x, 0.0);
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn original_pos(&self) -> Vec2 {
        self.original_pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub(crate) fn set_vel(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    pub(crate) fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }
}

/// Match score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    pub left: u32,
    pub right: u32,
    winning_score: u32,
}

impl ScoreTracker {
    pub fn new(winning_score: u32) -> Self {
        Self {
            left: 0,
            right: 0,
            winning_score,
        }
    }

    pub fn winning_score(&self) -> u32 {
        self.winning_score
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Credit a point; returns the winner if this point ends the match
    pub fn record_point(&mut self, side: Side) -> Option<Side> {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
        self.winner()
    }

    /// Side that reached the winning score (left is checked first)
    pub fn winner(&self) -> Option<Side> {
        if self.left >= self.winning_score {
            Some(Side::Left)
        } else if self.right >= self.winning_score {
            Some(Side::Right)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.left = 0;
        self.right = 0;
    }
}

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball sits at the spawn point, about to be served
    Serving,
    /// Ball in flight
    InPlay,
    /// A side reached the winning score; the simulation is frozen until
    /// the match is reset
    MatchWon { winner: Side },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub arena: Arena,
    pub left_paddle: Paddle,
    pub right_paddle: Paddle,
    pub ball: Ball,
    pub score: ScoreTracker,
    pub phase: GamePhase,
    /// Horizontal serve speed and paddle deflection scale
    pub max_ball_velocity: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Lay out a fresh match; rejects invalid settings
    pub fn new(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let arena = settings.arena();
        let paddle_y = arena.height / 2.0 - settings.paddle_height / 2.0;
        let left_x = settings.paddle_margin;
        let right_x = arena.width - settings.paddle_margin - settings.paddle_width;

        let paddle = |x: f32| {
            Paddle::new(
                Vec2::new(x, paddle_y),
                settings.paddle_width,
                settings.paddle_height,
                settings.paddle_velocity,
                &arena,
            )
        };

        Ok(Self {
            arena,
            left_paddle: paddle(left_x),
            right_paddle: paddle(right_x),
            ball: Ball::new(arena.center(), settings.ball_radius, settings.max_ball_velocity),
            score: ScoreTracker::new(settings.winning_score),
            phase: GamePhase::Serving,
            max_ball_velocity: settings.max_ball_velocity,
            time_ticks: 0,
        })
    }

    /// Winner while the match is frozen on the win banner
    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            GamePhase::MatchWon { winner } => Some(winner),
            _ => None,
        }
    }

    /// Start a new match: paddles, ball and scores back to their origins
    pub fn reset_match(&mut self) {
        self.left_paddle.reset();
        self.right_paddle.reset();
        self.ball.reset();
        self.score.reset();
        self.phase = GamePhase::Serving;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arena() -> Arena {
        Arena::new(900.0, 900.0)
    }

    fn paddle_at(y: f32) -> Paddle {
        Paddle::new(Vec2::new(10.0, y), 20.0, 200.0, 7.0, &arena())
    }

    #[test]
    fn test_paddle_moves_by_velocity() {
        let mut paddle = paddle_at(350.0);
        paddle.move_toward(Direction::Up);
        assert_eq!(paddle.pos().y, 343.0);
        paddle.move_toward(Direction::Down);
        paddle.move_toward(Direction::Down);
        assert_eq!(paddle.pos().y, 357.0);
        // x never changes
        assert_eq!(paddle.pos().x, 10.0);
    }

    #[test]
    fn test_paddle_clamps_at_edges() {
        let mut paddle = paddle_at(3.0);
        paddle.move_toward(Direction::Up);
        assert_eq!(paddle.pos().y, 0.0);

        let mut paddle = paddle_at(698.0);
        paddle.move_toward(Direction::Down);
        assert_eq!(paddle.pos().y, 700.0);
    }

    #[test]
    fn test_paddle_reset_is_idempotent() {
        let mut paddle = paddle_at(350.0);
        for _ in 0..10 {
            paddle.move_toward(Direction::Down);
        }
        paddle.reset();
        let first = paddle.pos();
        paddle.reset();
        assert_eq!(paddle.pos(), first);
        assert_eq!(first, Vec2::new(10.0, 350.0));
    }

    #[test]
    fn test_ball_advance_is_unbounded() {
        let mut ball = Ball::new(Vec2::new(5.0, 450.0), 8.0, 8.0);
        ball.set_vel(Vec2::new(-8.0, 2.0));
        ball.advance();
        assert_eq!(ball.pos(), Vec2::new(-3.0, 452.0));
    }

    #[test]
    fn test_ball_reset_alternates_serve() {
        let mut ball = Ball::new(Vec2::new(450.0, 450.0), 8.0, 8.0);
        ball.set_pos(Vec2::new(12.0, 30.0));
        ball.set_vel(Vec2::new(8.0, -5.5));

        ball.reset();
        assert_eq!(ball.pos(), Vec2::new(450.0, 450.0));
        assert_eq!(ball.vel(), Vec2::new(-8.0, 0.0));

        ball.reset();
        assert_eq!(ball.vel(), Vec2::new(8.0, 0.0));
    }

    #[test]
    fn test_score_tracker_win() {
        let mut score = ScoreTracker::new(3);
        assert_eq!(score.record_point(Side::Left), None);
        assert_eq!(score.record_point(Side::Right), None);
        assert_eq!(score.record_point(Side::Left), None);
        assert_eq!(score.record_point(Side::Left), Some(Side::Left));
        assert_eq!(score.get(Side::Left), 3);
        assert_eq!(score.get(Side::Right), 1);

        score.reset();
        assert_eq!((score.left, score.right), (0, 0));
        assert_eq!(score.winner(), None);
    }

    #[test]
    fn test_game_state_layout() {
        let state = GameState::new(&Settings::default()).unwrap();
        assert_eq!(state.left_paddle.pos(), Vec2::new(10.0, 350.0));
        assert_eq!(state.right_paddle.pos(), Vec2::new(870.0, 350.0));
        assert_eq!(state.ball.pos(), Vec2::new(450.0, 450.0));
        assert_eq!(state.ball.vel(), Vec2::new(8.0, 0.0));
        assert_eq!(state.phase, GamePhase::Serving);
    }

    #[test]
    fn test_game_state_rejects_bad_settings() {
        let settings = Settings {
            winning_score: 0,
            ..Default::default()
        };
        assert!(GameState::new(&settings).is_err());
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_in_arena(
            start in 0.0f32..=700.0,
            moves in proptest::collection::vec(any::<bool>(), 1..300),
        ) {
            let mut paddle = paddle_at(start);
            for up in moves {
                paddle.move_toward(if up { Direction::Up } else { Direction::Down });
                prop_assert!(paddle.pos().y >= 0.0);
                prop_assert!(paddle.pos().y <= 900.0 - paddle.height());
            }
        }

        #[test]
        fn prop_ball_reset_flips_and_keeps_speed(
            vx in -8.0f32..8.0,
            vy in -8.0f32..8.0,
            x in -50.0f32..950.0,
            y in 0.0f32..900.0,
        ) {
            let mut ball = Ball::new(Vec2::new(450.0, 450.0), 8.0, 8.0);
            ball.set_pos(Vec2::new(x, y));
            ball.set_vel(Vec2::new(vx, vy));
            ball.reset();
            prop_assert_eq!(ball.vel().x, -vx);
            prop_assert_eq!(ball.vel().y, 0.0);
            prop_assert_eq!(ball.pos(), ball.original_pos());
        }
    }
}
