//! Duel Pong - classic two-player Pong
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddles, ball, collisions, scoring)
//! - `game`: Fixed-rate game loop driving the simulation through a backend
//! - `platform`: Rendering/input backend abstraction and the terminal backend
//! - `renderer`: Scene drawing on top of the backend primitives
//! - `settings`: Validated game configuration

pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::GameLoop;
pub use settings::{Settings, SettingsError};

/// Game configuration defaults
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 900.0;
    pub const ARENA_HEIGHT: f32 = 900.0;

    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 120;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 20.0;
    pub const PADDLE_HEIGHT: f32 = 200.0;
    /// Gap between a paddle and its side wall
    pub const PADDLE_MARGIN: f32 = 10.0;
    /// Vertical distance covered per move command
    pub const PADDLE_VELOCITY: f32 = 7.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Horizontal serve speed, also the cap for deflected vertical speed
    pub const MAX_BALL_VELOCITY: f32 = 8.0;

    /// Points needed to win a match
    pub const WINNING_SCORE: u32 = 3;
    /// Wall-clock pause showing the win banner (milliseconds)
    pub const WIN_DELAY_MS: u64 = 3000;
}
