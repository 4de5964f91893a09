//! Platform abstraction layer
//!
//! The game loop only talks to a [`Backend`]: drawing primitives in arena
//! coordinates, the set of held keys, the close signal and the frame-rate
//! throttle. [`terminal::TerminalBackend`] is the shipped implementation.

pub mod terminal;

use std::collections::HashSet;
use std::io;
use std::thread::sleep;
use std::time::{Duration, Instant};

use glam::Vec2;

pub use terminal::TerminalBackend;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Left paddle up
    W,
    /// Left paddle down
    S,
    /// Right paddle up
    Up,
    /// Right paddle down
    Down,
}

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Rendering and input services consumed by the game loop
///
/// Drawing calls are buffered until [`Backend::present_frame`]. Positions
/// and sizes are in arena units with y growing downward.
pub trait Backend {
    /// Start a frame covered in `color`, discarding anything drawn so far
    fn fill_background(&mut self, color: Color);

    /// Filled rectangle with its top-left corner at (x, y)
    fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// Filled circle centered at (x, y)
    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);

    /// Single line of text, horizontally centered on `pos.x` with its top at `pos.y`
    fn draw_text(&mut self, text: &str, pos: Vec2, color: Color);

    /// Show everything drawn since the last `fill_background`
    fn present_frame(&mut self) -> io::Result<()>;

    /// Drain pending window/terminal events; true once a close was requested
    fn poll_quit_requested(&mut self) -> io::Result<bool>;

    /// Keys currently held down
    fn pressed_keys(&mut self) -> io::Result<HashSet<Key>>;

    /// Block until the next tick at `tick_rate` Hz is due
    fn sleep_until_next_tick(&mut self, tick_rate: u32);

    /// Clock used for timed states such as the win banner
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Frame-rate limiter
///
/// Like a game clock tick: each call waits out whatever remains of the
/// period since the previous call. A slow frame is not paid back later.
#[derive(Debug, Default)]
pub struct FrameClock {
    last_tick: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_tick: None }
    }

    /// Time left before the next tick is due
    pub fn remaining(&self, now: Instant, period: Duration) -> Duration {
        match self.last_tick {
            Some(last) => period.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Record a tick at `now`
    pub fn mark(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    /// Sleep until the next tick at `tick_rate` Hz, then mark it
    pub fn tick(&mut self, tick_rate: u32) {
        let period = Duration::from_secs(1) / tick_rate.max(1);
        let wait = self.remaining(Instant::now(), period);
        if !wait.is_zero() {
            sleep(wait);
        }
        self.mark(Instant::now());
    }
}
