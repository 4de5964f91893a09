//! Terminal backend (ratatui + crossterm)
//!
//! The arena is drawn on a braille canvas scaled to the terminal, so one
//! arena unit maps to a fraction of a character cell. Canvas coordinates
//! grow upward; everything is flipped on the way in.

use std::collections::{HashMap, HashSet};
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::ExecutableCommand;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::supports_keyboard_enhancement;
use glam::Vec2;
use ratatui::DefaultTerminal;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color as TermColor, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType};

use super::{Backend, Color, FrameClock, Key};
use crate::sim::Arena;

/// How long a key counts as held after its last press/repeat when the
/// terminal cannot report releases
pub const KEY_HOLD_WINDOW: Duration = Duration::from_millis(250);

/// Window title
pub const TITLE: &str = " Pong Game ";

impl From<Color> for TermColor {
    fn from(color: Color) -> Self {
        TermColor::Rgb(color.r, color.g, color.b)
    }
}

/// Map a terminal key code to a game key
pub fn key_from_code(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::W),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::S),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        _ => None,
    }
}

/// Esc, `q` or Ctrl-C close the game
pub fn is_quit(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Held-key bookkeeping from press/repeat/release events
#[derive(Debug)]
pub struct KeyTracker {
    last_seen: HashMap<Key, Instant>,
    /// Terminal reports key releases (keyboard enhancement protocol)
    reports_release: bool,
}

impl KeyTracker {
    pub fn new(reports_release: bool) -> Self {
        Self {
            last_seen: HashMap::new(),
            reports_release,
        }
    }

    pub fn record(&mut self, key: Key, kind: KeyEventKind, now: Instant) {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen.insert(key, now);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&key);
            }
        }
    }

    /// Keys held at `now`
    pub fn held(&mut self, now: Instant) -> HashSet<Key> {
        if !self.reports_release {
            self.last_seen
                .retain(|_, seen| now.saturating_duration_since(*seen) < KEY_HOLD_WINDOW);
        }
        self.last_seen.keys().copied().collect()
    }
}

/// Buffered drawing operation (arena coordinates, y down)
#[derive(Debug, Clone)]
enum DrawCommand {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        color: Color,
    },
}

/// Arena-to-canvas scale for the current terminal size
#[derive(Debug, Clone, Copy)]
struct Projection {
    arena: Arena,
    /// Arena units covered by one braille dot horizontally / vertically
    dot_w: f64,
    dot_h: f64,
    /// Arena units covered by one character cell horizontally
    cell_w: f64,
}

impl Projection {
    fn new(arena: Arena, inner: Rect) -> Self {
        let cols = f64::from(inner.width.max(1));
        let rows = f64::from(inner.height.max(1));
        let width = f64::from(arena.width);
        let height = f64::from(arena.height);
        Self {
            arena,
            dot_w: width / (cols * 2.0),
            dot_h: height / (rows * 4.0),
            cell_w: width / cols,
        }
    }

    /// Flip a screen y into canvas space
    fn y(&self, y: f32) -> f64 {
        f64::from(self.arena.height - y)
    }

    fn fill_rect(&self, ctx: &mut Context, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let left = f64::from(x);
        let right = f64::from(x + width);
        let top = self.y(y);
        let bottom = self.y(y + height);
        let mut col = left;
        while col <= right {
            ctx.draw(&CanvasLine::new(col, bottom, col, top, color.into()));
            col += self.dot_w;
        }
    }

    fn fill_circle(&self, ctx: &mut Context, x: f32, y: f32, radius: f32, color: Color) {
        let step = self.dot_w.min(self.dot_h).max(f64::EPSILON);
        let mut r = f64::from(radius);
        while r > 0.0 {
            ctx.draw(&Circle {
                x: f64::from(x),
                y: self.y(y),
                radius: r,
                color: color.into(),
            });
            r -= step;
        }
        // Single dot for balls smaller than a braille cell
        ctx.draw(&CanvasLine::new(
            f64::from(x),
            self.y(y),
            f64::from(x),
            self.y(y),
            color.into(),
        ));
    }

    fn print(&self, ctx: &mut Context, text: &str, pos: Vec2, color: Color) {
        let chars = text.chars().count() as f64;
        let x = f64::from(pos.x) - chars * self.cell_w / 2.0;
        let x = x.clamp(0.0, f64::from(self.arena.width));
        let line = Line::styled(text.to_string(), Style::default().fg(color.into()));
        ctx.print(x, self.y(pos.y), line);
    }
}

/// Full-screen terminal backend
pub struct TerminalBackend {
    terminal: DefaultTerminal,
    arena: Arena,
    background: Color,
    commands: Vec<DrawCommand>,
    keys: KeyTracker,
    quit: bool,
    clock: FrameClock,
    enhanced_keyboard: bool,
}

impl TerminalBackend {
    /// Enter raw mode and the alternate screen; restored on drop
    pub fn new(arena: Arena) -> io::Result<Self> {
        let terminal = ratatui::try_init()?;
        // From here on Drop restores the terminal, even if setup fails below
        let mut backend = Self {
            terminal,
            arena,
            background: Color::BLACK,
            commands: Vec::new(),
            keys: KeyTracker::new(false),
            quit: false,
            clock: FrameClock::new(),
            enhanced_keyboard: false,
        };

        if supports_keyboard_enhancement().unwrap_or(false) {
            stdout().execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
            backend.enhanced_keyboard = true;
            backend.keys = KeyTracker::new(true);
            log::info!("Terminal reports key releases");
        } else {
            log::warn!(
                "Terminal cannot report key releases; keys count as held for {:?} after each press",
                KEY_HOLD_WINDOW
            );
        }

        Ok(backend)
    }

    /// Read every pending terminal event without blocking
    fn pump_events(&mut self) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if is_quit(&key) {
                    self.quit = true;
                } else if let Some(game_key) = key_from_code(key.code) {
                    self.keys.record(game_key, key.kind, Instant::now());
                }
            }
        }
        Ok(())
    }
}

impl Drop for TerminalBackend {
    fn drop(&mut self) {
        if self.enhanced_keyboard {
            let _ = stdout().execute(PopKeyboardEnhancementFlags);
        }
        ratatui::restore();
    }
}

impl Backend for TerminalBackend {
    fn fill_background(&mut self, color: Color) {
        self.background = color;
        self.commands.clear();
    }

    fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            x,
            y,
            radius,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            color,
        });
    }

    fn present_frame(&mut self) -> io::Result<()> {
        let arena = self.arena;
        let background = self.background;
        let commands = &self.commands;

        self.terminal.draw(|frame| {
            let block = Block::bordered()
                .border_type(BorderType::Rounded)
                .title(TITLE)
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(Color::WHITE.into()).bg(background.into()));
            let projection = Projection::new(arena, block.inner(frame.area()));

            let canvas = Canvas::default()
                .block(block)
                .marker(Marker::Braille)
                .background_color(background.into())
                .x_bounds([0.0, f64::from(arena.width)])
                .y_bounds([0.0, f64::from(arena.height)])
                .paint(|ctx| {
                    for command in commands {
                        match command {
                            DrawCommand::Rect {
                                x,
                                y,
                                width,
                                height,
                                color,
                            } => projection.fill_rect(ctx, *x, *y, *width, *height, *color),
                            DrawCommand::Circle {
                                x,
                                y,
                                radius,
                                color,
                            } => projection.fill_circle(ctx, *x, *y, *radius, *color),
                            DrawCommand::Text { text, pos, color } => {
                                projection.print(ctx, text, *pos, *color)
                            }
                        }
                    }
                });
            frame.render_widget(canvas, frame.area());
        })?;
        Ok(())
    }

    fn poll_quit_requested(&mut self) -> io::Result<bool> {
        self.pump_events()?;
        Ok(self.quit)
    }

    fn pressed_keys(&mut self) -> io::Result<HashSet<Key>> {
        self.pump_events()?;
        Ok(self.keys.held(Instant::now()))
    }

    fn sleep_until_next_tick(&mut self, tick_rate: u32) {
        self.clock.tick(tick_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_from_code(KeyCode::Char('w')), Some(Key::W));
        assert_eq!(key_from_code(KeyCode::Char('S')), Some(Key::S));
        assert_eq!(key_from_code(KeyCode::Up), Some(Key::Up));
        assert_eq!(key_from_code(KeyCode::Down), Some(Key::Down));
        assert_eq!(key_from_code(KeyCode::Left), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_tracker_with_release_events() {
        let mut keys = KeyTracker::new(true);
        let start = Instant::now();
        keys.record(Key::W, KeyEventKind::Press, start);
        keys.record(Key::Up, KeyEventKind::Press, start);

        // No expiry while releases are reported
        let later = start + Duration::from_secs(5);
        assert_eq!(keys.held(later), HashSet::from([Key::W, Key::Up]));

        keys.record(Key::W, KeyEventKind::Release, later);
        assert_eq!(keys.held(later), HashSet::from([Key::Up]));
    }

    #[test]
    fn test_tracker_hold_window_fallback() {
        let mut keys = KeyTracker::new(false);
        let start = Instant::now();
        keys.record(Key::S, KeyEventKind::Press, start);
        assert!(keys.held(start + Duration::from_millis(100)).contains(&Key::S));

        // A repeat extends the hold
        keys.record(Key::S, KeyEventKind::Repeat, start + Duration::from_millis(200));
        assert!(keys.held(start + Duration::from_millis(400)).contains(&Key::S));

        assert!(keys.held(start + Duration::from_millis(500)).is_empty());
    }

    #[test]
    fn test_projection_flips_y() {
        let projection = Projection::new(Arena::new(900.0, 900.0), Rect::new(0, 0, 90, 45));
        assert_eq!(projection.y(0.0), 900.0);
        assert_eq!(projection.y(900.0), 0.0);
        assert_eq!(projection.cell_w, 10.0);
        assert_eq!(projection.dot_w, 5.0);
        assert_eq!(projection.dot_h, 5.0);
    }
}
