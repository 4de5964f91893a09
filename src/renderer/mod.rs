//! Scene rendering
//!
//! Turns a `GameState` into backend draw calls. Layout is relative to the
//! arena so any arena size keeps the classic look.

use std::io;

use glam::Vec2;

use crate::platform::{Backend, Color};
use crate::sim::{GameState, Paddle, Side};

pub const BACKGROUND: Color = Color::BLACK;
pub const FOREGROUND: Color = Color::WHITE;

/// Distance from the top edge to the score digits
pub const SCORE_TOP: f32 = 20.0;
/// Centerline dash width
pub const DASH_WIDTH: f32 = 10.0;
/// Offset of the first centerline dash
pub const DASH_START: f32 = 10.0;

/// Banner text shown when `side` wins the match
pub fn win_message(side: Side) -> String {
    format!("{} Player Wins!", side.as_str())
}

/// Draw and present one frame, with the win banner on top while the match is won
pub fn render_frame<B: Backend>(backend: &mut B, state: &GameState) -> io::Result<()> {
    backend.fill_background(BACKGROUND);

    draw_scores(backend, state);
    draw_paddle(backend, &state.left_paddle);
    draw_paddle(backend, &state.right_paddle);

    let ball = state.ball.pos();
    backend.draw_circle(ball.x, ball.y, state.ball.radius(), FOREGROUND);

    draw_centerline(backend, state.arena.width, state.arena.height);

    if let Some(winner) = state.winner() {
        let center = state.arena.center();
        backend.draw_text(&win_message(winner), center, FOREGROUND);
    }

    backend.present_frame()
}

fn draw_scores<B: Backend>(backend: &mut B, state: &GameState) {
    let width = state.arena.width;
    backend.draw_text(
        &state.score.left.to_string(),
        Vec2::new(width / 4.0, SCORE_TOP),
        FOREGROUND,
    );
    backend.draw_text(
        &state.score.right.to_string(),
        Vec2::new(width * 3.0 / 4.0, SCORE_TOP),
        FOREGROUND,
    );
}

fn draw_paddle<B: Backend>(backend: &mut B, paddle: &Paddle) {
    let pos = paddle.pos();
    backend.draw_rectangle(pos.x, pos.y, paddle.width(), paddle.height(), FOREGROUND);
}

/// Dashes one twentieth of the arena tall, separated by gaps of the same height
fn draw_centerline<B: Backend>(backend: &mut B, width: f32, height: f32) {
    let dash = (height / 20.0).floor().max(1.0);
    let x = width / 2.0 - DASH_WIDTH / 2.0;
    let mut y = DASH_START;
    while y < height {
        backend.draw_rectangle(x, y, DASH_WIDTH, dash, FOREGROUND);
        y += dash * 2.0;
    }
}
