//! Fixed timestep simulation tick
//!
//! One call advances the match by exactly one tick: paddle moves, ball
//! motion, collisions, then scoring.

use std::collections::HashSet;

use super::collision::{CollisionResult, resolve_collisions};
use super::state::{Direction, GamePhase, GameState, Side};
use crate::platform::Key;

/// Held movement keys for one paddle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleInput {
    pub up: bool,
    pub down: bool,
}

impl PaddleInput {
    /// Move commands in application order (up first, then down)
    fn commands(&self) -> impl Iterator<Item = Direction> {
        let up = self.up.then_some(Direction::Up);
        let down = self.down.then_some(Direction::Down);
        up.into_iter().chain(down)
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: PaddleInput,
    pub right: PaddleInput,
}

impl TickInput {
    /// Map the currently held keys: W/S drive the left paddle, Up/Down the right
    pub fn from_keys(keys: &HashSet<Key>) -> Self {
        Self {
            left: PaddleInput {
                up: keys.contains(&Key::W),
                down: keys.contains(&Key::S),
            },
            right: PaddleInput {
                up: keys.contains(&Key::Up),
                down: keys.contains(&Key::Down),
            },
        }
    }
}

/// Everything that happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub collision: CollisionResult,
    /// Side credited with a point
    pub scored: Option<Side>,
    /// Side that won the match with this point
    pub match_won: Option<Side>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> TickEvents {
    let mut events = TickEvents::default();

    // Frozen until the loop resets the match
    if let GamePhase::MatchWon { .. } = state.phase {
        return events;
    }

    state.time_ticks += 1;
    state.phase = GamePhase::InPlay;

    for direction in input.left.commands() {
        state.left_paddle.move_toward(direction);
    }
    for direction in input.right.commands() {
        state.right_paddle.move_toward(direction);
    }

    state.ball.advance();

    events.collision = resolve_collisions(
        &mut state.ball,
        &state.left_paddle,
        &state.right_paddle,
        &state.arena,
        state.max_ball_velocity,
    );

    if let Some(side) = check_scoring(state) {
        events.scored = Some(side);
        state.ball.reset();
        state.phase = GamePhase::Serving;
        log::debug!(
            "{} player scores ({} - {})",
            side.as_str(),
            state.score.left,
            state.score.right
        );

        if let Some(winner) = state.score.winner() {
            events.match_won = Some(winner);
            state.phase = GamePhase::MatchWon { winner };
        }
    }

    events
}

/// Credit a point if the ball left the arena sideways
///
/// Past the left edge the right player scores; past the right edge the left
/// player scores.
pub fn check_scoring(state: &mut GameState) -> Option<Side> {
    let x = state.ball.pos().x;
    let side = if x < 0.0 {
        Side::Right
    } else if x > state.arena.width {
        Side::Left
    } else {
        return None;
    };
    state.score.record_point(side);
    Some(side)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::settings::Settings;

    fn new_state() -> GameState {
        GameState::new(&Settings::default()).unwrap()
    }

    fn keys(list: &[Key]) -> HashSet<Key> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_tick_serve_to_in_play() {
        let mut state = new_state();
        assert_eq!(state.phase, GamePhase::Serving);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::InPlay);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.ball.pos(), Vec2::new(458.0, 450.0));
    }

    #[test]
    fn test_input_mapping() {
        let input = TickInput::from_keys(&keys(&[Key::W, Key::Down]));
        assert_eq!(input.left, PaddleInput { up: true, down: false });
        assert_eq!(input.right, PaddleInput { up: false, down: true });
    }

    #[test]
    fn test_both_players_move_in_same_tick() {
        let mut state = new_state();
        let input = TickInput::from_keys(&keys(&[Key::S, Key::Up]));
        tick(&mut state, &input);
        assert_eq!(state.left_paddle.pos().y, 357.0);
        assert_eq!(state.right_paddle.pos().y, 343.0);
    }

    #[test]
    fn test_opposing_keys_apply_sequentially() {
        let mut state = new_state();
        let input = TickInput::from_keys(&keys(&[Key::W, Key::S]));
        tick(&mut state, &input);
        assert_eq!(state.left_paddle.pos().y, 350.0);

        // At the top edge the up move clamps, so the down move still lands
        state.left_paddle.set_y(0.0);
        tick(&mut state, &input);
        assert_eq!(state.left_paddle.pos().y, 7.0);
    }

    #[test]
    fn test_ball_past_left_edge_scores_right() {
        let mut state = new_state();
        state.ball.set_pos(Vec2::new(-1.0, 100.0));
        state.ball.set_vel(Vec2::new(-8.0, 3.0));

        assert_eq!(check_scoring(&mut state), Some(Side::Right));
        assert_eq!(state.score.right, 1);
        assert_eq!(state.score.left, 0);
    }

    #[test]
    fn test_point_resets_ball_to_center() {
        let mut state = new_state();
        // Lands at x = -1 after advancing, well above the left paddle
        state.ball.set_pos(Vec2::new(7.0, 100.0));
        state.ball.set_vel(Vec2::new(-8.0, 0.0));

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events.scored, Some(Side::Right));
        assert_eq!(events.match_won, None);
        assert_eq!(state.score.right, 1);
        assert_eq!(state.ball.pos(), Vec2::new(450.0, 450.0));
        assert_eq!(state.ball.vel(), Vec2::new(8.0, 0.0));
        assert_eq!(state.phase, GamePhase::Serving);
    }

    #[test]
    fn test_ball_past_right_edge_scores_left() {
        let mut state = new_state();
        state.ball.set_pos(Vec2::new(895.0, 100.0));
        state.ball.set_vel(Vec2::new(8.0, 0.0));

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events.scored, Some(Side::Left));
        assert_eq!(state.score.left, 1);
        assert_eq!(state.ball.vel(), Vec2::new(-8.0, 0.0));
    }

    #[test]
    fn test_ball_on_edge_does_not_score() {
        let mut state = new_state();
        state.ball.set_pos(Vec2::new(0.0, 100.0));
        assert_eq!(check_scoring(&mut state), None);
        state.ball.set_pos(Vec2::new(900.0, 100.0));
        assert_eq!(check_scoring(&mut state), None);
    }

    #[test]
    fn test_winning_point_freezes_match() {
        let mut state = new_state();
        state.score.left = 2;
        state.ball.set_pos(Vec2::new(895.0, 100.0));
        state.ball.set_vel(Vec2::new(8.0, 0.0));

        let events = tick(&mut state, &TickInput::default());
        assert_eq!(events.match_won, Some(Side::Left));
        assert_eq!(state.phase, GamePhase::MatchWon { winner: Side::Left });
        assert_eq!(state.winner(), Some(Side::Left));
        assert_eq!(state.score.left, 3);

        // Frozen: no physics, no input, no tick count
        let ball = state.ball.pos();
        let ticks = state.time_ticks;
        let input = TickInput::from_keys(&keys(&[Key::S]));
        assert_eq!(tick(&mut state, &input), TickEvents::default());
        assert_eq!(state.ball.pos(), ball);
        assert_eq!(state.left_paddle.pos().y, 350.0);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_reset_match_restores_everything() {
        let mut state = new_state();
        let input = TickInput::from_keys(&keys(&[Key::W, Key::Down]));
        for _ in 0..20 {
            tick(&mut state, &input);
        }
        state.score.left = 3;
        state.phase = GamePhase::MatchWon { winner: Side::Left };

        state.reset_match();
        assert_eq!((state.score.left, state.score.right), (0, 0));
        assert_eq!(state.left_paddle.pos(), state.left_paddle.original_pos());
        assert_eq!(state.right_paddle.pos(), state.right_paddle.original_pos());
        assert_eq!(state.ball.pos(), Vec2::new(450.0, 450.0));
        assert_eq!(state.phase, GamePhase::Serving);
    }

    #[test]
    fn test_rally_returns_off_paddle() {
        let mut state = new_state();
        // Serve toward the right paddle and let it come back
        let mut hit = None;
        for _ in 0..100 {
            let events = tick(&mut state, &TickInput::default());
            if let Some(side) = events.collision.paddle {
                hit = Some(side);
                break;
            }
        }
        assert_eq!(hit, Some(Side::Right));
        assert!(state.ball.vel().x < 0.0);
        // Center hit on a centered paddle keeps the ball flat
        assert!(state.ball.vel().y.abs() < 1e-5);
    }
}
