//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per tick, no wall-clock reads
//! - No rendering or platform calls (input arrives as `TickInput`)

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, deflection, resolve_collisions};
pub use state::{Arena, Ball, Direction, GamePhase, GameState, Paddle, ScoreTracker, Side};
pub use tick::{PaddleInput, TickEvents, TickInput, check_scoring, tick};
