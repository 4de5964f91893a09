//! Game settings
//!
//! Everything that used to be a process-wide constant lives here and is
//! handed to constructors explicitly. Settings are validated once, before
//! the match starts, so the simulation never sees bad geometry.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Arena;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("tick_rate must be at least 1 Hz")]
    ZeroTickRate,

    #[error("winning_score must be at least 1")]
    ZeroWinningScore,

    #[error("paddle_height ({paddle_height}) does not fit in arena_height ({arena_height})")]
    PaddleTooTall { paddle_height: f32, arena_height: f32 },

    #[error("paddles ({needed} wide including margins) do not fit in arena_width ({arena_width})")]
    PaddlesTooWide { needed: f32, arena_width: f32 },

    #[error("ball diameter ({diameter}) does not fit in arena_height ({arena_height})")]
    BallTooLarge { diameter: f32, arena_height: f32 },

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Timing ===
    /// Simulation and render rate (Hz)
    pub tick_rate: u32,
    /// Win banner duration (milliseconds of wall-clock time)
    pub win_delay_ms: u64,

    // === Paddles ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between each paddle and its side wall
    pub paddle_margin: f32,
    /// Distance moved per held key per tick
    pub paddle_velocity: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Serve speed and deflection scale
    pub max_ball_velocity: f32,

    // === Match ===
    pub winning_score: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            tick_rate: TICK_RATE,
            win_delay_ms: WIN_DELAY_MS,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_margin: PADDLE_MARGIN,
            paddle_velocity: PADDLE_VELOCITY,

            ball_radius: BALL_RADIUS,
            max_ball_velocity: MAX_BALL_VELOCITY,

            winning_score: WINNING_SCORE,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NotPositive { field, value })
    }
}

impl Settings {
    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("paddle_width", self.paddle_width)?;
        positive("paddle_height", self.paddle_height)?;
        positive("paddle_velocity", self.paddle_velocity)?;
        positive("ball_radius", self.ball_radius)?;
        positive("max_ball_velocity", self.max_ball_velocity)?;

        if !self.paddle_margin.is_finite() || self.paddle_margin < 0.0 {
            return Err(SettingsError::NotPositive {
                field: "paddle_margin",
                value: self.paddle_margin,
            });
        }
        if self.tick_rate == 0 {
            return Err(SettingsError::ZeroTickRate);
        }
        if self.winning_score == 0 {
            return Err(SettingsError::ZeroWinningScore);
        }
        if self.paddle_height > self.arena_height {
            return Err(SettingsError::PaddleTooTall {
                paddle_height: self.paddle_height,
                arena_height: self.arena_height,
            });
        }

        let needed = 2.0 * (self.paddle_margin + self.paddle_width);
        if needed >= self.arena_width {
            return Err(SettingsError::PaddlesTooWide {
                needed,
                arena_width: self.arena_width,
            });
        }

        let diameter = 2.0 * self.ball_radius;
        if diameter >= self.arena_height {
            return Err(SettingsError::BallTooLarge {
                diameter,
                arena_height: self.arena_height,
            });
        }

        Ok(())
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Arena bounds
    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    /// Wall-clock length of the win banner pause
    pub fn win_delay(&self) -> Duration {
        Duration::from_millis(self.win_delay_ms)
    }
}
