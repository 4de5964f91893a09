//! Fixed-rate game loop
//!
//! Each iteration runs, in order: throttle, render, close check, input,
//! then one simulation tick (ball, collisions, scoring). A won match parks
//! the loop in a timed banner state that keeps rendering and honoring the
//! close signal until the wall-clock delay runs out.

use std::io;
use std::time::Instant;

use crate::platform::Backend;
use crate::renderer::render_frame;
use crate::settings::{Settings, SettingsError};
use crate::sim::{GameState, Side, TickInput, tick};

/// Where the loop is in the match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Simulation ticking every iteration
    Playing,
    /// Win banner on screen; no input or physics until `until`
    WinBanner { winner: Side, until: Instant },
}

/// Owns the match state and drives it through a backend
pub struct GameLoop<B: Backend> {
    settings: Settings,
    state: GameState,
    backend: B,
    phase: LoopPhase,
    /// Completed iterations
    frames: u64,
}

impl<B: Backend> GameLoop<B> {
    /// Build a match from validated settings
    pub fn new(settings: Settings, backend: B) -> Result<Self, SettingsError> {
        let state = GameState::new(&settings)?;
        Ok(Self {
            settings,
            state,
            backend,
            phase: LoopPhase::Playing,
            frames: 0,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Run until the backend reports a close request
    pub fn run(&mut self) -> io::Result<()> {
        log::info!(
            "Match started: first to {} at {} Hz",
            self.settings.winning_score,
            self.settings.tick_rate
        );
        while self.step()? {}
        log::info!(
            "Closed after {} frames, score {} - {}",
            self.frames,
            self.state.score.left,
            self.state.score.right
        );
        Ok(())
    }

    /// One loop iteration; returns false once a close was requested
    pub fn step(&mut self) -> io::Result<bool> {
        self.backend.sleep_until_next_tick(self.settings.tick_rate);
        render_frame(&mut self.backend, &self.state)?;

        if self.backend.poll_quit_requested()? {
            log::info!("Close requested");
            return Ok(false);
        }

        match self.phase {
            LoopPhase::WinBanner { until, .. } => {
                if self.backend.now() >= until {
                    self.state.reset_match();
                    self.phase = LoopPhase::Playing;
                    log::info!("New match");
                }
            }
            LoopPhase::Playing => {
                let keys = self.backend.pressed_keys()?;
                let events = tick(&mut self.state, &TickInput::from_keys(&keys));

                if let Some(winner) = events.match_won {
                    log::info!(
                        "{} player wins {} - {}",
                        winner.as_str(),
                        self.state.score.left,
                        self.state.score.right
                    );
                    self.phase = LoopPhase::WinBanner {
                        winner,
                        until: self.backend.now() + self.settings.win_delay(),
                    };
                    // Show the banner right away rather than a tick later
                    render_frame(&mut self.backend, &self.state)?;
                }
            }
        }

        self.frames += 1;
        Ok(true)
    }
}
