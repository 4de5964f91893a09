//! Duel Pong entry point
//!
//! Sets up logging and the terminal backend, then runs the game loop until
//! the players close it (Esc, `q` or Ctrl-C).

use std::io;

use duel_pong::platform::TerminalBackend;
use duel_pong::{GameLoop, Settings};

fn main() -> io::Result<()> {
    // Logs go to stderr; redirect it (`2>pong.log`) to keep the screen clean
    env_logger::init();
    log::info!("Duel Pong starting...");

    let settings = Settings::default();
    settings
        .validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    match settings.to_json() {
        Ok(json) => log::debug!("Settings: {}", json),
        Err(e) => log::warn!("Could not serialize settings: {}", e),
    }

    let backend = TerminalBackend::new(settings.arena())?;
    let mut game = GameLoop::new(settings, backend)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let result = game.run();
    let (left, right) = (game.state().score.left, game.state().score.right);
    // Dropping the backend restores the terminal before anything is printed
    drop(game);

    match &result {
        Ok(()) => println!("Thanks for playing! Final score: {} - {}", left, right),
        Err(e) => eprintln!("Game ended with error: {}", e),
    }

    result
}
