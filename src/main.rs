mod collision;
mod config;
mod food;
mod game;
mod grid;
mod sim;
mod snake;
mod term;
mod timestep;

use std::{fs::File, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub type TermInt = u16;
pub type Coords = (u16, u16);

pub type GridInt = i32;
pub type Cell = (GridInt, GridInt);

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let mut game = game::SnakeGame::new(&config)?;

    // Setup can fail halfway, so the terminal is handed back either way
    let res = game.initialize().and_then(|_| game.run());
    let restored = game.shutdown();
    first_error(res, restored)
}

/// Keeps the game's own failure over a later one from restoring the terminal.
fn first_error(res: Result<()>, restored: Result<()>) -> Result<()> {
    match (res, restored) {
        (Err(err), Err(restore_err)) => {
            Err(err.context(format!("terminal could not be restored either: {:#}", restore_err)))
        }
        (res, restored) => res.and(restored),
    }
}

/// The terminal is busy drawing the board, so logs only go to a file.
fn init_logging(config: &Config) -> Result<()> {
    let path = match &config.log_file {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("torus_snake=info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
