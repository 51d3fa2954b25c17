mod game;
mod grid;
mod item;
mod scores;
mod session;
mod snake;
mod term;

use std::fs::File;

use anyhow::{Context, Result};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::game::SnakeGame;

pub type TermInt = u16;
pub type Coords = (u16, u16);

const LOG_FILE: &str = "cybersnake.log";

fn main() -> Result<()> {
    init_logging()?;
    info!("starting cybersnake");

    let mut game = SnakeGame::new()?;
    // The game loop takes care of exiting cleanly on user request
    game.run()
}

fn init_logging() -> Result<()> {
    // Stdout belongs to the game grid, so logs go to a file
    let log_file = File::create(LOG_FILE)
        .with_context(|| format!("could not create log file {}", LOG_FILE))?;
    WriteLogger::init(LevelFilter::Info, Config::default(), log_file)?;
    Ok(())
}
