use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::GridInt;

#[derive(Parser, Debug, Clone)]
#[command(name = "torus-snake")]
#[command(about = "Snake on a wraparound grid, in the terminal")]
pub struct Config {
    /// Cells per side of the square grid
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(i32).range(2..=200))]
    pub grid_size: GridInt,
    /// Simulation timestep in milliseconds
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
    pub step_ms: u64,
    /// Seed for snake and food placement; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,
    /// Most simulation steps run for a single frame before the backlog is dropped
    #[arg(long, default_value_t = 240, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_catch_up: u32,
    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }
}
