use std::{cmp::max, thread::sleep, time::{Duration, Instant}};

use anyhow::{bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::config::Config;
use crate::grid::Grid;
use crate::sim::{Simulation, Snapshot, TickEvent};
use crate::snake::Direction::{self, *};
use crate::term::TermManager;
use crate::timestep::FixedTimestep;
use crate::{Cell, Coords, TermInt};

const FRAME_INTERVAL_MS: u64 = 5;

// Every cell is two columns wide so the board comes out roughly square
const SNAKE_BODY: &str = "██";
const FOOD: &str = "()";
const EMPTY: &str = "  ";

// Widest status line: "Score: {:<6} Last: {:<6}"
const STATUS_WIDTH: TermInt = 26;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct SnakeGame {
    term: TermManager,
    sim: Simulation,
    timestep: FixedTimestep,
    paused: bool,
    last_drawn: Option<Snapshot>,
    last_score: Option<u32>,
}

impl SnakeGame {
    pub fn new(config: &Config) -> Result<Self> {
        let grid = Grid::new(config.grid_size)?;
        let term = TermManager::new().context("reading terminal size")?;

        let needed = board_size(&grid);
        let (w, h) = term.get_terminal_size();
        if w < needed.0 || h < needed.1 {
            bail!(
                "a {0}x{0} grid needs a {1}x{2} terminal, this one is {3}x{4}",
                grid.side(), needed.0, needed.1, w, h
            );
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, side = grid.side(), step_ms = config.step_ms, "new game");

        Ok(SnakeGame {
            term,
            sim: Simulation::with_seed(grid, seed),
            timestep: FixedTimestep::new(config.step(), config.max_catch_up, Instant::now()),
            paused: false,
            last_drawn: None,
            last_score: None,
        })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup().context("preparing terminal")
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.term.restore().context("restoring terminal")
    }

    pub fn run(&mut self) -> Result<()> {
        if self.show_intro()? == Flow::Quit {
            return Ok(());
        }
        self.play()
    }

    pub fn show_intro(&mut self) -> Result<Flow> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to play"
        ];

        self.term.show_message(lines)?;
        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;

        Ok(if is_ctrl_c(&key) { Flow::Quit } else { Flow::Continue })
    }

    /// Runs until the player quits. Lives end and restart on their own.
    pub fn play(&mut self) -> Result<()> {
        self.sim.reset();
        self.term.clear()?;
        self.term.draw_borders(board_border(self.sim.grid()))?;
        self.last_drawn = None;
        self.render()?;
        self.timestep.resync(Instant::now());

        loop {
            sleep(Duration::from_millis(FRAME_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                if self.handle_key(&key_ev)? == Flow::Quit {
                    return Ok(());
                }
            }

            if self.paused { continue; }

            for _ in 0..self.timestep.due_steps(Instant::now()) {
                for ev in self.sim.tick() {
                    self.on_event(ev);
                }
            }

            self.render()?;
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn handle_key(&mut self, key_ev: &KeyEvent) -> Result<Flow> {
        if is_ctrl_c(key_ev) {
            return Ok(Flow::Quit);
        }

        if key_ev.code == KeyCode::Esc {
            self.toggle_pause()?;
        } else if let Some(dir) = key_direction(&key_ev.code) {
            if !self.paused {
                self.sim.request_direction(dir);
            }
        }

        Ok(Flow::Continue)
    }

    fn on_event(&mut self, ev: TickEvent) {
        match ev {
            TickEvent::ScoreIncrement { score } => debug!(score, "food eaten"),
            TickEvent::Reset { cause, final_score } => {
                info!(?cause, final_score, ticks = self.sim.ticks(), "life over");
                self.last_score = Some(final_score);
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        let snap = self.sim.snapshot();
        if self.last_drawn.as_ref() == Some(&snap) {
            return Ok(());
        }

        if let Some(prev) = self.last_drawn.take() {
            let ends = [prev.head, prev.food];
            for cell in prev.body.iter().chain(ends.iter()) {
                if !covers(&snap, *cell) {
                    self.draw_cell(*cell, EMPTY)?;
                }
            }
        }

        self.draw_cell(snap.food, FOOD)?;
        for cell in snap.body.iter() {
            self.draw_cell(*cell, SNAKE_BODY)?;
        }
        self.draw_cell(snap.head, head_str(snap.direction))?;

        let status = status_line(snap.score, self.last_score);
        let (_, border_h) = board_border(self.sim.grid());
        self.term.print_str_at((0, border_h), &status)?;

        self.term.flush()?;
        self.last_drawn = Some(snap);
        Ok(())
    }

    fn draw_cell(&mut self, cell: Cell, text: &str) -> Result<()> {
        self.term.print_str_at(cell_origin(cell), text)?;
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
            self.timestep.resync(Instant::now());
        }

        self.paused = !self.paused;
        Ok(())
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

fn key_direction(code: &KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

fn head_str(direction: Direction) -> &'static str {
    match direction {
        Up => "^^",
        Down => "vv",
        Left => "<<",
        Right => ">>",
    }
}

fn covers(snap: &Snapshot, cell: Cell) -> bool {
    snap.head == cell || snap.food == cell || snap.body.contains(&cell)
}

fn status_line(score: u32, last_score: Option<u32>) -> String {
    match last_score {
        Some(last) => format!("Score: {:<6} Last: {:<6}", score, last),
        None => format!("Score: {:<6}", score),
    }
}

/// Terminal position of a cell's left column, inside the border.
fn cell_origin((col, row): Cell) -> Coords {
    (1 + 2 * col as TermInt, 1 + row as TermInt)
}

fn board_border(grid: &Grid) -> Coords {
    let side = grid.side() as TermInt;
    (2 * side + 2, side + 2)
}

/// Border plus the status line underneath.
fn board_size(grid: &Grid) -> Coords {
    let (w, h) = board_border(grid);
    (max(w, STATUS_WIDTH), h + 1)
}
