use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::trace;

use crate::Cell;

/// The snake covers every cell, there is nowhere left to put food.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
#[error("no free cell left for food")]
pub struct BoardFull;

/// Picks a cell uniformly among those of `all_cells` not in `occupied`.
pub fn place<R: Rng + ?Sized>(occupied: &[Cell], all_cells: &[Cell], rng: &mut R) -> Result<Cell, BoardFull> {
    let choices: Vec<&Cell> = all_cells.iter().filter(|pos| !occupied.contains(pos)).collect();
    let food = choices.choose(rng).copied().copied().ok_or(BoardFull)?;

    trace!(?food, free = choices.len(), "placed food");
    Ok(food)
}
