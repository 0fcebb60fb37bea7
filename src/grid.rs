use crate::sim::SimError;
use crate::{Cell, GridInt};

/// Square toroidal board. Moving off one edge re-enters on the opposite one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grid {
    side: GridInt,
}

impl Grid {
    pub fn new(side: GridInt) -> Result<Self, SimError> {
        if side < 2 {
            return Err(SimError::InvalidGridSize(side));
        }
        Ok(Grid { side })
    }

    pub fn side(&self) -> GridInt {
        self.side
    }

    pub fn cell_count(&self) -> usize {
        self.side as usize * self.side as usize
    }

    /// Every cell of the board, row-major.
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.cell_count());
        for row in 0..self.side {
            for col in 0..self.side {
                cells.push((col, row));
            }
        }
        cells
    }

    pub fn wrap_cell(&self, cell: Cell) -> Cell {
        (wrap(cell.0, self.side), wrap(cell.1, self.side))
    }
}

/// Maps any coordinate into `[0, axis_size)`.
pub fn wrap(coordinate: GridInt, axis_size: GridInt) -> GridInt {
    coordinate.rem_euclid(axis_size)
}
