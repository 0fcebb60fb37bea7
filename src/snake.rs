use crate::grid::Grid;
use crate::{Cell, GridInt};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Unit step as `(d_col, d_row)`. Rows grow downwards.
    pub fn delta(self) -> (GridInt, GridInt) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

/// Next pending direction: `requested` unless it would reverse `current`,
/// in which case the already latched `pending` stands.
pub fn propose(requested: Direction, current: Direction, pending: Direction) -> Direction {
    if requested == current.opposite() {
        pending
    } else {
        requested
    }
}

/// Head plus trailing segments. `body[0]` sits right behind the head.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    head: Cell,
    direction: Direction,
    body: Vec<Cell>,
}

impl Snake {
    pub fn new(head: Cell, direction: Direction) -> Self {
        Snake { head, direction, body: vec![] }
    }

    pub fn head(&self) -> Cell {
        self.head
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Head and body, head first.
    pub fn occupied(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.body.len() + 1);
        cells.push(self.head);
        cells.extend_from_slice(&self.body);
        cells
    }

    /// Adds a segment on top of the current tail. It separates from the tail
    /// on the next shift.
    pub fn grow(&mut self) {
        let tail = *self.body.last().unwrap_or(&self.head);
        self.body.push(tail);
    }

    /// Moves every segment one place towards the head.
    pub fn shift(&mut self) {
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        if let Some(first) = self.body.first_mut() {
            *first = self.head;
        }
    }

    /// Steps the head along the current direction, wrapping at the edges.
    pub fn advance(&mut self, grid: &Grid) {
        let (dc, dr) = self.direction.delta();
        self.head = grid.wrap_cell((self.head.0 + dc, self.head.1 + dr));
    }

    #[cfg(test)]
    pub(crate) fn with_body(head: Cell, direction: Direction, body: Vec<Cell>) -> Self {
        Snake { head, direction, body }
    }
}
