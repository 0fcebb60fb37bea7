use crate::Cell;

/// The head against trailing segments only.
pub fn self_collision(head: Cell, body: &[Cell]) -> bool {
    body.contains(&head)
}

pub fn food_collision(head: Cell, food: Cell) -> bool {
    head == food
}
