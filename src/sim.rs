use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::collision::{food_collision, self_collision};
use crate::food::{self, BoardFull};
use crate::grid::Grid;
use crate::snake::{self, Direction, Snake};
use crate::{Cell, GridInt};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("grid side must be at least 2 cells, got {0}")]
    InvalidGridSize(GridInt),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResetCause {
    SelfCollision,
    BoardFull,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickEvent {
    ScoreIncrement { score: u32 },
    Reset { cause: ResetCause, final_score: u32 },
}

/// Read-only view of one committed state, handed to renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub head: Cell,
    pub direction: Direction,
    pub body: Vec<Cell>,
    pub food: Cell,
    pub score: u32,
}

/// One game instance: everything that lives from one reset to the next.
pub struct Simulation<R = ChaCha8Rng> {
    grid: Grid,
    cells: Vec<Cell>,
    rng: R,
    snake: Snake,
    pending: Direction,
    food: Cell,
    score: u32,
    ticks: u64,
}

impl Simulation<ChaCha8Rng> {
    pub fn with_seed(grid: Grid, seed: u64) -> Self {
        Simulation::new(grid, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    pub fn new(grid: Grid, rng: R) -> Self {
        let mut sim = Simulation {
            grid,
            cells: grid.cells(),
            rng,
            snake: Snake::new((0, 0), Direction::Up),
            pending: Direction::Up,
            food: (0, 0),
            score: 0,
            ticks: 0,
        };
        sim.reset();
        sim
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Starts a new life: random head facing up, no body, zero score.
    pub fn reset(&mut self) {
        let side = self.grid.side();
        let head = (self.rng.gen_range(0..side), self.rng.gen_range(0..side));

        self.snake = Snake::new(head, Direction::Up);
        self.pending = Direction::Up;
        self.score = 0;
        // A grid holds at least two cells, so only the head can be taken.
        self.food = food::place(&[head], &self.cells, &mut self.rng).unwrap_or(head);
    }

    /// Only ever touches the pending direction; `tick` commits it.
    pub fn request_direction(&mut self, direction: Direction) -> Direction {
        self.pending = snake::propose(direction, self.snake.direction(), self.pending);
        self.pending
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            head: self.snake.head(),
            direction: self.snake.direction(),
            body: self.snake.body().to_vec(),
            food: self.food,
            score: self.score,
        }
    }

    /// Advances the game by one step. Collisions are judged on the position
    /// the head already holds, before anything moves.
    #[instrument(level = "trace", skip_all, fields(tick = self.ticks))]
    pub fn tick(&mut self) -> Vec<TickEvent> {
        self.ticks += 1;
        let mut events = vec![];

        self.snake.set_direction(self.pending);

        if self_collision(self.snake.head(), self.snake.body()) {
            events.push(self.end_life(ResetCause::SelfCollision));
            return events;
        }

        if food_collision(self.snake.head(), self.food) {
            self.snake.grow();
            match food::place(&self.snake.occupied(), &self.cells, &mut self.rng) {
                Ok(food) => self.food = food,
                Err(BoardFull) => {
                    events.push(self.end_life(ResetCause::BoardFull));
                    return events;
                }
            }
            self.score += 1;
            events.push(TickEvent::ScoreIncrement { score: self.score });
        }

        self.snake.shift();
        self.snake.advance(&self.grid);
        events
    }

    fn end_life(&mut self, cause: ResetCause) -> TickEvent {
        let final_score = self.score;
        debug!(?cause, final_score, length = self.snake.body().len(), "resetting");
        self.reset();
        TickEvent::Reset { cause, final_score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;

    const TURNS: [Direction; 4] = [Up, Right, Down, Left];

    fn sim(side: GridInt, seed: u64) -> Simulation {
        Simulation::with_seed(Grid::new(side).unwrap(), seed)
    }

    fn place_snake(sim: &mut Simulation, head: Cell, direction: Direction, body: Vec<Cell>) {
        sim.snake = Snake::with_body(head, direction, body);
        sim.pending = direction;
    }

    fn is_reset(events: &[TickEvent]) -> bool {
        events.iter().any(|ev| matches!(ev, TickEvent::Reset { .. }))
    }

    #[test]
    fn fresh_game_starts_facing_up_with_no_body() {
        let sim = sim(20, 3);
        let snap = sim.snapshot();
        assert_eq!(snap.direction, Up);
        assert!(snap.body.is_empty());
        assert_eq!(snap.score, 0);
        assert_ne!(snap.food, snap.head);
    }

    #[test]
    fn food_is_eaten_on_the_tick_after_arriving() {
        let mut sim = sim(4, 11);
        place_snake(&mut sim, (0, 0), Right, vec![]);
        sim.food = (1, 0);

        let events = sim.tick();
        assert!(events.is_empty());
        let snap = sim.snapshot();
        assert_eq!(snap.head, (1, 0));
        assert!(snap.body.is_empty());
        assert_eq!(snap.score, 0);

        let events = sim.tick();
        assert_eq!(events, vec![TickEvent::ScoreIncrement { score: 1 }]);
        let snap = sim.snapshot();
        assert_eq!(snap.head, (2, 0));
        assert_eq!(snap.body, vec![(1, 0)]);
        assert_eq!(snap.score, 1);
        assert_ne!(snap.food, (1, 0));
    }

    #[test]
    fn plain_tick_shifts_body_and_keeps_length() {
        let mut sim = sim(10, 5);
        place_snake(&mut sim, (5, 5), Up, vec![(5, 6), (5, 7), (4, 7)]);
        sim.food = (0, 0);

        let before = sim.snapshot();
        assert!(sim.tick().is_empty());
        let after = sim.snapshot();

        assert_eq!(after.body.len(), before.body.len());
        assert_eq!(after.body[0], before.head);
        for i in 1..after.body.len() {
            assert_eq!(after.body[i], before.body[i - 1]);
        }
        assert_eq!(after.head, (5, 4));
    }

    #[test]
    fn self_collision_resets_without_moving() {
        let mut sim = sim(10, 8);
        // Head sits on its own third segment.
        place_snake(&mut sim, (3, 3), Left, vec![(4, 3), (4, 4), (3, 3), (3, 4)]);
        sim.score = 4;

        let events = sim.tick();
        assert_eq!(
            events,
            vec![TickEvent::Reset { cause: ResetCause::SelfCollision, final_score: 4 }]
        );
        let snap = sim.snapshot();
        assert!(snap.body.is_empty());
        assert_eq!(snap.score, 0);
        assert_eq!(snap.direction, Up);
        assert_eq!(sim.pending, Up);
    }

    #[test]
    fn full_board_after_eating_resets() {
        let mut sim = sim(3, 21);
        let head = (1, 1);
        let body: Vec<Cell> = sim.cells.iter().copied().filter(|c| *c != head).collect();
        assert_eq!(body.len(), 8);
        place_snake(&mut sim, head, Right, body);
        sim.food = head;
        sim.score = 8;

        let events = sim.tick();
        assert_eq!(
            events,
            vec![TickEvent::Reset { cause: ResetCause::BoardFull, final_score: 8 }]
        );
        let snap = sim.snapshot();
        assert!(snap.body.is_empty());
        assert_eq!(snap.score, 0);
    }

    #[test]
    fn reversal_request_leaves_pending_untouched() {
        let mut sim = sim(10, 2);
        place_snake(&mut sim, (5, 5), Right, vec![(4, 5)]);
        sim.food = (0, 0);

        assert_eq!(sim.request_direction(Left), Right);
        assert_eq!(sim.request_direction(Up), Up);
        // Still a reversal of the committed direction, Up stays latched.
        assert_eq!(sim.request_direction(Left), Up);
        assert_eq!(sim.request_direction(Down), Down);
        sim.tick();
        assert_eq!(sim.snapshot().direction, Down);
        assert_eq!(sim.snapshot().head, (5, 6));
    }

    #[test]
    fn two_requests_in_one_tick_cannot_reverse() {
        let mut sim = sim(10, 4);
        place_snake(&mut sim, (5, 5), Right, vec![(4, 5), (3, 5)]);
        sim.food = (0, 0);

        sim.request_direction(Up);
        sim.request_direction(Left);
        assert!(!is_reset(&sim.tick()));

        let snap = sim.snapshot();
        assert_eq!(snap.direction, Up);
        assert_eq!(snap.head, (5, 4));
        assert_eq!(snap.body, vec![(5, 5), (4, 5)]);

        // Left is legal now that Up is committed.
        assert_eq!(sim.request_direction(Left), Left);
        assert!(!is_reset(&sim.tick()));
        assert_eq!(sim.snapshot().head, (4, 4));
    }

    #[test]
    fn wraps_across_the_edge() {
        let mut sim = sim(4, 6);
        place_snake(&mut sim, (1, 0), Up, vec![]);
        sim.food = (3, 3);

        sim.tick();
        assert_eq!(sim.snapshot().head, (1, 3));
    }

    #[test]
    fn snapshot_is_idempotent() {
        let mut sim = sim(8, 12);
        sim.tick();
        assert_eq!(sim.snapshot(), sim.snapshot());
    }

    #[test]
    fn food_never_overlaps_the_snake() {
        let mut sim = sim(6, 77);
        for i in 0..2000u32 {
            let dir = TURNS[(i / 3 % 4) as usize];
            sim.request_direction(dir);
            let before = sim.snapshot();
            let events = sim.tick();
            let after = sim.snapshot();

            if events.iter().any(|ev| matches!(ev, TickEvent::ScoreIncrement { .. })) {
                assert_ne!(after.food, before.head);
                assert!(!before.body.contains(&after.food));
            }
            assert!(!after.body.contains(&after.food));
        }
    }

    #[test]
    fn body_length_tracks_score() {
        let mut sim = sim(6, 31);
        for i in 0..2000u32 {
            let dir = TURNS[(i / 5 % 4) as usize];
            sim.request_direction(dir);
            sim.tick();
            let snap = sim.snapshot();
            assert_eq!(snap.body.len(), snap.score as usize);
        }
        assert_eq!(sim.ticks(), 2000);
    }

    #[test]
    fn explicit_reset_clears_progress() {
        let mut sim = sim(4, 9);
        place_snake(&mut sim, (0, 0), Right, vec![(3, 0)]);
        sim.score = 1;
        sim.request_direction(Down);

        sim.reset();
        let snap = sim.snapshot();
        assert_eq!(snap.score, 0);
        assert!(snap.body.is_empty());
        assert_eq!(snap.direction, Up);
        assert_eq!(sim.pending, Up);
    }

    #[test]
    fn same_seed_plays_the_same_game() {
        let mut a = sim(10, 1234);
        let mut b = sim(10, 1234);
        for i in 0..300u32 {
            let dir = TURNS[(i / 4 % 4) as usize];
            a.request_direction(dir);
            b.request_direction(dir);
            assert_eq!(a.tick(), b.tick());
            assert_eq!(a.snapshot(), b.snapshot());
        }
    }
}
