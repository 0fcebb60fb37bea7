use std::time::{Duration, Instant};

use tracing::warn;

/// Turns wall-clock time into a whole number of simulation steps, so the
/// game advances at the same rate whatever the frame rate is.
pub struct FixedTimestep {
    step: Duration,
    max_catch_up: u32,
    accumulator: Duration,
    last: Instant,
}

impl FixedTimestep {
    /// `max_catch_up` is at least one step, otherwise the game could never advance.
    pub fn new(step: Duration, max_catch_up: u32, now: Instant) -> Self {
        let max_catch_up = max_catch_up.max(1);
        FixedTimestep { step, max_catch_up, accumulator: Duration::from_secs(0), last: now }
    }

    /// How many steps are owed since the previous call. A backlog bigger than
    /// `max_catch_up` is dropped rather than replayed.
    pub fn due_steps(&mut self, now: Instant) -> u32 {
        self.accumulator += now.saturating_duration_since(self.last);
        self.last = now;

        let mut steps = 0;
        while self.accumulator >= self.step {
            if steps == self.max_catch_up {
                warn!(dropped = ?self.accumulator, "simulation fell behind, discarding backlog");
                self.accumulator = Duration::from_secs(0);
                break;
            }
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    /// Forgets time spent while the game was not running (paused, intro).
    pub fn resync(&mut self, now: Instant) {
        self.accumulator = Duration::from_secs(0);
        self.last = now;
    }
}
