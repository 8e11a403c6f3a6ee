use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Score and distance for the current run.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    score: u32,
    distance: u32,
    timer: f32,
    interval: f32,
}

impl Scoreboard {
    /// `interval` is how long the mover must stay alive per unit of distance.
    pub fn new(interval: f32) -> Self {
        Self {
            score: 0,
            distance: 0,
            timer: 0.0,
            interval,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn increment_score(&mut self, amount: u32) {
        self.score += amount;
    }

    /// Accumulate time alive. Once a full interval has passed, add one unit
    /// of distance and start the timer over; leftover time is discarded, so a
    /// tick never adds more than one unit. A dead mover's clock is frozen.
    pub fn tick(&mut self, dt: f32, alive: bool) {
        if !alive {
            return;
        }
        self.timer += dt;
        if self.timer >= self.interval {
            self.timer = 0.0;
            self.distance += 1;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub run: u32,
    pub distance: u32,
}

/// Anything that keeps finished runs.
pub trait RunResultSink {
    fn record(&mut self, result: RunResult);
}

/// Best results, highest distance first. Ties keep the earlier run.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    capacity: usize,
    entries: Vec<RunResult>,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    /// Rebuild a board from stored results. More results than slots is
    /// reported and the extras are dropped.
    pub fn from_results(capacity: usize, results: Vec<RunResult>) -> Self {
        if results.len() > capacity {
            warn!(
                capacity,
                found = results.len(),
                "leaderboard holds more results than slots; dropping the lowest"
            );
        }
        let mut board = Self::new(capacity);
        board.entries.extend(results);
        board.settle();
        board
    }

    pub fn entries(&self) -> &[RunResult] {
        &self.entries
    }

    pub fn best(&self) -> Option<RunResult> {
        self.entries.first().copied()
    }

    fn settle(&mut self) {
        // Stable sort keeps the earlier run ahead on ties.
        self.entries.sort_by(|a, b| b.distance.cmp(&a.distance));
        self.entries.truncate(self.capacity);
    }
}

impl RunResultSink for Leaderboard {
    fn record(&mut self, result: RunResult) {
        self.entries.push(result);
        self.settle();
        info!(run = result.run, distance = result.distance, "run recorded");
    }
}
