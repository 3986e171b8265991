//! Fixed-timestep game clock and the recurring tasks driven by it.
//!
//! `draw_web()` calls at ~60fps with variable delta. GameTime converts
//! this into a fixed number of discrete ticks per second, making game
//! logic deterministic and fully testable. `RecurringTask` turns those
//! ticks back into "every N ticks" callbacks (energy regen, passive income).

/// Game ticks per real-time second.
pub const TICKS_PER_SEC: u32 = 10;

pub struct GameTime {
    /// Milliseconds per tick (e.g. 100ms = 10 ticks/sec)
    ms_per_tick: f64,
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Total elapsed ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    /// Create a new GameTime with the given tick rate.
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec as f64,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed wall-clock timestamp (from `performance.now()` or similar).
    /// Returns the number of discrete ticks to process this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            // Clamp to avoid spiral-of-death if tab was backgrounded
            Some(prev) => (now_ms - prev).clamp(0.0, 500.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}

/// What a recurring task does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    EnergyRegen,
    ProfitAccrual,
}

/// A callback that fires every `period` ticks until cancelled.
#[derive(Clone, Debug)]
pub struct RecurringTask {
    pub kind: TaskKind,
    period: u32,
    elapsed: u32,
    cancelled: bool,
}

impl RecurringTask {
    pub fn every(kind: TaskKind, period: u32) -> Self {
        Self {
            kind,
            period: period.max(1),
            elapsed: 0,
            cancelled: false,
        }
    }

    /// Advance by one tick. Returns true when the task is due.
    pub fn step(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.elapsed += 1;
        if self.elapsed >= self.period {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
