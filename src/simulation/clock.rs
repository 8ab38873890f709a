//! Fixed-rate logical clock
//!
//! Wall-clock frame deltas are accumulated and converted into whole logical
//! ticks. Every tick carries the same dt (`LOGICAL_DT`), so physics output
//! depends only on the number of ticks, never on the frame rate.

use super::params::LOGICAL_DT;

/// Slack used when comparing the accumulator against one quantum so that
/// splitting the same total wall time differently yields the same tick count
const TIME_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct FixedStepClock {
    accumulated_time: f64, // wall seconds not yet converted into ticks
    quantum: f64, // wall seconds per logical tick
    ticks: u64, // total logical ticks fired
    paused: bool,
}

impl FixedStepClock {
    /// Clock firing `ticks_per_second` logical ticks per wall second
    pub fn new(ticks_per_second: f64) -> Self {
        debug_assert!(ticks_per_second > 0.0, "tick rate must be positive");
        Self {
            accumulated_time: 0.0,
            quantum: 1.0 / ticks_per_second,
            ticks: 0,
            paused: false,
        }
    }

    /// Accumulate `wall_dt` seconds and return how many logical ticks are due
    /// The caller must run exactly that many ticks with `logical_dt()`
    pub fn advance(&mut self, wall_dt: f64) -> usize {
        // also rejects NaN, which would otherwise stick in the accumulator
        if self.paused || !(wall_dt > 0.0) {
            return 0;
        }
        self.accumulated_time += wall_dt;

        let mut due = 0;
        while self.accumulated_time + TIME_EPSILON >= self.quantum {
            self.accumulated_time -= self.quantum;
            due += self.fire();
        }
        due
    }

    /// Manual single step, also while paused
    pub fn step_once(&mut self) -> usize {
        self.fire()
    }

    fn fire(&mut self) -> usize {
        self.ticks += 1;
        1
    }

    pub fn logical_dt(&self) -> f64 {
        LOGICAL_DT
    }

    pub fn quantum(&self) -> f64 {
        self.quantum
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn accumulated_time(&self) -> f64 {
        self.accumulated_time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pausing drops any partially accumulated quantum
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.accumulated_time = 0.0;
        }
    }
}
