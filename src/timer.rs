//! Wall-clock stopwatch.
//!
//! The timed region of a benchmark run must tightly bracket the repeated
//! kernel calls; allocation, initialization and printing all happen outside
//! the `tic`/`toc` window.

use std::time::Instant;

/// A simple wall-clock stopwatch.
///
/// `tic()` records the start timestamp; `toc()` returns the seconds elapsed
/// since the last `tic()` as an `f64`. A freshly constructed timer behaves as
/// if `tic()` had been called at construction, so `toc()` is always valid.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Creates a timer whose start point is "now".
    pub fn new() -> Self {
        Timer {
            start: Instant::now(),
        }
    }

    /// Records the start timestamp.
    pub fn tic(&mut self) {
        self.start = Instant::now();
    }

    /// Returns the elapsed time since the last [`Timer::tic`], in seconds.
    pub fn toc(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new()
    }
}
