//! Monotonic high-resolution timer used to bracket measured regions.

use std::time::{Duration, Instant};

/// Wall-clock stopwatch over [`Instant`].
///
/// Each mode procedure receives its own instance; nothing is shared across
/// calls, so measurements in different modes cannot couple through timer
/// state.
#[derive(Debug, Clone)]
pub struct BenchTimer {
    started: Instant,
}

impl BenchTimer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Restart the stopwatch. Call immediately before the measured region.
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    /// Time elapsed since the last restart (or construction).
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for BenchTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_monotonic() {
        let timer = BenchTimer::new();
        let a = timer.elapsed();
        let b = timer.elapsed();
        assert!(b >= a);
    }

    #[test]
    fn restart_rewinds_the_clock() {
        let mut timer = BenchTimer::new();
        std::thread::sleep(Duration::from_millis(5));
        let before = timer.elapsed();
        timer.restart();
        let after = timer.elapsed();
        assert!(after < before);
    }
}
