//! Frame pacing.
//!
//! Effects never call `std::thread::sleep` or read the system clock
//! directly; they go through a [`FrameClock`] so tests and dry runs can
//! replace real time with a virtual one.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Source of frame delays and wall-clock time.
pub trait FrameClock: Send + Sync {
    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);

    /// Seconds since the Unix epoch.
    fn now(&self) -> f64;
}

/// Real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl FrameClock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Virtual time: `sleep` returns immediately and advances `now`.
#[derive(Debug, Default)]
pub struct ManualClock {
    state: Mutex<ManualState>,
}

#[derive(Debug, Default)]
struct ManualState {
    now: f64,
    slept: Duration,
    sleeps: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the virtual clock at a given epoch time.
    pub fn starting_at(now: f64) -> Self {
        Self {
            state: Mutex::new(ManualState {
                now,
                ..ManualState::default()
            }),
        }
    }

    /// Total virtual time spent sleeping.
    pub fn slept(&self) -> Duration {
        self.state.lock().slept
    }

    /// Number of `sleep` calls.
    pub fn sleep_count(&self) -> u64 {
        self.state.lock().sleeps
    }
}

impl FrameClock for ManualClock {
    fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.now += duration.as_secs_f64();
        state.slept += duration;
        state.sleeps += 1;
    }

    fn now(&self) -> f64 {
        self.state.lock().now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::starting_at(100.0);
        clock.sleep(Duration::from_millis(250));
        clock.sleep(Duration::from_millis(250));
        assert!((clock.now() - 100.5).abs() < 1e-9);
        assert_eq!(clock.slept(), Duration::from_millis(500));
        assert_eq!(clock.sleep_count(), 2);
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        assert!(SystemClock.now() > 1_600_000_000.0);
    }
}
