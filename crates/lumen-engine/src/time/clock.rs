use std::time::{Duration, Instant};

/// Monotonic microsecond time source.
///
/// Kept behind a trait so frame pacing can be driven by a fake clock in tests.
pub trait Clock {
    /// Current monotonic time in microseconds.
    fn now_us(&self) -> u64;

    /// Blocks the calling thread for roughly `us` microseconds.
    fn sleep_us(&self, us: u64);
}

/// Clock backed by `Instant`, anchored at construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_us(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    fn sleep_us(&self, us: u64) {
        if us > 0 {
            std::thread::sleep(Duration::from_micros(us));
        }
    }
}
