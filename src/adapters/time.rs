//! Monotonic millisecond clock.
//!
//! Timestamps for button edges and the reversal hold.  On the host it
//! wraps `std::time::Instant`; readings are truncated to `u32` and every
//! consumer compares them with wrapping arithmetic.

use std::time::Instant;

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Milliseconds since boot, wrapping at `u32::MAX` (~49 days).
    pub fn uptime_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}
