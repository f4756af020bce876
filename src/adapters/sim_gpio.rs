//! Simulated digital output pin.
//!
//! Implements `embedded_hal::digital::OutputPin` over a shared atomic so a
//! test (or the simulation binary) can keep a [`PinProbe`] and observe the
//! level after the pin itself has been moved into a driver.

use core::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

#[derive(Debug, Default)]
struct PinState {
    level: AtomicBool,
    writes: AtomicU32,
}

/// Host-side output pin.
#[derive(Debug, Clone, Default)]
pub struct SimPin {
    state: Arc<PinState>,
}

/// Read-only view of a [`SimPin`].
#[derive(Debug, Clone)]
pub struct PinProbe {
    state: Arc<PinState>,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self) -> PinProbe {
        PinProbe {
            state: Arc::clone(&self.state),
        }
    }

    fn write(&self, high: bool) {
        self.state.level.store(high, Ordering::Release);
        self.state.writes.fetch_add(1, Ordering::Relaxed);
    }
}

impl PinProbe {
    pub fn is_high(&self) -> bool {
        self.state.level.load(Ordering::Acquire)
    }

    /// Number of writes the pin has seen.
    pub fn writes(&self) -> u32 {
        self.state.writes.load(Ordering::Relaxed)
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

impl StatefulOutputPin for SimPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.state.level.load(Ordering::Acquire))
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.state.level.load(Ordering::Acquire))
    }
}

/// Bit pattern of a group of pins, bit `i` = `probes[i]`.
pub fn probe_pattern(probes: &[PinProbe]) -> u8 {
    probes
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_high())
        .fold(0u8, |acc, (i, _)| acc | (1 << i))
}
