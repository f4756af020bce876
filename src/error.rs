//! Unified error types for the TwinMotor firmware.
//!
//! A single `Error` enum that every driver and the application service
//! return, so the consumer loop has one thing to match on.  All variants
//! are `Copy` so they can be passed through the control path without
//! allocation.

use core::fmt;

use crate::drivers::pwm::PwmChannel;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A duty value outside `0..=period` was requested.
    InvalidDutyCycle { duty: u16, period: u16 },
    /// A second channel was configured with a period different from the
    /// one already latched into the shared counter.
    ConfigurationConflict { latched: u16, requested: u16 },
    /// Period below the usable hardware minimum of 3 ticks.
    InvalidPeriod(u16),
    /// `set_duty` was called before `configure` for this channel.
    ChannelNotConfigured(PwmChannel),
    /// A digital output pin rejected a write.
    Pin(PinError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDutyCycle { duty, period } => {
                write!(f, "duty {duty} outside 0..={period}")
            }
            Self::ConfigurationConflict { latched, requested } => write!(
                f,
                "period conflict: counter latched at {latched}, channel requested {requested}"
            ),
            Self::InvalidPeriod(p) => write!(f, "period {p} below minimum of 3"),
            Self::ChannelNotConfigured(ch) => write!(f, "PWM channel {ch:?} not configured"),
            Self::Pin(e) => write!(f, "pin: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Pin errors
// ---------------------------------------------------------------------------

/// Which output group failed a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    /// One of the H-bridge IN1-IN4 lines.
    HBridge(u8),
    /// One of the status indicator LEDs.
    StatusLed(u8),
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HBridge(line) => write!(f, "H-bridge IN{} write failed", line + 1),
            Self::StatusLed(idx) => write!(f, "status LED {idx} write failed"),
        }
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Self::Pin(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
