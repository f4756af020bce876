//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.

use crate::events::ButtonId;
use crate::fsm::Direction;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the initial snapshot).
    Started(MotorSnapshot),

    /// The speed level moved; `duty` is in counter ticks.
    SpeedChanged { level: usize, duty: u16 },

    /// The state machine changed direction.
    DirectionChanged { from: Direction, to: Direction },

    /// A reversal at speed is braking before `target` is driven.
    ReversalDeferred { target: Direction },

    /// A deferred reversal reached the pins.
    ReversalApplied(Direction),

    /// A press had no effect in the current state.
    PressIgnored(ButtonId),
}

/// Point-in-time view of the motor control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorSnapshot {
    pub level: usize,
    pub direction: Direction,
    pub duty: u16,
    pub period: u16,
    /// Direction on the H-bridge pins; differs from `direction` only
    /// while a reversal is held.
    pub driven: Direction,
}

impl MotorSnapshot {
    /// Duty in whole percent of the period.
    pub fn duty_percent(&self) -> u32 {
        if self.period == 0 {
            return 0;
        }
        (u32::from(self.duty) * 100 + u32::from(self.period) / 2) / u32::from(self.period)
    }
}
