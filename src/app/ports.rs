//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   AppService (domain) ──▶ Port trait ──▶ Adapter
//! ```
//!
//! Driven adapters (motor outputs, event sinks) implement these traits.
//! The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::drivers::pwm::PwmChannel;
use crate::error::Result;
use crate::fsm::Direction;

// ───────────────────────────────────────────────────────────────
// Motor port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the motors.
pub trait MotorPort {
    /// Set one PWM channel's duty in counter ticks (`0..=period`).
    fn set_duty(&mut self, channel: PwmChannel, duty: u16) -> Result<()>;

    /// Drive the H-bridge pattern (and its indicator) for `direction`.
    fn set_direction(&mut self, direction: Direction) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
