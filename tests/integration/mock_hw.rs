//! Mock motor outputs for integration tests.
//!
//! Records every port call so tests can assert on the full command
//! history without touching PWM registers or GPIO.

use twinmotor::Result;
use twinmotor::app::events::AppEvent;
use twinmotor::app::ports::{EventSink, MotorPort};
use twinmotor::drivers::pwm::PwmChannel;
use twinmotor::fsm::Direction;

// ── Motor call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCall {
    SetDuty { channel: PwmChannel, duty: u16 },
    SetDirection(Direction),
}

// ── MockMotor ─────────────────────────────────────────────────

pub struct MockMotor {
    pub calls: Vec<MotorCall>,
}

#[allow(dead_code)]
impl MockMotor {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn last_call(&self) -> Option<&MotorCall> {
        self.calls.last()
    }

    /// Last duty written to `channel` (0 if never written).
    pub fn duty(&self, channel: PwmChannel) -> u16 {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match *c {
                MotorCall::SetDuty { channel: ch, duty } if ch == channel => Some(duty),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Last direction driven on the bridge.
    pub fn direction(&self) -> Option<Direction> {
        self.calls.iter().rev().find_map(|c| match *c {
            MotorCall::SetDirection(d) => Some(d),
            MotorCall::SetDuty { .. } => None,
        })
    }

    pub fn direction_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, MotorCall::SetDirection(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockMotor {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorPort for MockMotor {
    fn set_duty(&mut self, channel: PwmChannel, duty: u16) -> Result<()> {
        self.calls.push(MotorCall::SetDuty { channel, duty });
        Ok(())
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        self.calls.push(MotorCall::SetDirection(direction));
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink that keeps every event.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&AppEvent> {
        self.events.last()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
