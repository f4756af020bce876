//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the FSM, the reversal guard and the shared motor
//! context.  It is the single consumer of debounced presses and the only
//! code that writes duty values or direction pins.  All I/O flows through
//! port traits injected at call sites, making the entire service testable
//! with mock adapters.
//!
//! ```text
//!  ButtonPress ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │       AppService        │
//!    MotorPort ◀── │   FSM · ReversalGuard   │
//!                  └────────────────────────┘
//! ```
//!
//! ## Output ordering
//!
//! Stopping writes duty 0 to both channels before braking the bridge;
//! starting drives the bridge pattern before raising duty.

use log::info;

use crate::config::SystemConfig;
use crate::drivers::button::ButtonPress;
use crate::drivers::pwm::PwmChannel;
use crate::error::Result;
use crate::events::ButtonId;
use crate::fsm::context::{MotorContext, MotorControlState};
use crate::fsm::states::build_state_table;
use crate::fsm::{Direction, MotorFsm, Transition};
use crate::safety::{DirectionAction, ReversalGuard};

use super::commands::AppCommand;
use super::events::{AppEvent, MotorSnapshot};
use super::ports::{EventSink, MotorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    fsm: MotorFsm,
    ctx: MotorContext,
    guard: ReversalGuard,
    /// Direction currently on the H-bridge pins.
    driven: Direction,
    commands_handled: u64,
}

impl AppService {
    /// Construct the service from a validated configuration.
    ///
    /// Does **not** start the FSM: call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Result<Self> {
        config.validate()?;
        let duties = config.duty_table()?;
        info!(
            "duty ladder: {:?} ticks of {}",
            duties.as_slice(),
            duties.period()
        );

        Ok(Self {
            fsm: MotorFsm::new(build_state_table(), Direction::Brake),
            ctx: MotorContext::new(duties),
            guard: ReversalGuard::new(config.reverse_brake_ms),
            driven: Direction::Brake,
            commands_handled: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter `(Brake, 0)` and drive the outputs to match.
    pub fn start(&mut self, hw: &mut impl MotorPort, sink: &mut impl EventSink) -> Result<()> {
        self.fsm.start(&mut self.ctx);
        self.write_duty(hw)?;
        self.drive(Direction::Brake, hw)?;
        sink.emit(&AppEvent::Started(self.snapshot()));
        info!("AppService started in {:?}", self.fsm.current_state());
        Ok(())
    }

    // ── Press handling ────────────────────────────────────────

    /// Process one batch of debounced presses in order.
    pub fn handle_presses(
        &mut self,
        presses: &[ButtonPress],
        hw: &mut impl MotorPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        for press in presses {
            self.handle_command(press.button.into(), press.at_ms, hw, sink)?;
        }
        Ok(())
    }

    /// Process one command.  `now_ms` times any reversal hold.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now_ms: u32,
        hw: &mut impl MotorPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.commands_handled += 1;
        match cmd {
            AppCommand::AdvanceSpeed => {
                let t = self.fsm.on_speed_event(&mut self.ctx);
                self.apply_speed(t, now_ms, hw)?;
                sink.emit(&AppEvent::SpeedChanged {
                    level: self.ctx.state.level.index(),
                    duty: self.ctx.duty(),
                });
                if t.changed() {
                    sink.emit(&AppEvent::DirectionChanged { from: t.from, to: t.to });
                }
            }
            AppCommand::ToggleDirection => {
                let t = self.fsm.on_direction_event(&mut self.ctx);
                if !t.changed() {
                    sink.emit(&AppEvent::PressIgnored(ButtonId::Direction));
                    return Ok(());
                }
                match self.guard.request(t.from, t.to, self.ctx.duty(), now_ms) {
                    DirectionAction::Apply(direction) => self.drive(direction, hw)?,
                    DirectionAction::HoldBrake { target } => {
                        self.drive(Direction::Brake, hw)?;
                        sink.emit(&AppEvent::ReversalDeferred { target });
                    }
                }
                sink.emit(&AppEvent::DirectionChanged { from: t.from, to: t.to });
            }
        }
        Ok(())
    }

    /// Release a held reversal once its brake time is up.  Call on every
    /// loop pass; a no-op when nothing is pending.
    pub fn poll(&mut self, now_ms: u32, hw: &mut impl MotorPort, sink: &mut impl EventSink) -> Result<()> {
        if let Some(direction) = self.guard.poll(now_ms) {
            self.drive(direction, hw)?;
            sink.emit(&AppEvent::ReversalApplied(direction));
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> MotorControlState {
        self.ctx.state
    }

    pub fn duty(&self) -> u16 {
        self.ctx.duty()
    }

    pub fn period(&self) -> u16 {
        self.ctx.duties.period()
    }

    pub fn snapshot(&self) -> MotorSnapshot {
        MotorSnapshot {
            level: self.ctx.state.level.index(),
            direction: self.ctx.state.direction,
            duty: self.ctx.duty(),
            period: self.period(),
            driven: self.driven,
        }
    }

    /// Direction waiting behind the reversal brake, if any.
    pub fn pending_reversal(&self) -> Option<Direction> {
        self.guard.pending()
    }

    pub fn commands_handled(&self) -> u64 {
        self.commands_handled
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_speed(&mut self, t: Transition, now_ms: u32, hw: &mut impl MotorPort) -> Result<()> {
        if t.to == Direction::Brake {
            self.guard.cancel();
            self.write_duty(hw)?;
            return self.drive(Direction::Brake, hw);
        }
        if t.changed() {
            // Brake -> Forward: never held.
            if let DirectionAction::Apply(direction) = self.guard.request(t.from, t.to, 0, now_ms) {
                self.drive(direction, hw)?;
            }
        }
        self.write_duty(hw)
    }

    fn write_duty(&mut self, hw: &mut impl MotorPort) -> Result<()> {
        let duty = self.ctx.duty();
        for channel in PwmChannel::ALL {
            hw.set_duty(channel, duty)?;
        }
        Ok(())
    }

    fn drive(&mut self, direction: Direction, hw: &mut impl MotorPort) -> Result<()> {
        hw.set_direction(direction)?;
        self.driven = direction;
        Ok(())
    }
}
