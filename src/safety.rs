//! Direction-reversal brake interlock.
//!
//! Reversing a brushed motor at speed dumps the back-EMF straight into
//! the H-bridge.  With `reverse_brake_ms == 0` the guard is transparent
//! and reversals are immediate.  Otherwise a Forward ↔ Backward change
//! at non-zero duty drives the brake pattern first and releases the new
//! direction once the hold has elapsed.
//!
//! ## Lifecycle
//!
//! 1. `request()` sees a reversal at speed and returns `HoldBrake`.
//! 2. The caller drives the brake pattern.
//! 3. `poll()` on every loop pass returns the target once the hold is up.
//! 4. A wrap to Brake calls `cancel()`; the reversal is dropped.
//!
//! The FSM state changes at step 1; only the pins lag behind.

use log::{debug, info};

use crate::fsm::Direction;

/// What the caller should drive on the H-bridge right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionAction {
    /// Drive this direction immediately.
    Apply(Direction),
    /// Drive brake; `target` follows after the hold.
    HoldBrake { target: Direction },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingReversal {
    target: Direction,
    since_ms: u32,
}

pub struct ReversalGuard {
    hold_ms: u32,
    pending: Option<PendingReversal>,
}

impl ReversalGuard {
    pub fn new(hold_ms: u32) -> Self {
        Self {
            hold_ms,
            pending: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.hold_ms > 0
    }

    /// Decide how to drive a direction change from `from` to `to` while
    /// the channels run at `duty`.
    pub fn request(&mut self, from: Direction, to: Direction, duty: u16, now_ms: u32) -> DirectionAction {
        let reversal = from.is_moving() && to.is_moving() && from != to;
        if !self.enabled() || !reversal || duty == 0 {
            self.pending = None;
            return DirectionAction::Apply(to);
        }

        if self.pending.is_some() {
            debug!("reversal re-armed towards {to:?}");
        } else {
            info!("reversal at speed: braking {} ms before {to:?}", self.hold_ms);
        }
        self.pending = Some(PendingReversal {
            target: to,
            since_ms: now_ms,
        });
        DirectionAction::HoldBrake { target: to }
    }

    /// Returns the deferred direction once its hold has elapsed.
    pub fn poll(&mut self, now_ms: u32) -> Option<Direction> {
        let pending = self.pending?;
        if now_ms.wrapping_sub(pending.since_ms) < self.hold_ms {
            return None;
        }
        self.pending = None;
        Some(pending.target)
    }

    /// Drop any pending reversal.
    pub fn cancel(&mut self) {
        if let Some(p) = self.pending.take() {
            debug!("pending reversal to {:?} cancelled", p.target);
        }
    }

    /// Direction waiting behind the brake hold, if any.
    pub fn pending(&self) -> Option<Direction> {
        self.pending.map(|p| p.target)
    }
}
