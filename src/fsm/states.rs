//! Concrete state handler functions and table builder.
//!
//! Each state is three plain `fn` pointers plus an enter hook: no
//! closures, no dynamic dispatch, no heap.
//!
//! ```text
//!            speed (level 0 -> 1)
//!  BRAKE ─────────────────────────▶ FORWARD ◀──┐
//!    ▲                                 │       │ direction
//!    │  speed (wrap to level 0)        │       │ (even)
//!    ├─────────────────────────────────┤       │
//!    │                       direction │ (odd) │
//!    │                                 ▼       │
//!    └─────────────────────────────── BACKWARD ┘
//! ```
//!
//! Speed presses at levels 1..N-1 stay in the current direction.  A
//! direction press in BRAKE is ignored.

use log::{debug, info};

use super::context::MotorContext;
use super::{Direction, StateDescriptor};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Direction::COUNT] {
    [
        // Index 0: Brake
        StateDescriptor {
            id: Direction::Brake,
            name: "Brake",
            on_enter: Some(brake_enter),
            on_speed: brake_speed,
            on_direction: brake_direction,
        },
        // Index 1: Forward
        StateDescriptor {
            id: Direction::Forward,
            name: "Forward",
            on_enter: Some(moving_enter),
            on_speed: moving_speed,
            on_direction: toggle_direction,
        },
        // Index 2: Backward
        StateDescriptor {
            id: Direction::Backward,
            name: "Backward",
            on_enter: Some(moving_enter),
            on_speed: moving_speed,
            on_direction: toggle_direction,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  BRAKE
// ═══════════════════════════════════════════════════════════════════════════

fn brake_enter(ctx: &mut MotorContext) {
    ctx.state.level = super::context::SpeedLevel::STOP;
    ctx.direction_presses = 0;
    info!("BRAKE: motors stopped");
}

fn brake_speed(ctx: &mut MotorContext) -> Option<Direction> {
    ctx.state.level.advance(ctx.levels());
    if ctx.state.level.is_stopped() {
        return None;
    }
    // First press from a stop always starts forward.
    Some(Direction::Forward)
}

fn brake_direction(_ctx: &mut MotorContext) -> Option<Direction> {
    debug!("BRAKE: direction press ignored while stopped");
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FORWARD / BACKWARD
// ═══════════════════════════════════════════════════════════════════════════

fn moving_enter(ctx: &mut MotorContext) {
    info!(
        "{:?}: level {} duty {}",
        ctx.state.direction,
        ctx.state.level.index(),
        ctx.duty()
    );
}

fn moving_speed(ctx: &mut MotorContext) -> Option<Direction> {
    ctx.state.level.advance(ctx.levels());
    if ctx.state.level.is_stopped() {
        return Some(Direction::Brake);
    }
    debug!("speed: level {} duty {}", ctx.state.level.index(), ctx.duty());
    None
}

fn toggle_direction(ctx: &mut MotorContext) -> Option<Direction> {
    ctx.direction_presses = ctx.direction_presses.wrapping_add(1);
    if ctx.direction_presses % 2 == 1 {
        Some(Direction::Backward)
    } else {
        Some(Direction::Forward)
    }
}
