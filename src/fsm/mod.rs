//! Function-pointer finite state machine for speed and direction.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌──────────┬───────────┬─────────────────┬───────────────┐  │
//! │  │ Direction│ on_enter  │ on_speed        │ on_direction  │  │
//! │  ├──────────┼───────────┼─────────────────┼───────────────┤  │
//! │  │ Brake    │ fn(ctx)   │ fn(ctx)->Option │ fn(ctx)->Opt. │  │
//! │  │ Forward  │ fn(ctx)   │ fn(ctx)->Option │ fn(ctx)->Opt. │  │
//! │  │ Backward │ fn(ctx)   │ fn(ctx)->Option │ fn(ctx)->Opt. │  │
//! │  └──────────┴───────────┴─────────────────┴───────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The machine is event-driven: each accepted button press calls the
//! matching handler of the **current** state.  If it returns
//! `Some(next)` and `next` differs from the current state, the engine
//! records the new direction in the context and runs `on_enter(next)`.
//! The speed level lives in the context, so the full state space is
//! `Direction × SpeedLevel`.

pub mod context;
pub mod states;

use context::MotorContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// H-bridge drive mode.  Doubles as the FSM state id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Brake = 0,
    Forward = 1,
    Backward = 2,
}

impl Direction {
    /// Total number of states: used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert an index back to `Direction`.  Out-of-range indices fall
    /// back to `Brake`.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Brake,
            1 => Self::Forward,
            2 => Self::Backward,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Brake
            }
        }
    }

    pub const fn is_moving(self) -> bool {
        !matches!(self, Self::Brake)
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` actions.
pub type StateActionFn = fn(&mut MotorContext);

/// Signature for a button handler.
/// Returns `Some(next)` to request a transition, or `None` to stay.
pub type StateEventFn = fn(&mut MotorContext) -> Option<Direction>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor {
    pub id: Direction,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_speed: StateEventFn,
    pub on_direction: StateEventFn,
}

/// Direction before and after one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Direction,
    pub to: Direction,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct MotorFsm {
    /// Fixed-size table indexed by `Direction as usize`.
    table: [StateDescriptor; Direction::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Number of transitions taken since start.
    transitions: u64,
}

impl MotorFsm {
    pub fn new(table: [StateDescriptor; Direction::COUNT], initial: Direction) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter`.  Call once before the first event.
    pub fn start(&mut self, ctx: &mut MotorContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        ctx.state.direction = self.current_state();
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Speed button accepted.
    pub fn on_speed_event(&mut self, ctx: &mut MotorContext) -> Transition {
        let next = (self.table[self.current].on_speed)(ctx);
        self.apply(next, ctx)
    }

    /// Direction button accepted.
    pub fn on_direction_event(&mut self, ctx: &mut MotorContext) -> Transition {
        let next = (self.table[self.current].on_direction)(ctx);
        self.apply(next, ctx)
    }

    pub fn current_state(&self) -> Direction {
        Direction::from_index(self.current)
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn apply(&mut self, next: Option<Direction>, ctx: &mut MotorContext) -> Transition {
        let from = self.current_state();
        if let Some(next_id) = next {
            if next_id != from {
                self.transition(next_id, ctx);
            }
        }
        Transition {
            from,
            to: self.current_state(),
        }
    }

    fn transition(&mut self, next_id: Direction, ctx: &mut MotorContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        self.current = next_idx;
        self.transitions += 1;
        ctx.state.direction = next_id;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
