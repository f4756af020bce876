//! Mutable context threaded through every state handler.
//!
//! `MotorContext` holds the one piece of shared control state
//! ([`MotorControlState`]), the pre-computed duty ladder and the
//! direction-press parity counter.  Only the FSM handlers write to it.

use crate::config::DutyTable;

use super::Direction;

// ---------------------------------------------------------------------------
// Speed level
// ---------------------------------------------------------------------------

/// Index into the duty ladder.  Always `< DutyTable::len()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpeedLevel(usize);

impl SpeedLevel {
    /// Level 0: motors stopped.
    pub const STOP: Self = Self(0);

    pub const fn index(self) -> usize {
        self.0
    }

    pub const fn is_stopped(self) -> bool {
        self.0 == 0
    }

    /// Step to the next level, wrapping to 0 after the last of `levels`.
    pub fn advance(&mut self, levels: usize) {
        self.0 = if levels == 0 { 0 } else { (self.0 + 1) % levels };
    }
}

// ---------------------------------------------------------------------------
// Control state
// ---------------------------------------------------------------------------

/// `(SpeedLevel, Direction)`: the state the button handlers mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorControlState {
    pub level: SpeedLevel,
    pub direction: Direction,
}

impl Default for MotorControlState {
    fn default() -> Self {
        Self {
            level: SpeedLevel::STOP,
            direction: Direction::Brake,
        }
    }
}

// ---------------------------------------------------------------------------
// MotorContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
#[derive(Debug, Clone)]
pub struct MotorContext {
    /// Current speed level and direction.
    pub state: MotorControlState,
    /// Duty (counter ticks) per speed level.
    pub duties: DutyTable,
    /// Direction presses since the motors last left `Brake`.
    /// Odd selects `Backward`, even selects `Forward`.
    pub direction_presses: u32,
}

impl MotorContext {
    pub fn new(duties: DutyTable) -> Self {
        Self {
            state: MotorControlState::default(),
            duties,
            direction_presses: 0,
        }
    }

    /// Duty commanded for the current level.
    pub fn duty(&self) -> u16 {
        self.duties.duty(self.state.level.index())
    }

    /// Number of speed levels in the ladder.
    pub fn levels(&self) -> usize {
        self.duties.len()
    }
}
