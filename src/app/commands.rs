//! Inbound commands to the application service.

use crate::events::ButtonId;

/// One accepted button press, as the application core sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// SW1: next speed level (wraps to brake).
    AdvanceSpeed,
    /// SW2: flip between forward and backward.
    ToggleDirection,
}

impl From<ButtonId> for AppCommand {
    fn from(button: ButtonId) -> Self {
        match button {
            ButtonId::Speed => Self::AdvanceSpeed,
            ButtonId::Direction => Self::ToggleDirection,
        }
    }
}
