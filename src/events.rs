//! Interrupt-driven button edge queue.
//!
//! Edges are produced by the two GPIO falling-edge ISRs and consumed by
//! the control loop, which debounces and processes them in a batch.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ SW1 ISR     │────▶│              │     │  Debouncer   │
//! │ (speed)     │     │  EdgeQueue   │────▶│      +       │
//! │ SW2 ISR     │────▶│  (bounded)   │     │  Main Loop   │
//! │ (direction) │     │              │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ISRs never touch motor state; the consumer is the only writer.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Maximum number of pending edges.
pub const EDGE_QUEUE_DEPTH: usize = 8;

/// Which physical button produced an edge.
///
/// Lower discriminant is processed first when both buttons have an
/// accepted press in the same batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ButtonId {
    /// SW1: advance speed level.
    Speed = 0,
    /// SW2: toggle direction.
    Direction = 1,
}

impl ButtonId {
    pub const COUNT: usize = 2;

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A raw falling edge, timestamped in milliseconds since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdge {
    pub button: ButtonId,
    pub at_ms: u32,
}

/// Bounded edge queue shared between the ISRs and the control loop.
///
/// Lives in a `static`; `const fn new` makes that possible.
pub struct EdgeQueue {
    channel: Channel<CriticalSectionRawMutex, ButtonEdge, EDGE_QUEUE_DEPTH>,
    dropped: AtomicU32,
}

impl Default for EdgeQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push an edge.  Safe to call from ISR context.
    /// Returns `false` if the queue is full (edge dropped and counted).
    pub fn push_from_isr(&self, edge: ButtonEdge) -> bool {
        if self.channel.try_send(edge).is_ok() {
            return true;
        }
        self.dropped.fetch_add(1, Ordering::Relaxed);
        false
    }

    /// Pop the oldest pending edge.
    pub fn try_pop(&self) -> Option<ButtonEdge> {
        self.channel.try_receive().ok()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Edges lost to a full queue since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Falling-edge ISR body shared by both buttons.
pub fn on_falling_edge(queue: &EdgeQueue, button: ButtonId, now_ms: u32) -> bool {
    queue.push_from_isr(ButtonEdge {
        button,
        at_ms: now_ms,
    })
}
