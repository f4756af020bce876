//! Timestamp-debounced button presses.
//!
//! ## Hardware
//!
//! Two active-low momentary switches with pull-ups (SW1 speed on PF4,
//! SW2 direction on PF0).  Each GPIO fires on the falling edge and the ISR
//! pushes a timestamped [`ButtonEdge`] into the [`EdgeQueue`].  Contact
//! bounce produces several edges per physical press.
//!
//! ## Debounce
//!
//! `service()` (called from the control loop) drains the queue and
//! accepts an edge only if no earlier edge of the same button was
//! accepted, or more than `debounce_ms` elapsed since the last accepted
//! one.  Rejected edges do not restart the window.  Timestamps wrap with
//! `u32` arithmetic.
//!
//! Accepted presses come back in timestamp order.  A speed press that
//! lands within `debounce_ms` after a direction press counts as
//! simultaneous and is moved ahead of it.

use heapless::Vec;
use log::debug;

use crate::events::{ButtonEdge, ButtonId, EDGE_QUEUE_DEPTH, EdgeQueue};

/// A debounced, accepted button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPress {
    pub button: ButtonId,
    pub at_ms: u32,
}

/// Presses accepted from one queue drain.
pub type PressBatch = Vec<ButtonPress, EDGE_QUEUE_DEPTH>;

pub struct EdgeDebouncer {
    debounce_ms: u32,
    last_accepted: [Option<u32>; ButtonId::COUNT],
    rejected: u32,
}

impl EdgeDebouncer {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            last_accepted: [None; ButtonId::COUNT],
            rejected: 0,
        }
    }

    /// Filter one edge.  Returns the press if accepted.
    pub fn accept(&mut self, edge: ButtonEdge) -> Option<ButtonPress> {
        let slot = &mut self.last_accepted[edge.button.index()];
        if let Some(last) = *slot {
            if edge.at_ms.wrapping_sub(last) <= self.debounce_ms {
                self.rejected = self.rejected.wrapping_add(1);
                debug!("{:?} edge at {} ms rejected (bounce)", edge.button, edge.at_ms);
                return None;
            }
        }
        *slot = Some(edge.at_ms);
        Some(ButtonPress {
            button: edge.button,
            at_ms: edge.at_ms,
        })
    }

    /// Drain the queue and return this batch's accepted presses.
    pub fn service(&mut self, queue: &EdgeQueue) -> PressBatch {
        let mut batch = PressBatch::new();
        self.collect_into(queue, &mut batch);
        batch
    }

    /// Pop edges into `batch` until the queue is empty or `batch` is full.
    /// Edges left behind stay queued for the next pass.
    pub fn collect_into(&mut self, queue: &EdgeQueue, batch: &mut PressBatch) {
        let start = batch.len();
        while !batch.is_full() {
            let Some(edge) = queue.try_pop() else {
                break;
            };
            if let Some(press) = self.accept(edge) {
                if batch.push(press).is_err() {
                    break;
                }
            }
        }
        self.order(&mut batch[start..]);
    }

    /// Timestamp order, then speed ahead of a direction press inside the
    /// same window.
    #[allow(clippy::cast_possible_wrap)]
    fn order(&self, presses: &mut [ButtonPress]) {
        let Some(base) = presses.first().map(|p| p.at_ms) else {
            return;
        };
        // Signed offset from the first press keeps the order across a wrap.
        presses.sort_by_key(|p| p.at_ms.wrapping_sub(base) as i32);

        for i in 1..presses.len() {
            let (prev, cur) = (presses[i - 1], presses[i]);
            if prev.button == ButtonId::Direction
                && cur.button == ButtonId::Speed
                && cur.at_ms.wrapping_sub(prev.at_ms) <= self.debounce_ms
            {
                presses.swap(i - 1, i);
            }
        }
    }

    /// Edges rejected as bounce since boot.
    pub fn rejected(&self) -> u32 {
        self.rejected
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pulses_inside_one_window_collapse_to_one_press(
            start in 0u32..1_000_000,
            debounce in 1u32..500,
            offsets in proptest::collection::vec(0u32..=1000, 1..EDGE_QUEUE_DEPTH),
        ) {
            let q = EdgeQueue::new();
            let mut stamps: std::vec::Vec<u32> =
                offsets.iter().map(|off| start + off % (debounce + 1)).collect();
            stamps.sort_unstable();
            for at in stamps {
                q.push_from_isr(ButtonEdge { button: ButtonId::Speed, at_ms: at });
            }
            let mut d = EdgeDebouncer::new(debounce);
            let batch = d.service(&q);
            prop_assert_eq!(batch.len(), 1);
        }

        #[test]
        fn presses_spaced_beyond_window_all_pass(
            debounce in 1u32..500,
            count in 1usize..EDGE_QUEUE_DEPTH,
        ) {
            let q = EdgeQueue::new();
            for i in 0..count as u32 {
                q.push_from_isr(ButtonEdge { button: ButtonId::Direction, at_ms: i * (debounce + 1) });
            }
            let mut d = EdgeDebouncer::new(debounce);
            prop_assert_eq!(d.service(&q).len(), count);
        }
    }
}
