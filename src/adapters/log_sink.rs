//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (serial console on the board, the tracing subscriber
//! on the host).

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(s) => {
                info!(
                    "START | dir={:?} | level={} | duty={}/{} ({}%)",
                    s.direction,
                    s.level,
                    s.duty,
                    s.period,
                    s.duty_percent()
                );
            }
            AppEvent::SpeedChanged { level, duty } => {
                info!("SPEED | level={} | duty={}", level, duty);
            }
            AppEvent::DirectionChanged { from, to } => {
                info!("DIR | {:?} -> {:?}", from, to);
            }
            AppEvent::ReversalDeferred { target } => {
                info!("DIR | braking before {:?}", target);
            }
            AppEvent::ReversalApplied(d) => {
                info!("DIR | reversal applied: {:?}", d);
            }
            AppEvent::PressIgnored(button) => {
                debug!("PRESS | {:?} ignored", button);
            }
        }
    }
}
