//! Progress reporting.
//!
//! The pipeline never writes to stdout. Every user-facing status line and
//! percentage goes through a [`ProgressSink`] supplied by the caller, so a
//! GUI can forward events across threads and a CLI can print them.

mod event;

pub use event::{parse_percent, ProgressEvent};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

/// Receiver of pipeline progress.
pub trait ProgressSink: Send + Sync {
    /// Called with a human-readable status line.
    fn on_status(&self, text: &str);

    /// Called with the download completion percentage.
    fn on_percent(&self, value: f64);

    /// Called for the unknown-length download heartbeat and once per
    /// processed file.
    fn on_tick(&self) {}
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_status(&self, _text: &str) {}

    fn on_percent(&self, _value: f64) {}
}

/// Forwards progress to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn on_status(&self, text: &str) {
        info!("{text}");
    }

    fn on_percent(&self, value: f64) {
        debug!(percent = value, "Download progress");
    }
}

/// Sends [`ProgressEvent`]s over an unbounded channel.
///
/// Sending never blocks, so the sink is safe to use from the pipeline's
/// worker thread while the receiver lives on a UI thread. Events sent after
/// the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    /// Wraps the sending half of a channel.
    pub fn new(sender: UnboundedSender<ProgressEvent>) -> Self {
        Self { sender }
    }

    fn send(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}

impl ProgressSink for ChannelSink {
    fn on_status(&self, text: &str) {
        self.send(ProgressEvent::Status(text.to_string()));
    }

    fn on_percent(&self, value: f64) {
        self.send(ProgressEvent::Percent(value));
    }

    fn on_tick(&self) {
        self.send(ProgressEvent::Tick);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{ProgressEvent, ProgressSink};
    use std::sync::Mutex;

    /// Records every event for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl RecordingSink {
        pub(crate) fn events(&self) -> Vec<ProgressEvent> {
            self.events.lock().unwrap().clone()
        }

        pub(crate) fn statuses(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    ProgressEvent::Status(text) => Some(text),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn percents(&self) -> Vec<f64> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    ProgressEvent::Percent(value) => Some(value),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn ticks(&self) -> usize {
            self.events()
                .iter()
                .filter(|event| matches!(event, ProgressEvent::Tick))
                .count()
        }
    }

    impl ProgressSink for RecordingSink {
        fn on_status(&self, text: &str) {
            self.events
                .lock()
                .unwrap()
                .push(ProgressEvent::Status(text.to_string()));
        }

        fn on_percent(&self, value: f64) {
            self.events.lock().unwrap().push(ProgressEvent::Percent(value));
        }

        fn on_tick(&self) {
            self.events.lock().unwrap().push(ProgressEvent::Tick);
        }
    }
}
