//! Event Emitter: pushes ordered events to zero or one subscriber.

use debate_domain::DebateEvent;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

/// Best-effort, at-most-once delivery. Never blocks; the transcript is the
/// durable record, so a detached or slow subscriber loses nothing that
/// cannot be replayed.
#[derive(Debug, Default)]
pub struct EventEmitter {
    subscriber: Option<UnboundedSender<DebateEvent>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a subscriber, replacing any previous one.
    pub fn attach(&mut self, subscriber: UnboundedSender<DebateEvent>) {
        self.subscriber = Some(subscriber);
    }

    pub fn detach(&mut self) {
        self.subscriber = None;
    }

    pub fn has_subscriber(&self) -> bool {
        self.subscriber
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    pub fn emit(&mut self, event: DebateEvent) {
        let Some(tx) = &self.subscriber else {
            return;
        };
        if let Err(err) = tx.send(event) {
            trace!("Subscriber gone, dropping event #{}", err.0.sequence);
            self.subscriber = None;
        }
    }
}
