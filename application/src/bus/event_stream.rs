//! Subscriber side of a session's event stream.

use debate_domain::DebateEvent;
use futures::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc::UnboundedReceiver;

/// Replay of everything published before the subscription, followed by live
/// events. Ends after the terminal phase change, or when the session is
/// dropped.
#[derive(Debug)]
pub struct EventStream {
    replay: VecDeque<DebateEvent>,
    live: UnboundedReceiver<DebateEvent>,
    finished: bool,
}

impl EventStream {
    pub(crate) fn new(replay: Vec<DebateEvent>, live: UnboundedReceiver<DebateEvent>) -> Self {
        Self {
            replay: replay.into(),
            live,
            finished: false,
        }
    }

    /// Next event, or `None` once the stream has ended.
    pub async fn next_event(&mut self) -> Option<DebateEvent> {
        futures::future::poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }

    /// Drain the stream until it ends.
    pub async fn collect_all(mut self) -> Vec<DebateEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    fn yield_event(&mut self, event: DebateEvent) -> Poll<Option<DebateEvent>> {
        if event.is_terminal() {
            self.finished = true;
        }
        Poll::Ready(Some(event))
    }
}

impl Stream for EventStream {
    type Item = DebateEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }
        if let Some(event) = self.replay.pop_front() {
            return self.yield_event(event);
        }
        match self.live.poll_recv(cx) {
            Poll::Ready(Some(event)) => self.yield_event(event),
            Poll::Ready(None) => {
                self.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
