use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::sink::{DisplayPush, DisplaySink};

/// Pushes waiting for the sink before new ones are dropped.
pub(crate) const PUSH_BACKLOG: usize = 16;

/// Hands rendered surfaces to the sink off the session worker.
///
/// Pushes leave in the order they were enqueued. Each one gets at most
/// `deadline` before the next is attempted, so a stalled sink costs one
/// refresh interval, never the scheduler's time.
pub(crate) struct PushQueue {
    sender: mpsc::Sender<DisplayPush>,
    worker: JoinHandle<()>,
}

impl PushQueue {
    pub(crate) fn spawn(session: String, sink: Arc<dyn DisplaySink>, deadline: Duration) -> Self {
        let (sender, mut receiver) = mpsc::channel::<DisplayPush>(PUSH_BACKLOG);
        let worker = tokio::spawn(async move {
            while let Some(push) = receiver.recv().await {
                let surface = push.surface;
                match tokio::time::timeout(deadline, sink.push(push)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        warn!(%session, %surface, "Display push failed: {err:#}");
                    }
                    Err(_) => {
                        warn!(%session, %surface, ?deadline, "Display push timed out");
                    }
                }
            }
            debug!(%session, "Push queue drained");
        });
        Self { sender, worker }
    }

    /// Queues a push without waiting for the sink.
    pub(crate) fn enqueue(&self, push: DisplayPush) {
        match self.sender.try_send(push) {
            Ok(()) => {}
            Err(TrySendError::Full(push)) => {
                warn!(
                    session = %push.session,
                    surface = %push.surface,
                    "Push backlog full, dropping push"
                );
            }
            Err(TrySendError::Closed(push)) => {
                warn!(
                    session = %push.session,
                    surface = %push.surface,
                    "Push queue closed, dropping push"
                );
            }
        }
    }

    /// Stops accepting pushes and waits for the queued ones to go out.
    pub(crate) async fn close(self) {
        let Self { sender, worker } = self;
        drop(sender);
        if let Err(err) = worker.await {
            warn!("Push worker failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use glance_core::display::DisplaySurface;
    use tokio::time::Instant;

    use super::*;
    use crate::sink::testing::RecordingSink;

    fn push(text: &str) -> DisplayPush {
        DisplayPush {
            session: "s1".to_string(),
            surface: DisplaySurface::Main,
            text: text.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_enqueue_does_not_wait_for_sink() {
        let sink = RecordingSink::new();
        sink.set_delay(Duration::from_secs(5));
        let queue = PushQueue::spawn(
            "s1".to_string(),
            Arc::clone(&sink) as _,
            Duration::from_secs(1),
        );

        let start = Instant::now();
        queue.enqueue(push("a"));
        queue.enqueue(push("b"));
        assert_eq!(start.elapsed(), Duration::ZERO);

        queue.close().await;

        // Each stalled push is abandoned after the deadline.
        let offsets: Vec<_> = sink.issued_at().iter().map(|at| *at - start).collect();
        assert_eq!(offsets, vec![Duration::ZERO, Duration::from_secs(1)]);
        let texts: Vec<_> = sink.pushes().into_iter().map(|p| p.text).collect();
        assert_eq!(texts, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_backlog_drops_newest() {
        let sink = RecordingSink::new();
        sink.set_delay(Duration::from_secs(5));
        let queue = PushQueue::spawn(
            "s1".to_string(),
            Arc::clone(&sink) as _,
            Duration::from_secs(10),
        );

        for i in 0..PUSH_BACKLOG + 4 {
            queue.enqueue(push(&i.to_string()));
        }
        queue.close().await;

        assert_eq!(sink.count(), PUSH_BACKLOG);
        assert_eq!(sink.pushes()[0].text, "0");
    }
}
