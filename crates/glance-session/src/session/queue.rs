use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::host::HostEvent;
use crate::session::context::SessionContext;
use crate::session::scheduler::{SessionEvent, SessionScheduler};

/// A live session: its inbox and the worker draining it.
pub struct SessionHandle {
    sender: mpsc::UnboundedSender<SessionEvent>,
    worker: JoinHandle<()>,
}

pub type SessionQueueMap = Arc<Mutex<HashMap<String, SessionHandle>>>;

pub fn new_session_queues() -> SessionQueueMap {
    Arc::new(Mutex::new(HashMap::new()))
}

/// Routes a host event to its session's worker, starting the session on
/// first sight.
pub async fn dispatch_event(
    queues: &SessionQueueMap,
    context: &Arc<SessionContext>,
    event: HostEvent,
) {
    match event {
        HostEvent::SessionStart { session } => {
            let mut queues = queues.lock().await;
            if queues.contains_key(&session) {
                debug!(%session, "Session already running");
            } else {
                let handle = spawn_session_worker(session.clone(), Arc::clone(context));
                queues.insert(session, handle);
            }
        }
        HostEvent::Notification { session, record } => {
            enqueue_event(queues, context, session, SessionEvent::Notification(record)).await;
        }
        HostEvent::Mode { session, mode } => {
            enqueue_event(queues, context, session, SessionEvent::Visibility(mode)).await;
        }
        HostEvent::SessionEnd { session } => {
            let handle = queues.lock().await.remove(&session);
            match handle {
                Some(handle) => end_session(&session, handle).await,
                None => debug!(%session, "Ignoring end for unknown session"),
            }
        }
    }
}

async fn enqueue_event(
    queues: &SessionQueueMap,
    context: &Arc<SessionContext>,
    session: String,
    event: SessionEvent,
) {
    let mut queues = queues.lock().await;
    let handle = queues
        .entry(session.clone())
        .or_insert_with(|| spawn_session_worker(session.clone(), Arc::clone(context)));

    if let Err(err) = handle.sender.send(event) {
        // Worker exited; restart the session and deliver the event there.
        warn!(%session, "Session worker gone, restarting");
        let event = err.0;
        let replacement = spawn_session_worker(session.clone(), Arc::clone(context));
        let _ = replacement.sender.send(event);
        queues.insert(session, replacement);
    }
}

/// Ends every session and waits for their workers to finish.
pub async fn shutdown_sessions(queues: &SessionQueueMap) {
    let sessions: Vec<(String, SessionHandle)> = queues.lock().await.drain().collect();
    for (session, handle) in sessions {
        end_session(&session, handle).await;
    }
}

async fn end_session(session: &str, handle: SessionHandle) {
    let _ = handle.sender.send(SessionEvent::End);
    if let Err(err) = handle.worker.await {
        warn!(%session, "Session worker failed: {err}");
    }
}

fn spawn_session_worker(session: String, context: Arc<SessionContext>) -> SessionHandle {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let worker = tokio::spawn(async move {
        info!(%session, "Session opened");
        let mut scheduler = SessionScheduler::new(session.clone(), context);
        scheduler.start();

        loop {
            tokio::select! {
                event = receiver.recv() => match event {
                    Some(SessionEvent::End) | None => break,
                    Some(event) => scheduler.handle(event),
                },
                surface = scheduler.next_tick() => scheduler.on_tick(surface),
            }
        }

        scheduler.close().await;
        info!(%session, "Session closed");
    });
    SessionHandle { sender, worker }
}
