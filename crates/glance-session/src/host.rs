//! JSON-lines event host.
//!
//! Reads one event per line, routes it to the session's worker, and tears
//! every session down at end of input or on shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use glance_core::display::{NotificationRecord, VisibilityMode};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::session::{SessionContext, dispatch_event, new_session_queues, shutdown_sessions};

/// One inbound line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    SessionStart {
        session: String,
    },
    Notification {
        session: String,
        #[serde(flatten)]
        record: NotificationRecord,
    },
    Mode {
        session: String,
        mode: VisibilityMode,
    },
    SessionEnd {
        session: String,
    },
}

impl HostEvent {
    pub fn session(&self) -> &str {
        match self {
            HostEvent::SessionStart { session }
            | HostEvent::Notification { session, .. }
            | HostEvent::Mode { session, .. }
            | HostEvent::SessionEnd { session } => session,
        }
    }
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_event_line(line: &str) -> Result<Option<HostEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .context("parse host event")
}

/// Serves events from `reader` until end of input or `shutdown` fires.
pub async fn serve<R>(
    reader: R,
    context: Arc<SessionContext>,
    shutdown: CancellationToken,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let queues = new_session_queues();
    let mut lines = reader.lines();
    let mut line_no: u64 = 0;

    let result = loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                info!("Shutdown requested");
                break Ok(());
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        debug!("Event stream closed");
                        break Ok(());
                    }
                    Err(err) => break Err(err).context("read event stream"),
                };
                line_no += 1;

                match parse_event_line(&line) {
                    Ok(Some(event)) => dispatch_event(&queues, &context, event).await,
                    Ok(None) => {}
                    Err(err) => warn!(line = line_no, "Skipping malformed event: {err:#}"),
                }
            }
        }
    };

    shutdown_sessions(&queues).await;
    result
}
