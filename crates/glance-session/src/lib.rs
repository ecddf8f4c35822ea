//! Per-session display scheduling for glance.
//!
//! Each session gets its own queue and worker task. The worker owns the
//! session's scheduler, so events for one session never overlap, while
//! sessions run independently of each other.

use std::sync::Arc;

use anyhow::Result;
use glance_core::config::Config;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub mod host;
pub mod session;
pub mod sink;

use crate::session::SessionContext;
use crate::sink::{DisplaySink, JsonLinesSink, WebhookSink};

/// Runs the host on stdin/stdout (or the configured webhook) until end of
/// input or Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let sink = build_sink(&config)?;
    let context = Arc::new(SessionContext::from_config(&config, sink));

    info!(
        variant = config.refresh.variant.display_name(),
        interval_ms = config.refresh.interval().as_millis() as u64,
        line_width = config.display.line_width,
        "glance started. Reading events from stdin..."
    );

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal_token.cancel(),
            Err(err) => warn!("Failed to listen for Ctrl-C: {err}"),
        }
    });

    let result = host::serve(BufReader::new(tokio::io::stdin()), context, shutdown).await;
    info!("Shutting down glance.");
    result
}

fn build_sink(config: &Config) -> Result<Arc<dyn DisplaySink>> {
    match config.sink.effective_webhook_url() {
        Some(url) => {
            let sink = WebhookSink::new(url, config.sink.webhook_timeout())?;
            info!(url = sink.url(), "Pushing to webhook");
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(JsonLinesSink::stdout())),
    }
}
