//! Display sinks: where rendered text goes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use glance_core::display::DisplaySurface;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

pub type PushFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// One rendered block for one surface of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPush {
    pub session: String,
    pub surface: DisplaySurface,
    pub text: String,
}

/// Accepts rendered text for a surface. Pushes may fail; callers log and
/// move on.
pub trait DisplaySink: Send + Sync {
    fn push(&self, push: DisplayPush) -> PushFuture;
}

/// Writes each push as one JSON line.
pub struct JsonLinesSink<W> {
    writer: Arc<Mutex<W>>,
}

impl<W> Clone for JsonLinesSink<W> {
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
        }
    }
}

impl<W> JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    #[cfg(test)]
    pub(crate) fn writer(&self) -> Arc<Mutex<W>> {
        Arc::clone(&self.writer)
    }
}

impl JsonLinesSink<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> DisplaySink for JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn push(&self, push: DisplayPush) -> PushFuture {
        let writer = Arc::clone(&self.writer);
        Box::pin(async move {
            let mut line = serde_json::to_vec(&push).context("encode display push")?;
            line.push(b'\n');
            let mut writer = writer.lock().await;
            writer.write_all(&line).await.context("write display push")?;
            writer.flush().await.context("flush display push")?;
            Ok(())
        })
    }
}

/// POSTs each push as JSON to a fixed URL.
#[derive(Clone)]
pub struct WebhookSink {
    http: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build webhook client")?;
        Ok(Self { http, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DisplaySink for WebhookSink {
    fn push(&self, push: DisplayPush) -> PushFuture {
        let http = self.http.clone();
        let url = self.url.clone();
        Box::pin(async move {
            let response = http
                .post(&url)
                .json(&push)
                .send()
                .await
                .map_err(|err| anyhow!("Webhook request failed: {err}"))?;

            if !response.status().is_success() {
                bail!("Webhook push failed with status {}", response.status());
            }
            Ok(())
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;

    /// Records pushes in memory as they are issued; can be switched to fail
    /// every push or to stall before completing.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pushes: Mutex<Vec<(DisplayPush, Instant)>>,
        failing: AtomicBool,
        delay: Mutex<Duration>,
    }

    impl RecordingSink {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub(crate) fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub(crate) fn set_delay(&self, delay: Duration) {
            *self.delay.lock().unwrap() = delay;
        }

        pub(crate) fn pushes(&self) -> Vec<DisplayPush> {
            self.pushes
                .lock()
                .unwrap()
                .iter()
                .map(|(push, _)| push.clone())
                .collect()
        }

        pub(crate) fn issued_at(&self) -> Vec<Instant> {
            self.pushes.lock().unwrap().iter().map(|(_, at)| *at).collect()
        }

        pub(crate) fn count(&self) -> usize {
            self.pushes.lock().unwrap().len()
        }
    }

    impl DisplaySink for RecordingSink {
        fn push(&self, push: DisplayPush) -> PushFuture {
            let result = if self.failing.load(Ordering::SeqCst) {
                Err(anyhow!("transport closed"))
            } else {
                self.pushes.lock().unwrap().push((push, Instant::now()));
                Ok(())
            };
            let delay = *self.delay.lock().unwrap();
            Box::pin(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            })
        }
    }
}
