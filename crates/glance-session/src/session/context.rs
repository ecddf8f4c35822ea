use std::sync::Arc;

use glance_core::config::{Config, RefreshConfig, RefreshVariant};
use glance_core::format::{ClockSample, Formatter};

use crate::sink::DisplaySink;

/// Shared, read-only inputs for every session: layout, refresh settings,
/// the display sink and the clock.
pub struct SessionContext {
    formatter: Formatter,
    refresh: RefreshConfig,
    sink: Arc<dyn DisplaySink>,
    clock: fn() -> ClockSample,
}

impl SessionContext {
    pub fn new(formatter: Formatter, refresh: RefreshConfig, sink: Arc<dyn DisplaySink>) -> Self {
        Self {
            formatter,
            refresh,
            sink,
            clock: ClockSample::now,
        }
    }

    pub fn from_config(config: &Config, sink: Arc<dyn DisplaySink>) -> Self {
        Self::new(
            Formatter::from_config(&config.display),
            config.refresh.clone(),
            sink,
        )
    }

    /// Replaces the wall clock, e.g. with a fixed sample in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> ClockSample) -> Self {
        self.clock = clock;
        self
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn refresh(&self) -> &RefreshConfig {
        &self.refresh
    }

    pub fn variant(&self) -> RefreshVariant {
        self.refresh.variant
    }

    pub fn sink(&self) -> &Arc<dyn DisplaySink> {
        &self.sink
    }

    pub fn clock(&self) -> ClockSample {
        (self.clock)()
    }
}
