//! Per-session display state and the visibility state machine.
//!
//! Every event is handled to completion before the next one; the session
//! worker in `queue.rs` guarantees that by owning the scheduler. Rendered
//! surfaces are handed to a `PushQueue`, so a slow sink never holds up
//! the next event or tick.

use std::sync::Arc;

use glance_core::config::RefreshVariant;
use glance_core::display::{DisplaySurface, NotificationRecord, VisibilityMode};
use tracing::debug;

use crate::session::context::SessionContext;
use crate::session::push::PushQueue;
use crate::session::timer::RefreshTimer;
use crate::sink::DisplayPush;

/// Inbound events for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Notification(NotificationRecord),
    Visibility(VisibilityMode),
    End,
}

/// Mutable per-session state.
///
/// `timer` is present iff the display is visible.
#[derive(Debug, Default)]
struct SessionDisplayState {
    notification: Option<NotificationRecord>,
    scroll_offset: u64,
    timer: Option<RefreshTimer>,
}

impl SessionDisplayState {
    /// Replaces any running timer; the old one is dropped (cancelled) first.
    fn start_timer(&mut self, timer: RefreshTimer) {
        self.stop_timer();
        self.timer = Some(timer);
    }

    fn stop_timer(&mut self) -> bool {
        self.timer.take().is_some()
    }
}

pub struct SessionScheduler {
    session_id: String,
    context: Arc<SessionContext>,
    mode: VisibilityMode,
    state: SessionDisplayState,
    pushes: PushQueue,
}

impl SessionScheduler {
    /// Creates the scheduler and its push queue. Must run inside a tokio
    /// runtime.
    pub fn new(session_id: impl Into<String>, context: Arc<SessionContext>) -> Self {
        let session_id = session_id.into();
        let pushes = PushQueue::spawn(
            session_id.clone(),
            Arc::clone(context.sink()),
            context.refresh().interval(),
        );
        Self {
            session_id,
            context,
            mode: VisibilityMode::Hidden,
            state: SessionDisplayState::default(),
            pushes,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn mode(&self) -> VisibilityMode {
        self.mode
    }

    pub fn notification(&self) -> Option<&NotificationRecord> {
        self.state.notification.as_ref()
    }

    pub fn scroll_offset(&self) -> u64 {
        self.state.scroll_offset
    }

    pub fn timer_active(&self) -> bool {
        self.state.timer.is_some()
    }

    /// Surface the running timer refreshes, if any.
    pub fn timer_surface(&self) -> Option<DisplaySurface> {
        self.state.timer.as_ref().map(RefreshTimer::surface)
    }

    /// Pre-populates both surfaces so content is cached before the user
    /// first looks up.
    pub fn start(&mut self) {
        debug!(session = %self.session_id, "Session started");
        self.push_all();
    }

    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Notification(record) => self.on_notification(record),
            SessionEvent::Visibility(mode) => self.on_visibility(mode),
            SessionEvent::End => self.shutdown(),
        }
    }

    fn on_notification(&mut self, record: NotificationRecord) {
        debug!(session = %self.session_id, app = %record.app, "Notification received");
        self.state.notification = Some(record);
        self.state.scroll_offset = 0;
        self.push_all();
    }

    fn on_visibility(&mut self, mode: VisibilityMode) {
        debug!(session = %self.session_id, from = %self.mode, to = %mode, "Visibility changed");
        self.mode = mode;
        match mode.surface() {
            None => {
                self.state.stop_timer();
            }
            Some(surface) => {
                self.state.stop_timer();
                self.push(surface);
                let period = self.context.refresh().interval();
                self.state.start_timer(RefreshTimer::start(surface, period));
            }
        }
    }

    /// Waits for the running timer's next tick; never resolves while hidden.
    pub async fn next_tick(&mut self) -> DisplaySurface {
        match self.state.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
                timer.surface()
            }
            None => std::future::pending().await,
        }
    }

    pub fn on_tick(&mut self, surface: DisplaySurface) {
        if !self.timer_active() {
            return;
        }
        match self.context.variant() {
            RefreshVariant::Clock => self.push(surface),
            RefreshVariant::Scroll => {
                let step = self.context.refresh().scroll_step;
                self.state.scroll_offset = self.state.scroll_offset.saturating_add(step);
                self.push_all();
            }
        }
    }

    /// Cancels the refresh timer. The session is done after this.
    pub fn shutdown(&mut self) {
        if self.state.stop_timer() {
            debug!(session = %self.session_id, "Refresh timer cancelled on shutdown");
        }
        self.mode = VisibilityMode::Hidden;
    }

    /// Shuts the session down and waits for queued pushes to go out.
    pub async fn close(mut self) {
        self.shutdown();
        self.pushes.close().await;
    }

    fn push_all(&self) {
        for surface in DisplaySurface::all() {
            self.push(*surface);
        }
    }

    /// Renders one surface and queues it for the sink. Delivery failures are
    /// logged by the queue; the next tick or event tries again.
    fn push(&self, surface: DisplaySurface) {
        let clock = self.context.clock();
        let text = self.context.formatter().format(
            surface,
            self.state.notification.as_ref(),
            self.state.scroll_offset,
            &clock,
        );
        let push = DisplayPush {
            session: self.session_id.clone(),
            surface,
            text,
        };
        self.pushes.enqueue(push);
    }
}
