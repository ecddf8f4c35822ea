pub(crate) mod context;
pub(crate) mod push;
pub(crate) mod queue;
pub(crate) mod scheduler;
pub(crate) mod timer;

pub use context::SessionContext;
pub use queue::{SessionQueueMap, dispatch_event, new_session_queues, shutdown_sessions};
pub use scheduler::{SessionEvent, SessionScheduler};
