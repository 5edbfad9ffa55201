//! Process logging.
//!
//! Logging is carried as an explicit [`LogHandle`] instead of a global
//! subscriber, so the dispatcher and its worker threads log through the handle
//! they were given. Events are written by a non-blocking stderr appender; the
//! appender's guard lives inside the handle and flushes on the last drop.

use clap::ValueEnum;
use std::sync::Arc;
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Output encoding of process log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line
    #[value(name = "json")]
    Json,
    /// Human-readable lines
    #[value(name = "text")]
    Text,
}

/// A cloneable handle to the process logger.
#[derive(Clone)]
pub struct LogHandle {
    dispatch: Dispatch,
    _guard: Option<Arc<WorkerGuard>>,
}

impl LogHandle {
    /// Build the process logger writing to stderr.
    pub fn init(format: LogFormat) -> Self {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer);

        let dispatch = match format {
            LogFormat::Json => Dispatch::new(
                builder
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .finish(),
            ),
            LogFormat::Text => Dispatch::new(builder.with_target(false).finish()),
        };

        Self {
            dispatch,
            _guard: Some(Arc::new(guard)),
        }
    }

    /// Wrap an existing dispatcher, e.g. a test subscriber.
    pub fn new(dispatch: Dispatch) -> Self {
        Self {
            dispatch,
            _guard: None,
        }
    }

    /// A handle that drops every event.
    pub fn none() -> Self {
        Self::new(Dispatch::none())
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this handle as the thread's default logger.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle")
            .field("buffered", &self._guard.is_some())
            .finish()
    }
}
