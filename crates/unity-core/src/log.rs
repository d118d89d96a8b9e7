//! Diagnostic output for the plugin.
//!
//! Everything in the workspace logs through `tracing`. [`init`] installs a
//! subscriber whose [`HostLogLayer`] forwards each event to the active
//! [`LogSink`]: the console by default, or the three host callbacks handed
//! over through `LinkDebug`.
//!
//! The filter is read from the `RENDERING_PLUGIN_LOG` environment variable
//! (`EnvFilter` syntax) and defaults to `info`.

use std::ffi::CString;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Once, PoisonError, RwLock};

use once_cell::sync::Lazy;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt as _};
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

use crate::ffi::HostLogFn;

/// Environment variable holding the log filter.
pub const LOG_FILTER_ENV: &str = "RENDERING_PLUGIN_LOG";

/// Destination for formatted log lines.
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default sink: the debugger output on Windows, stderr elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    fn write(&self, level: &str, message: &str) {
        #[cfg(target_os = "windows")]
        {
            if let Ok(line) = CString::new(format!("{level} {message}\n")) {
                unsafe {
                    windows::Win32::System::Diagnostics::Debug::OutputDebugStringA(
                        windows::core::PCSTR(line.as_ptr() as *const u8),
                    )
                };
            }
        }

        #[cfg(not(target_os = "windows"))]
        eprintln!("{level} {message}");
    }
}

impl LogSink for ConsoleSink {
    fn info(&self, message: &str) {
        self.write("INFO ", message);
    }

    fn warn(&self, message: &str) {
        self.write("WARN ", message);
    }

    fn error(&self, message: &str) {
        self.write("ERROR", message);
    }
}

/// Sink that calls back into the host. Channels the host left null fall
/// back to the console.
#[derive(Debug, Clone, Copy)]
pub struct HostCallbackSink {
    info: Option<HostLogFn>,
    warn: Option<HostLogFn>,
    error: Option<HostLogFn>,
}

impl HostCallbackSink {
    /// Returns `None` when every channel is null.
    pub fn new(
        info: Option<HostLogFn>,
        warn: Option<HostLogFn>,
        error: Option<HostLogFn>,
    ) -> Option<Self> {
        if info.is_none() && warn.is_none() && error.is_none() {
            return None;
        }
        Some(Self { info, warn, error })
    }

    fn send(channel: Option<HostLogFn>, message: &str, fallback: impl FnOnce(&str)) {
        let Some(callback) = channel else {
            fallback(message);
            return;
        };
        // Interior NULs would truncate the host string.
        let line = CString::new(message.replace('\0', " ")).unwrap_or_default();
        unsafe { callback(line.as_ptr()) };
    }
}

impl LogSink for HostCallbackSink {
    fn info(&self, message: &str) {
        Self::send(self.info, message, |m| ConsoleSink.info(m));
    }

    fn warn(&self, message: &str) {
        Self::send(self.warn, message, |m| ConsoleSink.warn(m));
    }

    fn error(&self, message: &str) {
        Self::send(self.error, message, |m| ConsoleSink.error(m));
    }
}

/// Swappable slot holding the active sink.
#[derive(Clone)]
pub struct SinkSlot(Arc<RwLock<Arc<dyn LogSink>>>);

impl SinkSlot {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self(Arc::new(RwLock::new(sink)))
    }

    pub fn set(&self, sink: Arc<dyn LogSink>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = sink;
    }

    pub fn get(&self) -> Arc<dyn LogSink> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

static GLOBAL_SINK: Lazy<SinkSlot> = Lazy::new(|| SinkSlot::new(Arc::new(ConsoleSink)));
static INIT: Once = Once::new();

/// Install the process-wide subscriber. Safe to call repeatedly; if another
/// global subscriber already exists it is left in place.
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(HostLogLayer::new(GLOBAL_SINK.clone()))
            .try_init();
    });
}

/// Route subsequent log lines to `sink`.
pub fn set_sink(sink: Arc<dyn LogSink>) {
    GLOBAL_SINK.set(sink);
}

/// Route subsequent log lines back to the console.
pub fn reset_sink() {
    GLOBAL_SINK.set(Arc::new(ConsoleSink));
}

/// `tracing` layer forwarding events to a [`SinkSlot`].
pub struct HostLogLayer {
    slot: SinkSlot,
}

impl HostLogLayer {
    pub fn new(slot: SinkSlot) -> Self {
        Self { slot }
    }
}

impl<S: Subscriber> Layer<S> for HostLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        let line = format!("[{}] {}", meta.target(), visitor.finish());

        let sink = self.slot.get();
        match *meta.level() {
            Level::ERROR => sink.error(&line),
            Level::WARN => sink.warn(&line),
            _ => sink.info(&line),
        }
    }
}

/// Collects the `message` field plus any structured fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        self.message + &self.fields
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
