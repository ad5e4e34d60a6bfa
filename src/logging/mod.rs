//! The `LogSink` external contract: every subsystem that needs to report
//! operational events — retries, drops, snapshot failures — goes through
//! this trait instead of calling `tracing` macros directly, so a host
//! embedding the engine can redirect that output anywhere.
//!
//! Internal, purely diagnostic logging (module-load messages, request
//! tracing) still uses `tracing` macros directly, kept separate from this
//! application-level callback surface.

/// Four-method sink used for operational logging callbacks.
pub trait LogSink: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default sink: forwards every call into `tracing`, so a host that doesn't
/// care can just let `tracing-subscriber` handle it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSink {
        messages: Mutex<Vec<String>>,
    }

    impl LogSink for RecordingSink {
        fn debug(&self, message: &str) {
            self.messages.lock().unwrap_or_else(|e| e.into_inner()).push(format!("DEBUG {message}"));
        }
        fn info(&self, message: &str) {
            self.messages.lock().unwrap_or_else(|e| e.into_inner()).push(format!("INFO {message}"));
        }
        fn warn(&self, message: &str) {
            self.messages.lock().unwrap_or_else(|e| e.into_inner()).push(format!("WARN {message}"));
        }
        fn error(&self, message: &str) {
            self.messages.lock().unwrap_or_else(|e| e.into_inner()).push(format!("ERROR {message}"));
        }
    }

    #[test]
    fn sink_trait_object_is_usable_through_arc() {
        let sink: Arc<dyn LogSink> = Arc::new(RecordingSink::default());
        sink.info("hello");
        sink.warn("careful");
    }

    #[test]
    fn tracing_sink_does_not_panic() {
        let sink = TracingLogSink;
        sink.debug("d");
        sink.info("i");
        sink.warn("w");
        sink.error("e");
    }
}
