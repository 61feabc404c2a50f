//! # Logging Capability
//!
//! The core logs lifecycle events through a narrow injected sink rather
//! than a global logger, so callers control where connection events go
//! and tests can capture them.

/// Logging sink with exactly the levels the client emits.
///
/// Shared read-only across operations; implementations must tolerate
/// concurrent invocation.
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
    fn error(&self, message: &str);
    fn trace(&self, message: &str);
}

/// Production sink forwarding each level to the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }

    fn trace(&self, message: &str) {
        tracing::trace!("{message}");
    }
}
