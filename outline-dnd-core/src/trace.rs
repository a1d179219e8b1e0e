//! Tracing initialization
//!
//! Structured logging setup for binaries embedding the engine. The
//! `RUST_LOG` environment variable takes precedence over the level passed
//! in, so a deployed build can be turned verbose without a code change.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::EnvFilter;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Default verbosity for the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational messages and above.
    #[default]
    Info,
    /// Debug messages and above.
    Debug,
    /// Everything.
    Trace,
}

impl TraceLevel {
    /// The filter directive for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// `init_tracing` was already called in this process.
    #[error("tracing is already initialized")]
    AlreadyInitialized,

    /// The global subscriber could not be installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns [`TraceError::AlreadyInitialized`] on a second call and
/// [`TraceError::Install`] if another subscriber was installed elsewhere.
pub fn init_tracing(level: TraceLevel) -> Result<(), TraceError> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(TraceError::AlreadyInitialized);
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| TraceError::Install(error.to_string()));
    if result.is_err() {
        INITIALIZED.store(false, Ordering::SeqCst);
    }
    result
}

/// Whether [`init_tracing`] has installed the subscriber.
#[must_use]
pub fn is_tracing_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_directives_are_lowercase() {
        assert_eq!(TraceLevel::Error.as_str(), "error");
        assert_eq!(TraceLevel::Trace.as_str(), "trace");
        assert_eq!(TraceLevel::default(), TraceLevel::Info);
    }

    #[test]
    fn second_initialization_is_rejected() {
        // The first call may fail if another test already installed a
        // subscriber; either way the second call must not succeed twice.
        let first = init_tracing(TraceLevel::Debug);
        let second = init_tracing(TraceLevel::Debug);
        assert!(first.is_err() || second.is_err());
        if first.is_ok() {
            assert!(matches!(second, Err(TraceError::AlreadyInitialized)));
            assert!(is_tracing_initialized());
        }
    }
}
