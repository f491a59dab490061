//! Result and error types for Ensayar.

use thiserror::Error;

use crate::assertion::AggregateFailure;

/// Result type for Ensayar operations
pub type EnsayarResult<T> = Result<T, EnsayarError>;

/// Errors that can occur in Ensayar
#[derive(Debug, Error)]
pub enum EnsayarError {
    /// Symbolic element name not present in a locator registry
    #[error("unknown element '{name}' (not in the locator registry)")]
    UnknownElement {
        /// The symbolic name that failed to resolve
        name: String,
    },

    /// Locator resolved to nothing in the current DOM
    #[error("element not found: {selector}")]
    ElementNotFound {
        /// The selector that matched nothing
        selector: String,
    },

    /// A wait condition never became true within its budget
    #[error("timed out after {ms}ms waiting for {condition} (last seen: {last_seen})")]
    WaitTimeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the condition that was polled
        condition: String,
        /// Last state observed before expiry, for diagnostics
        last_seen: String,
    },

    /// A hard precondition check failed
    #[error("precondition failed: {message}")]
    Precondition {
        /// Error message
        message: String,
    },

    /// One or more soft checks failed at flush
    #[error(transparent)]
    Aggregate(#[from] AggregateFailure),

    /// Operation attempted on a closed browser session
    #[error("browser session is closed")]
    SessionClosed,

    /// Navigation failed
    #[error("navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Browser-side fault (launch, evaluation, protocol)
    #[error("browser error: {message}")]
    Browser {
        /// Error message
        message: String,
    },

    /// Configuration loading or validation error
    #[error("configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EnsayarError {
    /// Whether this error means "the element is not there right now".
    ///
    /// Wait conditions treat this as "not yet satisfied" and keep polling;
    /// every other error aborts the wait immediately.
    #[must_use]
    pub const fn is_transient_absence(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}
