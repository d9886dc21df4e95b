//! Backend error reporting.

use std::error::Error;
use thiserror::Error;

/// An error raised by a backend method.
///
/// The executor treats this as opaque: it is carried out of the JIT'd
/// program unchanged and handed back to the caller of `run`. Backends are
/// free to wrap a domain error as the source.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl BackendError {
    /// An error described by a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
            source: None,
        }
    }

    /// The error reported when a backend does not implement an operation.
    pub fn unsupported(op: &str) -> Self {
        BackendError::msg(format!("operation `{op}` is not supported by this backend"))
    }

    /// Wrap an underlying error with a message.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        BackendError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
