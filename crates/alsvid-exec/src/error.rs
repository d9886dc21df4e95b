//! Error types for loading and executing QIR modules.

use alsvid_hal::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, binding, or running a QIR module.
///
/// Load and build errors surface before execution and leave no
/// process-wide state behind; execution errors leave the active-interface
/// slots cleared, so recovery and retry are safe.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExecError {
    /// The module file could not be read.
    #[error("failed to read QIR file `{}`", path.display())]
    Io {
        /// Path passed to the loader.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The IR is malformed.
    #[error("failed to parse QIR module: {0}")]
    Parse(String),

    /// No function carries the `entry_point` marker (and none is named
    /// `main`).
    #[error("QIR module has no entry point")]
    NoEntryPoint,

    /// A recognized entry-point attribute has a non-parseable value.
    #[error("entry-point attribute `{key}` has invalid value `{value}`")]
    AttrInvalid {
        /// Attribute key.
        key: String,
        /// The value that failed to parse.
        value: String,
    },

    /// The JIT engine could not be created.
    #[error("failed to build JIT engine: {0}")]
    Engine(String),

    /// The module references a `__quantum__*` symbol outside the
    /// instruction set.
    #[error("unresolved quantum symbol `{0}`")]
    UnknownSymbol(String),

    /// A second `run` began while one was in flight.
    #[error("an execution is already in flight")]
    Reentrant,

    /// A backend method failed; carried out of the JIT'd program
    /// unchanged.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Result type for loader and executor operations.
pub type ExecResult<T> = Result<T, ExecError>;
