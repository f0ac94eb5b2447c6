//! Error types for symtrail-core.
//!
//! Only conditions that abort a query live here. Unresolved dependencies,
//! unrecognized symbol lines and "symbol not found" are ordinary data and are
//! reported through [`crate::report::QueryOutcome`] instead.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal query error.
#[derive(Error, Debug)]
pub enum FindError {
    /// The canonicalized root reference does not exist on the filesystem.
    #[error("root library not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    /// A required external tool cannot be found or executed.
    #[error("required tool `{tool}` is not available")]
    CollaboratorUnavailable { tool: String },

    /// A collaborator could not complete a call in the middle of a query.
    #[error("{operation} failed for {}", path.display())]
    CollaboratorFailed {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The symbol pattern could not be compiled.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The bounded worker pool could not be created.
    #[error("failed to build worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, FindError>;
