//! Application-wide error types.
//!
//! The engine reports [`ReconcileError`]s and the config layer
//! [`ConfigError`]s; [`Error`] gathers them (plus I/O and JSON failures
//! from reading release files) for the CLI, which propagates with `anyhow`.
//!
//! ```ignore
//! use release_reconciler::error::{Result, ResultExt};
//!
//! fn read_release(path: &Path) -> Result<CanonicalRelease> {
//!     let json = std::fs::read_to_string(path).with_context("reading release")?;
//!     Ok(serde_json::from_str(&json)?)
//! }
//! ```

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::reconcile::ReconcileError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed release JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Provider or engine failure
    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether the underlying failure was a user-initiated cancellation.
    pub fn is_cancellation(&self) -> bool {
        match self {
            Error::Reconcile(e) => e.is_cancellation(),
            Error::WithContext { source, .. } => source.is_cancellation(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, serde_json::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Json(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ReconcileError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Reconcile(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("/releases/123.json");
        assert!(err.to_string().contains("/releases/123.json"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::from(ReconcileError::RateLimited).context("while searching iTunes");
        let msg = err.to_string();
        assert!(msg.contains("while searching iTunes"));
        assert!(msg.contains("Rate limited"));
    }

    #[test]
    fn test_cancellation_survives_context() {
        let result: std::result::Result<(), ReconcileError> = Err(ReconcileError::Cancelled);
        let err = result.with_context("reconciling release 42").unwrap_err();
        assert!(err.is_cancellation());
        assert!(!Error::not_found("x").is_cancellation());
    }

    #[test]
    fn test_json_result_ext() {
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err = result.with_context("parsing release").unwrap_err();
        assert!(err.to_string().starts_with("parsing release: JSON error"));
    }
}
