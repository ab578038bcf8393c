//! Error context extension trait
//!
//! `anyhow::Context` for `Result<T, IpsError>`: prefixes the error message
//! with where it happened while keeping the error category, so a
//! configuration failure deep inside file loading still maps to the
//! configuration exit code.
//!
//! # Examples
//!
//! ```rust
//! use ipsgen::domain::Result;
//! use ipsgen::domain::context::ResultExt;
//!
//! fn read_bundle(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
//! }
//!
//! let err = read_bundle("/nonexistent/bundle.json").unwrap_err();
//! assert!(err.to_string().contains("Failed to read /nonexistent/bundle.json"));
//! ```

use crate::domain::errors::IpsError;
use crate::domain::result::Result;

/// Extension trait adding `.context()` and `.with_context()` to results
/// whose error converts into [`IpsError`]
pub trait ResultExt<T> {
    /// Adds eagerly evaluated context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display;

    /// Adds context computed only on the error path
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<IpsError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display,
    {
        self.map_err(|e| prefixed(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| prefixed(e.into(), f()))
    }
}

fn prefixed(error: IpsError, context: impl std::fmt::Display) -> IpsError {
    match error {
        IpsError::Configuration(msg) => IpsError::Configuration(format!("{context}: {msg}")),
        IpsError::Io(msg) => IpsError::Io(format!("{context}: {msg}")),
        IpsError::Serialization(msg) => IpsError::Serialization(format!("{context}: {msg}")),
        IpsError::Validation(msg) => IpsError::Validation(format!("{context}: {msg}")),
        other => IpsError::Other(format!("{context}: {other}")),
    }
}
