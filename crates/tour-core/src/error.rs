//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` where a
//! configuration problem surfaces from shared types.

use thiserror::Error;

/// The base error type for `tour-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `tour-core`.
pub type CoreResult<T> = Result<T, CoreError>;
