//! Shared error type.
//!
//! Sub-crates define their own error enums; `CoreError` covers what every
//! stage can hit before any computation starts: bad configuration.

use thiserror::Error;

/// Errors raised by `siting-core` validation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `siting-core`.
pub type CoreResult<T> = Result<T, CoreError>;
