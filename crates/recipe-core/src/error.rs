//! Core error types for recipe-core.
//!
//! Input problems are caught here, before anything reaches a store.

use thiserror::Error;

/// Errors produced while validating domain input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A field failed a structural check (blank, too long, wrong characters,
    /// out-of-range paging parameter).
    #[error("invalid argument '{field}': {reason}")]
    InvalidArgument { field: &'static str, reason: String },
}

impl CoreError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}
