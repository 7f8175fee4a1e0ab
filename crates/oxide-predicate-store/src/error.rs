//! Error types for store execution.

use oxide_predicate::CompileError;
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The filter could not be compiled, or its result is inconsistent.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// A bind value the store has no encoding for.
    #[error("parameter {index} cannot be bound: {kind} values are not supported by {dialect}")]
    UnsupportedParameter {
        /// Zero-based position in the parameter list.
        index: usize,
        /// Kind of the rejected value.
        kind: &'static str,
        /// Name of the store's dialect.
        dialect: &'static str,
    },
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
