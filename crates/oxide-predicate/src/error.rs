//! Error types for predicate compilation.

use thiserror::Error;

/// Compilation errors.
///
/// Lenient compilation (the default) only ever reports [`DepthExceeded`]
/// and [`UnsupportedOperator`]; the other kinds are raised when strict
/// validation is requested.
///
/// [`DepthExceeded`]: CompileError::DepthExceeded
/// [`UnsupportedOperator`]: CompileError::UnsupportedOperator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// An operator sigil outside the known comparison set.
    #[error("unrecognized operator '{sigil}' on field '{field}'")]
    UnrecognizedOperator {
        /// Field key the operator was applied to.
        field: String,
        /// The sigil as supplied.
        sigil: String,
    },

    /// An operand whose shape does not fit its operator.
    #[error("malformed operand for '{operator}' on field '{field}': {reason}")]
    MalformedOperand {
        /// Field key the operator was applied to.
        field: String,
        /// The operator sigil.
        operator: String,
        /// What was wrong with the operand.
        reason: String,
    },

    /// Emitted placeholders and collected parameters disagree.
    #[error("condition has {placeholders} placeholders but {parameters} parameters")]
    PlaceholderParameterMismatch {
        /// Placeholders counted in the condition text.
        placeholders: usize,
        /// Parameters collected.
        parameters: usize,
    },

    /// Condition groups nested deeper than the configured limit.
    #[error("condition groups nested deeper than {limit} levels")]
    DepthExceeded {
        /// The configured maximum depth.
        limit: usize,
    },

    /// An operator the target dialect cannot express.
    #[error("operator '{operator}' is not supported by the {dialect} dialect")]
    UnsupportedOperator {
        /// The operator sigil.
        operator: String,
        /// Name of the dialect.
        dialect: &'static str,
    },

    /// Input that cannot be read as a filter.
    #[error("invalid filter input: {0}")]
    InvalidInput(String),
}

/// Result type alias for compilation.
pub type Result<T> = std::result::Result<T, CompileError>;
