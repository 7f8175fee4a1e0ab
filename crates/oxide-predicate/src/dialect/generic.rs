//! Generic SQL dialect.

use super::Dialect;

/// The default dialect.
///
/// Fields render bare and array operators are allowed, so the output is
/// exactly the neutral text a store is expected to translate.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn field_delimiter(&self) -> &'static str {
        ""
    }

    fn supports_arrays(&self) -> bool {
        true
    }
}
