//! PostgreSQL dialect.

use super::Dialect;
use crate::placeholder::PlaceholderStyle;

/// PostgreSQL dialect: quoted fields, `$n` parameters, native arrays.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Dollar
    }

    fn supports_arrays(&self) -> bool {
        true
    }
}
