//! SQLite dialect.

use super::Dialect;
use crate::value::escape_quotes;

/// SQLite dialect.
///
/// SQLite understands `->>` on JSON text but has no array type, so the
/// array operators and array-index keys are refused. JSON sorts cast
/// through `REAL` instead of PostgreSQL's `::float8`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn json_sort(&self, column: &str, key: &str) -> String {
        format!(
            "COALESCE(CAST({}->>'{}' AS REAL), 0)",
            self.quote_field(column),
            escape_quotes(key)
        )
    }
}
