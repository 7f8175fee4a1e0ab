//! MySQL dialect.

use super::Dialect;
use crate::value::escape_quotes;

/// MySQL dialect: backtick fields, `?` parameters, no arrays.
///
/// JSON keys are addressed through `$.key` paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn field_delimiter(&self) -> &'static str {
        "`"
    }

    fn random_function(&self) -> &'static str {
        "RAND()"
    }

    fn json_path(&self, column: &str, key: &str) -> String {
        format!("{}->>'$.{}'", self.quote_field(column), escape_quotes(key))
    }

    fn json_sort(&self, column: &str, key: &str) -> String {
        format!(
            "COALESCE(CAST({} AS DOUBLE), 0)",
            self.json_path(column, key)
        )
    }
}
