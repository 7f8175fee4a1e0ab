//! Statements built around a compiled condition.

use oxide_predicate::{Compiled, Dialect};

/// The statement shapes a store runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    /// `SELECT * ... WHERE ... ORDER BY ...`
    Select,
    /// `SELECT COUNT(*) ... WHERE ...`
    Count,
    /// `DELETE ... WHERE ...`
    Delete,
}

impl Statement {
    /// Renders the statement for `table`, with placeholders in the
    /// dialect's positional syntax.
    ///
    /// Ordering only applies to [`Statement::Select`].
    pub fn render<D: Dialect + ?Sized>(self, dialect: &D, table: &str, compiled: &Compiled) -> String {
        let table = dialect.quote_field(table);
        let condition = compiled.condition_for(dialect.placeholder_style());
        let condition = condition.trim_end();

        match self {
            Self::Select if compiled.order_by.is_empty() => {
                format!("SELECT * FROM {table} WHERE {condition}")
            }
            Self::Select => {
                format!("SELECT * FROM {table} WHERE {condition} {}", compiled.order_by)
            }
            Self::Count => format!("SELECT COUNT(*) FROM {table} WHERE {condition}"),
            Self::Delete => format!("DELETE FROM {table} WHERE {condition}"),
        }
    }
}
