//! SQL Dialect support.
//!
//! The compiler emits one neutral text shape: generic `?` placeholders and
//! PostgreSQL-flavoured array operators. A dialect tells it how to delimit
//! field names, which random-ordering function to use, and whether array
//! operators are available at all. Stores use the same dialect to translate
//! placeholders before execution.

mod generic;
mod mysql;
mod postgres;
mod sqlite;

pub use generic::GenericDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::placeholder::PlaceholderStyle;
use crate::value::escape_quotes;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the delimiter wrapped around field names.
    ///
    /// An empty delimiter leaves fields bare.
    fn field_delimiter(&self) -> &'static str {
        "\""
    }

    /// Returns the positional parameter syntax the store executes with.
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Question
    }

    /// Returns whether `= ANY(..)`, `@>`, `<@` and `ARRAY[..]` are available.
    fn supports_arrays(&self) -> bool {
        false
    }

    /// Returns the expression used for random ordering.
    fn random_function(&self) -> &'static str {
        "RANDOM()"
    }

    /// Wraps a field name in the field delimiter.
    fn quote_field(&self, name: &str) -> String {
        let delim = self.field_delimiter();
        format!("{delim}{name}{delim}")
    }

    /// Returns the text of key `key` inside JSON column `column`.
    fn json_path(&self, column: &str, key: &str) -> String {
        format!("{}->>'{}'", self.quote_field(column), escape_quotes(key))
    }

    /// Returns the sort expression for key `key` inside JSON column
    /// `column`, coalesced to a number.
    fn json_sort(&self, column: &str, key: &str) -> String {
        format!(
            "COALESCE(({}->'{}')::float8, 0)",
            self.quote_field(column),
            escape_quotes(key)
        )
    }
}

macro_rules! forward_dialect {
    ($($ptr:ty),*) => {
        $(
            impl<D: Dialect + ?Sized> Dialect for $ptr {
                fn name(&self) -> &'static str {
                    (**self).name()
                }

                fn field_delimiter(&self) -> &'static str {
                    (**self).field_delimiter()
                }

                fn placeholder_style(&self) -> PlaceholderStyle {
                    (**self).placeholder_style()
                }

                fn supports_arrays(&self) -> bool {
                    (**self).supports_arrays()
                }

                fn random_function(&self) -> &'static str {
                    (**self).random_function()
                }

                fn quote_field(&self, name: &str) -> String {
                    (**self).quote_field(name)
                }

                fn json_path(&self, column: &str, key: &str) -> String {
                    (**self).json_path(column, key)
                }

                fn json_sort(&self, column: &str, key: &str) -> String {
                    (**self).json_sort(column, key)
                }
            }
        )*
    };
}

forward_dialect!(&D, Box<D>, std::sync::Arc<D>);

/// Looks up a built-in dialect by name.
///
/// Accepts `generic`, `postgres` (or `postgresql`, `pg`), `sqlite` and
/// `mysql`, case-insensitively.
#[must_use]
pub fn by_name(name: &str) -> Option<Box<dyn Dialect + Send + Sync>> {
    match name.to_ascii_lowercase().as_str() {
        "generic" => Some(Box::new(GenericDialect::new())),
        "postgres" | "postgresql" | "pg" => Some(Box::new(PostgresDialect::new())),
        "sqlite" => Some(Box::new(SqliteDialect::new())),
        "mysql" => Some(Box::new(MySqlDialect::new())),
        _ => None,
    }
}
