//! Field keys and their addressed forms.
//!
//! A field key is a column name, optionally qualified:
//!
//! - `A:B` addresses element `B` of array column `A`,
//! - `A.B` addresses key `B` of JSON column `A`.
//!
//! The colon form wins when both separators appear. Anything after the
//! second part is ignored.

use crate::dialect::Dialect;

/// A parsed field key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAddress<'a> {
    /// A plain column.
    Plain(&'a str),
    /// A key inside a JSON column.
    JsonPath {
        /// The JSON column.
        column: &'a str,
        /// The key inside it.
        key: &'a str,
    },
    /// An element of an array column.
    ArrayIndex {
        /// The array column.
        column: &'a str,
        /// The element subscript.
        index: &'a str,
    },
}

impl<'a> FieldAddress<'a> {
    /// Parses a field key.
    #[must_use]
    pub fn parse(key: &'a str) -> Self {
        if let Some((column, index)) = first_two(key, ':') {
            Self::ArrayIndex { column, index }
        } else if let Some((column, key)) = first_two(key, '.') {
            Self::JsonPath { column, key }
        } else {
            Self::Plain(key)
        }
    }

    /// Returns `true` for array-index addresses.
    #[must_use]
    pub const fn is_array_index(&self) -> bool {
        matches!(self, Self::ArrayIndex { .. })
    }

    /// Returns `true` for JSON-path addresses.
    #[must_use]
    pub const fn is_json_path(&self) -> bool {
        matches!(self, Self::JsonPath { .. })
    }

    /// Renders the address for use in a condition.
    pub fn render<D: Dialect + ?Sized>(&self, dialect: &D) -> String {
        match self {
            Self::Plain(name) => dialect.quote_field(name),
            Self::JsonPath { column, key } => dialect.json_path(column, key),
            Self::ArrayIndex { column, index } => {
                format!("{}[{index}]", dialect.quote_field(column))
            }
        }
    }

    /// Renders the address for use in an `ORDER BY` entry.
    ///
    /// JSON values are coalesced to a number so that documents holding
    /// numbers of mixed JSON types still sort. The expression itself comes
    /// from the dialect.
    pub fn render_sort<D: Dialect + ?Sized>(&self, dialect: &D) -> String {
        match self {
            Self::JsonPath { column, key } => dialect.json_sort(column, key),
            _ => self.render(dialect),
        }
    }
}

fn first_two(key: &str, separator: char) -> Option<(&str, &str)> {
    let mut parts = key.split(separator);
    match (parts.next(), parts.next()) {
        (Some(first), Some(second)) => Some((first, second)),
        _ => None,
    }
}
