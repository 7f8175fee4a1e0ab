//! The compilation result.

use serde::Serialize;

use crate::error::{CompileError, Result};
use crate::placeholder::{count_placeholders, rewrite_placeholders, PlaceholderStyle};
use crate::value::SqlValue;

/// A compiled filter: condition text, bind values and ordering.
///
/// The condition always uses generic `?` placeholders, one per entry of
/// `params`, left to right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compiled {
    /// The condition, suitable after `WHERE`.
    pub condition: String,
    /// Bind values in placeholder order.
    pub params: Vec<SqlValue>,
    /// `ORDER BY ...`, or empty.
    pub order_by: String,
}

impl Compiled {
    /// The always-true condition.
    pub const ALWAYS_TRUE: &'static str = "1=1";

    /// Returns the number of generic placeholders in the condition.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.condition)
    }

    /// Verifies that placeholders and parameters line up.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::PlaceholderParameterMismatch`] when the
    /// counts differ.
    pub fn check_parity(&self) -> Result<()> {
        let placeholders = self.placeholder_count();
        if placeholders == self.params.len() {
            Ok(())
        } else {
            Err(CompileError::PlaceholderParameterMismatch {
                placeholders,
                parameters: self.params.len(),
            })
        }
    }

    /// Returns the condition with placeholders rewritten into `style`.
    #[must_use]
    pub fn condition_for(&self, style: PlaceholderStyle) -> String {
        rewrite_placeholders(&self.condition, style)
    }
}

impl Default for Compiled {
    fn default() -> Self {
        Self {
            condition: Self::ALWAYS_TRUE.to_string(),
            params: Vec::new(),
            order_by: String::new(),
        }
    }
}
