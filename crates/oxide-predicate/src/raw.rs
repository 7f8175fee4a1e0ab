//! Literal SQL conditions.
//!
//! A caller may hand over a ready-made condition instead of groups. The
//! only processing is pulling a trailing `ORDER BY` off the text so the
//! store can place it after its own clauses.

/// Splits `sql` at the first case-insensitive `order by`.
///
/// Returns `(condition, order_by)`. The order-by part keeps its original
/// spelling and everything up to the end of the input; it is empty when
/// there is no match.
#[must_use]
pub fn split_order_by(sql: &str) -> (&str, &str) {
    // ASCII lowering keeps byte offsets, so the index is valid in `sql`.
    match sql.to_ascii_lowercase().find("order by") {
        Some(at) => sql.split_at(at),
        None => (sql, ""),
    }
}
