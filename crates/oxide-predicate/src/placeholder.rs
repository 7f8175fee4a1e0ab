//! Generic placeholder bookkeeping.
//!
//! Compiled conditions always use `?`. These helpers count them (the
//! parity check) and rewrite them into a store's positional syntax.
//! Question marks inside quoted literals or quoted identifiers are text,
//! not placeholders.

use serde::Deserialize;

/// Positional parameter syntax of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?` (SQLite, MySQL).
    #[default]
    Question,
    /// `$1`, `$2`, ... (PostgreSQL).
    Dollar,
    /// `:1`, `:2`, ... (Oracle).
    Colon,
}

impl PlaceholderStyle {
    /// Renders the placeholder for the 1-based position `index`.
    #[must_use]
    pub fn render(self, index: usize) -> String {
        match self {
            Self::Question => String::from("?"),
            Self::Dollar => format!("${index}"),
            Self::Colon => format!(":{index}"),
        }
    }
}

enum Piece {
    Text(char),
    Placeholder,
}

/// Walks `sql`, reporting each `?` outside quotes as a placeholder and
/// everything else as text.
fn scan(sql: &str, mut visit: impl FnMut(Piece)) {
    let mut quote: Option<char> = None;
    for ch in sql.chars() {
        match (quote, ch) {
            (None, '\'' | '"' | '`') => {
                quote = Some(ch);
                visit(Piece::Text(ch));
            }
            // A doubled quote closes and reopens, keeping escapes balanced.
            (Some(open), _) if open == ch => {
                quote = None;
                visit(Piece::Text(ch));
            }
            (None, '?') => visit(Piece::Placeholder),
            _ => visit(Piece::Text(ch)),
        }
    }
}

/// Counts the generic placeholders in `sql`.
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    scan(sql, |piece| {
        if matches!(piece, Piece::Placeholder) {
            count += 1;
        }
    });
    count
}

/// Rewrites every generic placeholder in `sql` into `style`, numbering
/// from 1.
#[must_use]
pub fn rewrite_placeholders(sql: &str, style: PlaceholderStyle) -> String {
    if style == PlaceholderStyle::Question {
        return sql.to_string();
    }
    let mut out = String::with_capacity(sql.len() + 8);
    let mut index = 0;
    scan(sql, |piece| match piece {
        Piece::Text(ch) => out.push(ch),
        Piece::Placeholder => {
            index += 1;
            out.push_str(&style.render(index));
        }
    });
    out
}
