//! Compiler configuration.

use serde::Deserialize;

/// How the compiler treats inputs it can only handle by falling back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Fall back silently: unknown sigils become comparisons, malformed
    /// operands are bound whole.
    #[default]
    Lenient,
    /// Reject what lenient mode would fall back on, and verify placeholder
    /// parity on the result.
    Strict,
}

/// How case-insensitive `LIKE` operands reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeBinding {
    /// Quote-escape the operand and splice it into the condition text.
    #[default]
    Inline,
    /// Bind the operand, escaping only the wildcard metacharacters.
    ///
    /// Changes the emitted text: `upper(f) LIKE upper(?) ESCAPE '!'`.
    Bound,
}

/// Options for a [`Compiler`](crate::Compiler).
///
/// # Example
///
/// ```rust
/// use oxide_predicate::{CompileOptions, Strictness};
///
/// let options = CompileOptions::new().strict().max_depth(8);
/// assert_eq!(options.strictness, Strictness::Strict);
///
/// let from_config: CompileOptions =
///     serde_json::from_str(r#"{"like_binding": "bound"}"#).unwrap();
/// assert_eq!(from_config.max_depth, CompileOptions::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Fallback policy.
    pub strictness: Strictness,
    /// Deepest allowed nesting of condition groups; top-level groups sit
    /// at depth 1. Zero admits only a spec without groups.
    pub max_depth: usize,
    /// `LIKE` operand handling.
    pub like_binding: LikeBinding,
}

impl CompileOptions {
    /// Default nesting limit.
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    /// Creates lenient options with inline `LIKE` operands.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strictness: Strictness::Lenient,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            like_binding: LikeBinding::Inline,
        }
    }

    /// Switches to strict validation.
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.strictness = Strictness::Strict;
        self
    }

    /// Sets the nesting limit.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the `LIKE` operand handling.
    #[must_use]
    pub const fn like_binding(mut self, binding: LikeBinding) -> Self {
        self.like_binding = binding;
        self
    }

    /// Returns `true` when strict validation is on.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        matches!(self.strictness, Strictness::Strict)
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new()
    }
}
