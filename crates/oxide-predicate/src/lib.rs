//! # oxide-predicate
//!
//! Compiles declarative filters into parameterized SQL conditions.
//!
//! A filter is a list of condition groups. Fields inside a group are
//! combined with AND, groups are combined with OR, and a field may hold a
//! nested list of groups. The result is a [`Compiled`] triple: condition
//! text with generic `?` placeholders, the bind values in placeholder
//! order, and an `ORDER BY` clause collected from sort requests.
//!
//! ```rust
//! use oxide_predicate::{Compiler, ConditionGroup, FilterSpec, Operators, SqlValue};
//!
//! let spec = FilterSpec::new()
//!     .or(ConditionGroup::new()
//!         .eq("status", "active")
//!         .ops("age", Operators::new().gte(18).lt(65))
//!         .desc("created"))
//!     .or(ConditionGroup::new().is_null("owner"));
//!
//! let compiled = Compiler::new().compile_spec(&spec).unwrap();
//! assert_eq!(
//!     compiled.condition,
//!     "(status = ? AND age >= ? AND age < ?) OR (owner IS NULL)"
//! );
//! assert_eq!(compiled.params.len(), 3);
//! assert_eq!(compiled.order_by, "ORDER BY created DESC");
//! ```
//!
//! ## Literal SQL
//!
//! A literal condition passes through; only a trailing `ORDER BY` is split
//! off:
//!
//! ```rust
//! use oxide_predicate::{Compiler, Filter};
//!
//! let compiled = Compiler::new()
//!     .compile(&Filter::raw("x = 1 order by y", vec![]))
//!     .unwrap();
//! assert_eq!(compiled.condition, "x = 1 ");
//! assert_eq!(compiled.order_by, "order by y");
//! ```
//!
//! ## Field keys
//!
//! `a.b` reads key `b` of JSON column `a` (`a->>'b'`) and `a:2` reads
//! element `2` of array column `a` (`a[2]`). How plain names are delimited
//! depends on the [`Dialect`].
//!
//! ## Strictness
//!
//! By default the compiler never rejects an operator: unknown sigils become
//! comparisons and malformed list operands are bound whole. Use
//! [`CompileOptions::strict`] to turn those fallbacks into errors.

pub mod compiled;
pub mod compiler;
pub mod condition;
pub mod dialect;
mod error;
pub mod field;
pub mod json;
pub mod options;
pub mod placeholder;
pub mod raw;
pub mod value;

pub use compiled::Compiled;
pub use compiler::{compile, Compiler, Filter, Input};
pub use condition::{Condition, ConditionGroup, FilterSpec, Operator, Operators, SortDirection};
pub use dialect::{Dialect, GenericDialect, MySqlDialect, PostgresDialect, SqliteDialect};
pub use error::{CompileError, Result};
pub use field::FieldAddress;
pub use options::{CompileOptions, LikeBinding, Strictness};
pub use placeholder::{count_placeholders, rewrite_placeholders, PlaceholderStyle};
pub use value::{SqlValue, ToSqlValue};
