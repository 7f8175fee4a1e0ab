//! # oxide-predicate-store
//!
//! Runs compiled predicates against a database.
//!
//! A [`Store`] names its dialect, hands out compilers for it and renders
//! `SELECT`, `COUNT` and `DELETE` statements around a [`Compiled`]
//! condition, translating the generic `?` placeholders into its own
//! positional syntax. [`SqliteStore`] executes them through sqlx.
//!
//! ```rust,no_run
//! use oxide_predicate::{CompileOptions, ConditionGroup, Operators};
//! use oxide_predicate_store::{SqliteStore, Store};
//!
//! # async fn run() -> oxide_predicate_store::Result<()> {
//! let store = SqliteStore::connect("sqlite::memory:").await?;
//! let compiled = store.compiler(CompileOptions::new()).compile_spec(
//!     &ConditionGroup::new()
//!         .ops("score", Operators::new().gte(10))
//!         .desc("score")
//!         .into(),
//! )?;
//! let rows = store.fetch_all("players", &compiled).await?;
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```
//!
//! [`Compiled`]: oxide_predicate::Compiled

mod error;
pub mod sqlite;
pub mod statement;
pub mod store;

pub use error::{Result, StoreError};
pub use sqlite::SqliteStore;
pub use statement::Statement;
pub use store::Store;
