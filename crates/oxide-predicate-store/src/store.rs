//! The store boundary.

use oxide_predicate::{CompileOptions, Compiled, Compiler, Dialect};

use crate::statement::Statement;

/// A SQL store that executes compiled filters.
///
/// The store owns its dialect; compilers handed out by [`Store::compiler`]
/// target that dialect so the emitted text is something the store can
/// run.
pub trait Store {
    /// The dialect the store speaks.
    type Dialect: Dialect;

    /// Returns the store's dialect.
    fn dialect(&self) -> &Self::Dialect;

    /// Returns a compiler for the store's dialect.
    fn compiler(&self, options: CompileOptions) -> Compiler<&Self::Dialect> {
        Compiler::with_dialect(self.dialect()).options(options)
    }

    /// Renders `statement` against `table` in the store's syntax.
    fn statement(&self, statement: Statement, table: &str, compiled: &Compiled) -> String {
        statement.render(self.dialect(), table, compiled)
    }
}
