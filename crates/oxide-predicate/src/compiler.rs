//! The predicate compiler.
//!
//! Groups compile independently: the fields of one group are AND-joined
//! and parenthesized, and the groups are OR-joined. A field whose
//! condition is itself a specification recurses through the same path.
//! Parameters are appended at the moment their placeholder is written, so
//! the two never drift apart.

use tracing::{debug, warn};

use crate::compiled::Compiled;
use crate::condition::{Condition, ConditionGroup, FilterSpec, Operator, Operators, SortDirection};
use crate::dialect::{Dialect, GenericDialect};
use crate::error::{CompileError, Result};
use crate::field::FieldAddress;
use crate::options::{CompileOptions, LikeBinding};
use crate::raw::split_order_by;
use crate::value::{escape_quotes, SqlValue};

/// A filter in either of its two accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A literal condition with its positional arguments.
    Raw {
        /// Condition text, possibly ending in `ORDER BY ...`.
        sql: String,
        /// Arguments in placeholder order.
        params: Vec<SqlValue>,
    },
    /// Condition groups.
    Spec(FilterSpec),
}

impl Filter {
    /// Creates a literal filter.
    #[must_use]
    pub fn raw(sql: &str, params: Vec<SqlValue>) -> Self {
        Self::Raw {
            sql: sql.to_string(),
            params,
        }
    }
}

impl From<FilterSpec> for Filter {
    fn from(spec: FilterSpec) -> Self {
        Self::Spec(spec)
    }
}

impl From<ConditionGroup> for Filter {
    fn from(group: ConditionGroup) -> Self {
        Self::Spec(group.into())
    }
}

/// One positional input of [`compile`].
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Literal SQL; only meaningful in first position.
    Sql(String),
    /// A condition group.
    Group(ConditionGroup),
    /// A bare value; an argument of literal SQL.
    Value(SqlValue),
}

impl From<&str> for Input {
    fn from(sql: &str) -> Self {
        Self::Sql(sql.to_string())
    }
}

impl From<ConditionGroup> for Input {
    fn from(group: ConditionGroup) -> Self {
        Self::Group(group)
    }
}

impl From<SqlValue> for Input {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}

/// Compiles positional inputs with the generic dialect and default options.
///
/// A leading [`Input::Sql`] selects the literal path and turns the
/// remaining inputs into arguments, with groups bound as their JSON text.
/// Otherwise every [`Input::Group`] is one alternative and other inputs are
/// ignored.
///
/// # Example
///
/// ```rust
/// use oxide_predicate::{compile, ConditionGroup, Input};
///
/// let compiled = compile([
///     Input::from(ConditionGroup::new().eq("a", 1)),
///     Input::from(ConditionGroup::new().eq("b", 2)),
/// ])
/// .unwrap();
/// assert_eq!(compiled.condition, "(a = ?) OR (b = ?)");
/// ```
///
/// # Errors
///
/// Fails only when groups nest deeper than
/// [`CompileOptions::DEFAULT_MAX_DEPTH`].
pub fn compile<I: IntoIterator<Item = Input>>(inputs: I) -> Result<Compiled> {
    Compiler::new().compile_inputs(inputs)
}

/// Compiles filters into parameterized conditions for one dialect.
///
/// A compiler holds no per-call state and can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct Compiler<D = GenericDialect> {
    dialect: D,
    options: CompileOptions,
}

impl Compiler<GenericDialect> {
    /// Creates a compiler for the generic dialect with default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dialect: GenericDialect::new(),
            options: CompileOptions::new(),
        }
    }
}

/// Per-call accumulators.
#[derive(Debug, Default)]
struct Fragments {
    clauses: Vec<String>,
    params: Vec<SqlValue>,
    orders: Vec<String>,
}

impl<D: Dialect> Compiler<D> {
    /// Creates a compiler for `dialect` with default options.
    pub const fn with_dialect(dialect: D) -> Self {
        Self {
            dialect,
            options: CompileOptions::new(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the target dialect.
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Returns the active options.
    pub const fn compile_options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compiles a filter of either shape.
    ///
    /// # Errors
    ///
    /// See [`Compiler::compile_spec`] and [`Compiler::compile_raw`].
    pub fn compile(&self, filter: &Filter) -> Result<Compiled> {
        match filter {
            Filter::Raw { sql, params } => self.compile_raw(sql, params.clone()),
            Filter::Spec(spec) => self.compile_spec(spec),
        }
    }

    /// Compiles positional inputs; see [`compile`].
    ///
    /// # Errors
    ///
    /// See [`Compiler::compile_spec`] and [`Compiler::compile_raw`]. A group
    /// trailing literal SQL is an argument like any other and binds as its
    /// JSON text.
    pub fn compile_inputs<I: IntoIterator<Item = Input>>(&self, inputs: I) -> Result<Compiled> {
        let mut inputs = inputs.into_iter().peekable();
        if let Some(Input::Sql(sql)) = inputs.next_if(|input| matches!(input, Input::Sql(_))) {
            let mut params = Vec::new();
            for input in inputs {
                match input {
                    Input::Value(value) => params.push(value),
                    Input::Sql(text) => params.push(SqlValue::Text(text)),
                    Input::Group(group) => {
                        let text = serde_json::to_string(&group)
                            .map_err(|e| CompileError::InvalidInput(e.to_string()))?;
                        params.push(SqlValue::Text(text));
                    }
                }
            }
            return self.compile_raw(&sql, params);
        }

        let groups: Vec<ConditionGroup> = inputs
            .filter_map(|input| match input {
                Input::Group(group) => Some(group),
                _ => None,
            })
            .collect();
        self.compile_groups(&groups)
    }

    /// Compiles literal SQL: splits off `ORDER BY` and passes `params`
    /// through untouched.
    ///
    /// # Errors
    ///
    /// Only in strict mode, with [`CompileError::PlaceholderParameterMismatch`]
    /// when the condition's placeholders and `params` disagree.
    pub fn compile_raw(&self, sql: &str, params: Vec<SqlValue>) -> Result<Compiled> {
        let (condition, order_by) = split_order_by(sql);
        let compiled = Compiled {
            condition: condition.to_string(),
            params,
            order_by: order_by.to_string(),
        };
        if self.options.is_strict() {
            compiled.check_parity()?;
        }
        Ok(compiled)
    }

    /// Compiles a specification.
    ///
    /// # Errors
    ///
    /// - [`CompileError::DepthExceeded`] when groups nest deeper than
    ///   `max_depth`.
    /// - [`CompileError::UnsupportedOperator`] for array operators on a
    ///   dialect without arrays.
    /// - In strict mode, [`CompileError::UnrecognizedOperator`],
    ///   [`CompileError::MalformedOperand`] and
    ///   [`CompileError::PlaceholderParameterMismatch`].
    pub fn compile_spec(&self, spec: &FilterSpec) -> Result<Compiled> {
        self.compile_groups(spec.groups())
    }

    /// Compiles a slice of groups; see [`Compiler::compile_spec`].
    ///
    /// # Errors
    ///
    /// See [`Compiler::compile_spec`].
    pub fn compile_groups(&self, groups: &[ConditionGroup]) -> Result<Compiled> {
        let mut out = Fragments::default();
        self.groups(groups, 1, &mut out)?;

        let condition = if out.clauses.is_empty() {
            Compiled::ALWAYS_TRUE.to_string()
        } else {
            out.clauses.join(" OR ")
        };
        let order_by = if out.orders.is_empty() {
            String::new()
        } else {
            format!("ORDER BY {}", out.orders.join(", "))
        };
        let compiled = Compiled {
            condition,
            params: out.params,
            order_by,
        };

        if self.options.is_strict() {
            compiled.check_parity()?;
        }
        debug!(
            dialect = self.dialect.name(),
            groups = groups.len(),
            params = compiled.params.len(),
            condition = %compiled.condition,
            "compiled filter"
        );
        Ok(compiled)
    }

    fn groups(&self, groups: &[ConditionGroup], depth: usize, out: &mut Fragments) -> Result<()> {
        if !groups.is_empty() && depth > self.options.max_depth {
            return Err(CompileError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }

        for group in groups {
            let mut ands = Vec::new();
            for (key, condition) in group.iter() {
                self.condition(key, condition, depth, &mut ands, out)?;
            }
            if !ands.is_empty() {
                out.clauses.push(format!("({})", ands.join(" AND ")));
            }
        }
        Ok(())
    }

    fn condition(
        &self,
        key: &str,
        condition: &Condition,
        depth: usize,
        ands: &mut Vec<String>,
        out: &mut Fragments,
    ) -> Result<()> {
        let address = FieldAddress::parse(key);
        if address.is_array_index() && !self.dialect.supports_arrays() {
            return Err(CompileError::UnsupportedOperator {
                operator: format!("array index ({key})"),
                dialect: self.dialect.name(),
            });
        }
        let field = address.render(&self.dialect);

        match condition {
            Condition::Sort(direction) => {
                out.orders.push(self.sort_entry(&address, *direction));
            }
            Condition::IsNull | Condition::Literal(SqlValue::Null) => {
                ands.push(format!("{field} IS NULL"));
            }
            Condition::IsNotNull => ands.push(format!("{field} IS NOT NULL")),
            Condition::Group(spec) => {
                let mut nested = Fragments::default();
                self.groups(spec.groups(), depth + 1, &mut nested)?;
                if !nested.clauses.is_empty() {
                    ands.push(format!("({})", nested.clauses.join(" OR ")));
                    out.params.extend(nested.params);
                }
                out.orders.extend(nested.orders);
            }
            Condition::Operators(ops) => {
                ands.extend(self.operators(key, &field, ops, &mut out.params)?);
            }
            Condition::Literal(value) => {
                ands.push(format!("{field} = ?"));
                if address.is_json_path() {
                    out.params.push(SqlValue::Text(value.to_text()));
                } else {
                    out.params.push(value.clone());
                }
            }
        }
        Ok(())
    }

    fn sort_entry(&self, address: &FieldAddress<'_>, direction: SortDirection) -> String {
        match direction {
            SortDirection::Asc => format!("{} ASC", address.render_sort(&self.dialect)),
            SortDirection::Desc => format!("{} DESC", address.render_sort(&self.dialect)),
            SortDirection::Random => format!("{} ASC", self.dialect.random_function()),
        }
    }

    fn operators(
        &self,
        key: &str,
        field: &str,
        ops: &Operators,
        params: &mut Vec<SqlValue>,
    ) -> Result<Vec<String>> {
        let mut parts = Vec::new();

        for (op, operand) in ops.iter() {
            if op.needs_arrays() && !self.dialect.supports_arrays() {
                return Err(CompileError::UnsupportedOperator {
                    operator: op.sigil().to_string(),
                    dialect: self.dialect.name(),
                });
            }

            match op {
                Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
                    parts.push(self.like(key, op, field, operand, params)?);
                }
                Operator::Any => {
                    parts.push(format!("? = ANY({field})"));
                    params.push(operand.clone());
                }
                Operator::ContainsAll => {
                    let (slots, values) = self.expand(key, op, operand, true)?;
                    parts.push(format!("{field} @> ARRAY[{}]", slots.join(",")));
                    params.extend(values);
                }
                Operator::ContainedBy => {
                    let (slots, values) = self.expand(key, op, operand, true)?;
                    parts.push(format!("{field} <@ ARRAY[{}]", slots.join(",")));
                    params.extend(values);
                    parts.push(format!("{field} <@ '{{}}'"));
                }
                Operator::Or => {
                    let alts = self.alternatives(key, op, field, operand)?;
                    if alts.branches.len() > 1 {
                        parts.push(format!("({})", alts.disjunction()));
                    } else {
                        parts.push(alts.disjunction());
                    }
                    params.extend(alts.values);
                }
                Operator::Nor => {
                    let alts = self.alternatives(key, op, field, operand)?;
                    // NULL rows are let through only when the list named
                    // no null.
                    if alts.has_null {
                        parts.push(format!("NOT ({})", alts.disjunction()));
                    } else {
                        parts.push(format!(
                            "(NOT ({}) OR {field} IS NULL)",
                            alts.disjunction()
                        ));
                    }
                    params.extend(alts.values);
                }
                Operator::In => {
                    let (slots, values) = self.expand(key, op, operand, false)?;
                    parts.push(format!("{field} IN({})", slots.join(",")));
                    params.extend(values);
                }
                Operator::NotIn => {
                    let (slots, values) = self.expand(key, op, operand, false)?;
                    parts.push(format!("{field} NOT IN({})", slots.join(",")));
                    params.extend(values);
                }
                Operator::Compare(sigil) => {
                    if op.is_unrecognized() {
                        if self.options.is_strict() {
                            return Err(CompileError::UnrecognizedOperator {
                                field: key.to_string(),
                                sigil: sigil.clone(),
                            });
                        }
                        warn!(
                            field = key,
                            sigil = %sigil,
                            "unrecognized operator, emitting it as a comparison"
                        );
                    }
                    parts.push(format!("{field} {sigil} ?"));
                    params.push(operand.clone());
                }
            }
        }
        Ok(parts)
    }

    fn like(
        &self,
        key: &str,
        op: &Operator,
        field: &str,
        operand: &SqlValue,
        params: &mut Vec<SqlValue>,
    ) -> Result<String> {
        let (prefix, suffix) = match op {
            Operator::StartsWith => ("", "%"),
            Operator::EndsWith => ("%", ""),
            _ => ("%", "%"),
        };
        if matches!(operand, SqlValue::Array(_) | SqlValue::Blob(_) | SqlValue::Null) {
            self.malformed(key, op, &format!("expected text, got {}", operand.kind()))?;
        }
        let text = operand.to_text();
        Ok(match self.options.like_binding {
            LikeBinding::Inline => {
                format!(
                    "upper({field}) LIKE upper('{prefix}{}{suffix}')",
                    escape_quotes(&text)
                )
            }
            LikeBinding::Bound => {
                params.push(SqlValue::Text(format!(
                    "{prefix}{}{suffix}",
                    escape_like(&text)
                )));
                format!("upper({field}) LIKE upper(?) ESCAPE '{LIKE_ESCAPE}'")
            }
        })
    }

    /// Expands a list operand into placeholders and values.
    ///
    /// An empty list still yields one placeholder (bound to `0`) so the
    /// emitted SQL stays valid.
    fn expand(
        &self,
        key: &str,
        op: &Operator,
        operand: &SqlValue,
        cast_ints: bool,
    ) -> Result<(Vec<&'static str>, Vec<SqlValue>)> {
        match operand {
            SqlValue::Array(items) if items.is_empty() => {
                Ok((vec!["?"], vec![SqlValue::Int(0)]))
            }
            SqlValue::Array(items) if !items.iter().any(|item| item.as_array().is_some()) => {
                let slot = if cast_ints && items.iter().all(SqlValue::is_int) {
                    "?::int8"
                } else {
                    "?"
                };
                Ok((vec![slot; items.len()], items.clone()))
            }
            SqlValue::Array(_) => {
                self.malformed(key, op, "list elements must be scalars")?;
                Ok((vec!["?"], vec![operand.clone()]))
            }
            other => {
                self.malformed(key, op, &format!("expected a list, got {}", other.kind()))?;
                Ok((vec!["?"], vec![operand.clone()]))
            }
        }
    }

    /// Collects the `field=?` branches of an OR/NOR operand.
    fn alternatives(
        &self,
        key: &str,
        op: &Operator,
        field: &str,
        operand: &SqlValue,
    ) -> Result<Alternatives> {
        let single;
        let items = if let SqlValue::Array(items) = operand {
            items.as_slice()
        } else {
            self.malformed(key, op, &format!("expected a list, got {}", operand.kind()))?;
            single = [operand.clone()];
            &single[..]
        };

        let mut alts = Alternatives::default();
        for item in items {
            match item {
                SqlValue::Null => {
                    alts.has_null = true;
                    if *op == Operator::Or {
                        alts.branches.push(format!("{field} IS NULL"));
                    }
                }
                SqlValue::Array(_) => {
                    self.malformed(key, op, "list elements must be scalars")?;
                    alts.branches.push(format!("{field}=?"));
                    alts.values.push(item.clone());
                }
                _ => {
                    alts.branches.push(format!("{field}=?"));
                    alts.values.push(item.clone());
                }
            }
        }
        Ok(alts)
    }

    /// Fails in strict mode; logs and lets the caller fall back otherwise.
    fn malformed(&self, key: &str, op: &Operator, reason: &str) -> Result<()> {
        if self.options.is_strict() {
            return Err(CompileError::MalformedOperand {
                field: key.to_string(),
                operator: op.sigil().to_string(),
                reason: reason.to_string(),
            });
        }
        warn!(field = key, operator = %op, reason, "malformed operand, binding it whole");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Alternatives {
    branches: Vec<String>,
    values: Vec<SqlValue>,
    has_null: bool,
}

impl Alternatives {
    /// `a OR b OR ...`; nothing to match renders as `1=0`.
    fn disjunction(&self) -> String {
        if self.branches.is_empty() {
            String::from("1=0")
        } else {
            self.branches.join(" OR ")
        }
    }
}

/// Escape character of bound `LIKE` patterns. It must read literally inside
/// a quoted string in every dialect, which rules out backslash.
const LIKE_ESCAPE: char = '!';

/// Escapes `LIKE` metacharacters for use with `ESCAPE '!'`.
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, LIKE_ESCAPE | '%' | '_') {
            out.push(LIKE_ESCAPE);
        }
        out.push(ch);
    }
    out
}
