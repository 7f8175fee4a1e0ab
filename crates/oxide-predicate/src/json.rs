//! Reading filters from JSON.
//!
//! JSON is where the overloaded input shape lives: a field's value may be
//! a scalar, a list of groups, an operator object or a sentinel. This
//! module resolves that shape once into the typed model.
//!
//! | JSON value | Condition |
//! |---|---|
//! | `null` | [`Condition::IsNull`] |
//! | `{"$sort": "asc" \| "desc" \| "rand"}` | [`Condition::Sort`] |
//! | `{"$is": "null" \| "not_null"}` | [`Condition::IsNull`] / [`Condition::IsNotNull`] |
//! | non-empty array of objects | [`Condition::Group`] |
//! | other object | [`Condition::Operators`], keys are sigils |
//! | anything else | [`Condition::Literal`] |

use serde_json::{Map, Value};

use crate::compiled::Compiled;
use crate::compiler::Compiler;
use crate::condition::{Condition, ConditionGroup, FilterSpec, Operator, Operators, SortDirection};
use crate::dialect::Dialect;
use crate::error::{CompileError, Result};
use crate::value::SqlValue;

/// Converts a JSON value to a bind value.
///
/// Objects are bound as their JSON text. Integers beyond `i64` keep their
/// exact digits as text.
#[must_use]
pub fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Bool(*b),
        Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Int)
            .or_else(|| n.as_u64().map(|u| SqlValue::Text(u.to_string())))
            .or_else(|| n.as_f64().map(SqlValue::Float))
            .unwrap_or(SqlValue::Null),
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(items) => SqlValue::Array(items.iter().map(to_sql_value).collect()),
        Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

/// Reads a specification: an array of group objects, or one object.
///
/// # Errors
///
/// Returns [`CompileError::InvalidInput`] for any other shape or for an
/// invalid sentinel.
pub fn decode_spec(value: &Value) -> Result<FilterSpec> {
    match value {
        Value::Object(map) => Ok(decode_group(map)?.into()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(map) => decode_group(map),
                other => Err(CompileError::InvalidInput(format!(
                    "expected a condition group object, got {other}"
                ))),
            })
            .collect(),
        other => Err(CompileError::InvalidInput(format!(
            "expected a condition group or a list of them, got {other}"
        ))),
    }
}

/// Reads one condition group.
///
/// # Errors
///
/// Returns [`CompileError::InvalidInput`] for an invalid sentinel.
pub fn decode_group(map: &Map<String, Value>) -> Result<ConditionGroup> {
    let mut group = ConditionGroup::new();
    for (field, value) in map {
        group.insert(field, decode_condition(value)?);
    }
    Ok(group)
}

/// Reads the condition of one field.
///
/// # Errors
///
/// Returns [`CompileError::InvalidInput`] for an invalid sentinel.
pub fn decode_condition(value: &Value) -> Result<Condition> {
    match value {
        Value::Null => Ok(Condition::IsNull),
        Value::Object(map) => {
            if let Some(sentinel) = decode_sentinel(map)? {
                return Ok(sentinel);
            }
            let mut ops = Operators::new();
            for (sigil, operand) in map {
                ops.insert(Operator::from_sigil(sigil), to_sql_value(operand));
            }
            Ok(Condition::Operators(ops))
        }
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            Ok(Condition::Group(decode_spec(value)?))
        }
        other => Ok(Condition::Literal(to_sql_value(other))),
    }
}

fn decode_sentinel(map: &Map<String, Value>) -> Result<Option<Condition>> {
    if map.len() != 1 {
        return Ok(None);
    }
    let Some((key, value)) = map.iter().next() else {
        return Ok(None);
    };
    let condition = match (key.as_str(), value.as_str()) {
        ("$sort", Some("asc")) => Condition::Sort(SortDirection::Asc),
        ("$sort", Some("desc")) => Condition::Sort(SortDirection::Desc),
        ("$sort", Some("rand")) => Condition::Sort(SortDirection::Random),
        ("$is", Some("null")) => Condition::IsNull,
        ("$is", Some("not_null")) => Condition::IsNotNull,
        ("$sort" | "$is", _) => {
            return Err(CompileError::InvalidInput(format!(
                "invalid {key} sentinel: {value}"
            )));
        }
        _ => return Ok(None),
    };
    Ok(Some(condition))
}

impl<D: Dialect> Compiler<D> {
    /// Compiles positional JSON inputs.
    ///
    /// A leading string is literal SQL and the remaining inputs are its
    /// arguments. Otherwise every object is a condition group and other
    /// inputs are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use oxide_predicate::Compiler;
    /// use serde_json::json;
    ///
    /// let compiled = Compiler::new()
    ///     .compile_json(&[json!({"a": {"$in": [1, 2, 3]}, "b": {"$sort": "desc"}})])
    ///     .unwrap();
    /// assert_eq!(compiled.condition, "(a IN(?,?,?))");
    /// assert_eq!(compiled.order_by, "ORDER BY b DESC");
    /// ```
    ///
    /// # Errors
    ///
    /// [`CompileError::InvalidInput`] for invalid sentinels, plus anything
    /// [`Compiler::compile_spec`] reports.
    pub fn compile_json(&self, inputs: &[Value]) -> Result<Compiled> {
        if let Some((Value::String(sql), rest)) = inputs.split_first() {
            return self.compile_raw(sql, rest.iter().map(to_sql_value).collect());
        }

        let groups = inputs
            .iter()
            .filter_map(Value::as_object)
            .map(decode_group)
            .collect::<Result<Vec<_>>>()?;
        self.compile_groups(&groups)
    }
}
