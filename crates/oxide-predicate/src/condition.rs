//! The filter model: specifications, groups, conditions and operators.
//!
//! A [`FilterSpec`] is a list of [`ConditionGroup`]s combined with OR. A
//! group maps field keys to [`Condition`]s combined with AND. Conditions
//! are a closed set of variants, so sentinels such as "sort ascending" or
//! "is null" can never collide with ordinary data.
//!
//! # Example
//!
//! ```rust
//! use oxide_predicate::{ConditionGroup, FilterSpec, Operators};
//!
//! let spec = FilterSpec::new()
//!     .or(ConditionGroup::new()
//!         .eq("status", "active")
//!         .ops("views", Operators::new().gt(10).lt(100))
//!         .desc("created"))
//!     .or(ConditionGroup::new().is_null("owner"));
//! assert_eq!(spec.len(), 2);
//! ```

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::value::{SqlValue, ToSqlValue};

/// Sort requests carried by a field.
///
/// Serializes as its `$sort` keyword: `asc`, `desc` or `rand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending (ASC).
    Asc,
    /// Descending (DESC).
    Desc,
    /// Random order.
    Random,
}

impl SortDirection {
    /// Returns the `$sort` keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::Random => "rand",
        }
    }
}

/// What a single field must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Equality with a value.
    Literal(SqlValue),
    /// Contributes an ordering entry instead of a predicate.
    Sort(SortDirection),
    /// `IS NULL`.
    IsNull,
    /// `IS NOT NULL`.
    IsNotNull,
    /// A nested specification, OR-joined and parenthesized.
    Group(FilterSpec),
    /// Operator/operand pairs, AND-joined.
    Operators(Operators),
}

impl Condition {
    /// Creates a literal condition; a null value becomes [`Condition::IsNull`].
    pub fn value<V: ToSqlValue>(value: V) -> Self {
        match value.to_sql_value() {
            SqlValue::Null => Self::IsNull,
            other => Self::Literal(other),
        }
    }
}

/// Serializes back into the JSON filter shape.
impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(value) => value.serialize(serializer),
            Self::Sort(direction) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$sort", direction.keyword())?;
                map.end()
            }
            Self::IsNull => serializer.serialize_unit(),
            Self::IsNotNull => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$is", "not_null")?;
                map.end()
            }
            Self::Group(spec) => spec.serialize(serializer),
            Self::Operators(ops) => ops.serialize(serializer),
        }
    }
}

impl From<SortDirection> for Condition {
    fn from(direction: SortDirection) -> Self {
        Self::Sort(direction)
    }
}

impl From<FilterSpec> for Condition {
    fn from(spec: FilterSpec) -> Self {
        Self::Group(spec)
    }
}

impl From<Operators> for Condition {
    fn from(ops: Operators) -> Self {
        Self::Operators(ops)
    }
}

/// Operators usable inside an [`Operators`] group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Case-insensitive substring match.
    Contains,
    /// Case-insensitive prefix match.
    StartsWith,
    /// Case-insensitive suffix match.
    EndsWith,
    /// The operand is one of the array column's elements (`= ANY`).
    Any,
    /// The array column holds every listed element (`@>`).
    ContainsAll,
    /// Every element of the array column is listed (`<@`).
    ContainedBy,
    /// Field equals one of the listed values; null entries match NULL.
    Or,
    /// Field equals none of the listed values.
    Nor,
    /// `IN (...)`.
    In,
    /// `NOT IN (...)`.
    NotIn,
    /// Any other sigil, emitted verbatim as `field <sigil> ?`.
    Compare(String),
}

impl Operator {
    /// Comparison sigils strict mode accepts.
    pub const KNOWN_COMPARISONS: &'static [&'static str] = &[
        "=", "!=", "<>", "<", "<=", ">", ">=", "LIKE", "NOT LIKE", "ILIKE", "NOT ILIKE",
    ];

    /// Parses a sigil; unknown sigils become [`Operator::Compare`].
    #[must_use]
    pub fn from_sigil(sigil: &str) -> Self {
        match sigil {
            "$contains" => Self::Contains,
            "$startswith" => Self::StartsWith,
            "$endswith" => Self::EndsWith,
            "$any" => Self::Any,
            "$contains_all" => Self::ContainsAll,
            "$contained_by" => Self::ContainedBy,
            "$or" => Self::Or,
            "$nor" => Self::Nor,
            "$in" => Self::In,
            "$nin" => Self::NotIn,
            other => Self::Compare(other.to_string()),
        }
    }

    /// Returns the sigil of the operator.
    #[must_use]
    pub fn sigil(&self) -> &str {
        match self {
            Self::Contains => "$contains",
            Self::StartsWith => "$startswith",
            Self::EndsWith => "$endswith",
            Self::Any => "$any",
            Self::ContainsAll => "$contains_all",
            Self::ContainedBy => "$contained_by",
            Self::Or => "$or",
            Self::Nor => "$nor",
            Self::In => "$in",
            Self::NotIn => "$nin",
            Self::Compare(sigil) => sigil,
        }
    }

    /// Returns `true` for operators that need array support.
    #[must_use]
    pub const fn needs_arrays(&self) -> bool {
        matches!(self, Self::Any | Self::ContainsAll | Self::ContainedBy)
    }

    /// Returns `true` for comparisons outside [`Self::KNOWN_COMPARISONS`].
    #[must_use]
    pub fn is_unrecognized(&self) -> bool {
        match self {
            Self::Compare(sigil) => !Self::KNOWN_COMPARISONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(sigil.trim())),
            _ => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sigil())
    }
}

/// Operator/operand pairs applied to one field, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operators {
    entries: Vec<(Operator, SqlValue)>,
}

impl Operators {
    /// Creates an empty operator group.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds an operator; an operator already present has its operand
    /// replaced in place.
    #[must_use]
    pub fn with<V: ToSqlValue>(mut self, op: Operator, operand: V) -> Self {
        self.insert(op, operand.to_sql_value());
        self
    }

    /// Adds an operator in place.
    pub fn insert(&mut self, op: Operator, operand: SqlValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == op) {
            entry.1 = operand;
        } else {
            self.entries.push((op, operand));
        }
    }

    /// Adds a raw comparison (`field <sigil> ?`).
    #[must_use]
    pub fn compare<V: ToSqlValue>(self, sigil: &str, operand: V) -> Self {
        self.with(Operator::Compare(sigil.to_string()), operand)
    }

    /// `field > ?`.
    #[must_use]
    pub fn gt<V: ToSqlValue>(self, operand: V) -> Self {
        self.compare(">", operand)
    }

    /// `field >= ?`.
    #[must_use]
    pub fn gte<V: ToSqlValue>(self, operand: V) -> Self {
        self.compare(">=", operand)
    }

    /// `field < ?`.
    #[must_use]
    pub fn lt<V: ToSqlValue>(self, operand: V) -> Self {
        self.compare("<", operand)
    }

    /// `field <= ?`.
    #[must_use]
    pub fn lte<V: ToSqlValue>(self, operand: V) -> Self {
        self.compare("<=", operand)
    }

    /// `field != ?`.
    #[must_use]
    pub fn ne<V: ToSqlValue>(self, operand: V) -> Self {
        self.compare("!=", operand)
    }

    /// Case-insensitive substring match.
    #[must_use]
    pub fn contains(self, text: &str) -> Self {
        self.with(Operator::Contains, text)
    }

    /// Case-insensitive prefix match.
    #[must_use]
    pub fn starts_with(self, text: &str) -> Self {
        self.with(Operator::StartsWith, text)
    }

    /// Case-insensitive suffix match.
    #[must_use]
    pub fn ends_with(self, text: &str) -> Self {
        self.with(Operator::EndsWith, text)
    }

    /// `? = ANY(field)`.
    #[must_use]
    pub fn any<V: ToSqlValue>(self, element: V) -> Self {
        self.with(Operator::Any, element)
    }

    /// `field @> ARRAY[...]`.
    #[must_use]
    pub fn contains_all<V: ToSqlValue>(self, elements: Vec<V>) -> Self {
        self.with(Operator::ContainsAll, SqlValue::array(elements))
    }

    /// `field <@ ARRAY[...]`.
    #[must_use]
    pub fn contained_by<V: ToSqlValue>(self, elements: Vec<V>) -> Self {
        self.with(Operator::ContainedBy, SqlValue::array(elements))
    }

    /// Field equals one of `values`; `None` entries match NULL.
    #[must_use]
    pub fn one_of<V: ToSqlValue>(self, values: Vec<V>) -> Self {
        self.with(Operator::Or, SqlValue::array(values))
    }

    /// Field equals none of `values`.
    #[must_use]
    pub fn none_of<V: ToSqlValue>(self, values: Vec<V>) -> Self {
        self.with(Operator::Nor, SqlValue::array(values))
    }

    /// `field IN(...)`.
    #[must_use]
    pub fn in_list<V: ToSqlValue>(self, values: Vec<V>) -> Self {
        self.with(Operator::In, SqlValue::array(values))
    }

    /// `field NOT IN(...)`.
    #[must_use]
    pub fn not_in_list<V: ToSqlValue>(self, values: Vec<V>) -> Self {
        self.with(Operator::NotIn, SqlValue::array(values))
    }

    /// Returns `true` when no operator was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Operator, &SqlValue)> {
        self.entries.iter().map(|(op, operand)| (op, operand))
    }
}

impl Serialize for Operators {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (op, operand) in &self.entries {
            map.serialize_entry(op.sigil(), operand)?;
        }
        map.end()
    }
}

/// Field conditions combined with AND, keyed by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionGroup {
    entries: Vec<(String, Condition)>,
}

impl ConditionGroup {
    /// Creates an empty group.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets the condition for `field`, replacing any earlier one in place.
    #[must_use]
    pub fn set(mut self, field: &str, condition: impl Into<Condition>) -> Self {
        self.insert(field, condition.into());
        self
    }

    /// Sets the condition for `field` in place.
    pub fn insert(&mut self, field: &str, condition: Condition) {
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| key == field) {
            entry.1 = condition;
        } else {
            self.entries.push((field.to_string(), condition));
        }
    }

    /// `field = ?`, or `field IS NULL` for a null value.
    #[must_use]
    pub fn eq<V: ToSqlValue>(self, field: &str, value: V) -> Self {
        self.set(field, Condition::value(value))
    }

    /// `field IS NULL`.
    #[must_use]
    pub fn is_null(self, field: &str) -> Self {
        self.set(field, Condition::IsNull)
    }

    /// `field IS NOT NULL`.
    #[must_use]
    pub fn is_not_null(self, field: &str) -> Self {
        self.set(field, Condition::IsNotNull)
    }

    /// Applies an operator group to `field`.
    #[must_use]
    pub fn ops(self, field: &str, ops: Operators) -> Self {
        self.set(field, ops)
    }

    /// Nests `spec` under `field`.
    ///
    /// The field key itself does not appear in the output; the nested
    /// groups address their own fields.
    #[must_use]
    pub fn nested(self, field: &str, spec: FilterSpec) -> Self {
        self.set(field, spec)
    }

    /// Orders by `field` ascending.
    #[must_use]
    pub fn asc(self, field: &str) -> Self {
        self.set(field, SortDirection::Asc)
    }

    /// Orders by `field` descending.
    #[must_use]
    pub fn desc(self, field: &str) -> Self {
        self.set(field, SortDirection::Desc)
    }

    /// Orders randomly.
    #[must_use]
    pub fn random(self, field: &str) -> Self {
        self.set(field, SortDirection::Random)
    }

    /// Returns the condition for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.entries
            .iter()
            .find(|(key, _)| key == field)
            .map(|(_, condition)| condition)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the group has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over field keys and conditions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.entries
            .iter()
            .map(|(key, condition)| (key.as_str(), condition))
    }
}

impl Serialize for ConditionGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, condition) in &self.entries {
            map.serialize_entry(field, condition)?;
        }
        map.end()
    }
}

/// Condition groups combined with OR.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterSpec {
    groups: Vec<ConditionGroup>,
}

impl FilterSpec {
    /// Creates an empty specification (matches everything).
    #[must_use]
    pub const fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Appends an alternative group.
    #[must_use]
    pub fn or(mut self, group: ConditionGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Appends an alternative group in place.
    pub fn push(&mut self, group: ConditionGroup) {
        self.groups.push(group);
    }

    /// Returns the groups.
    #[must_use]
    pub fn groups(&self) -> &[ConditionGroup] {
        &self.groups
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` when there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl From<ConditionGroup> for FilterSpec {
    fn from(group: ConditionGroup) -> Self {
        Self {
            groups: vec![group],
        }
    }
}

impl From<Vec<ConditionGroup>> for FilterSpec {
    fn from(groups: Vec<ConditionGroup>) -> Self {
        Self { groups }
    }
}

impl FromIterator<ConditionGroup> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = ConditionGroup>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}
