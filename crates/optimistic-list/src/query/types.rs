//! Query type definitions: option names, declared specs and resolved queries.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{QueryError, Result};
use crate::reactive::ReplaySubject;

// ============================================================================
// Option names
// ============================================================================

/// A recognized query option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryOption {
    OrderByChild,
    OrderByKey,
    OrderByValue,
    /// Accepted but has no effect on ordering.
    OrderByPriority,
    EqualTo,
    StartAt,
    EndAt,
    LimitToFirst,
    LimitToLast,
}

impl QueryOption {
    pub const ALL: [QueryOption; 9] = [
        Self::OrderByChild,
        Self::OrderByKey,
        Self::OrderByValue,
        Self::OrderByPriority,
        Self::EqualTo,
        Self::StartAt,
        Self::EndAt,
        Self::LimitToFirst,
        Self::LimitToLast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::OrderByChild => "orderByChild",
            Self::OrderByKey => "orderByKey",
            Self::OrderByValue => "orderByValue",
            Self::OrderByPriority => "orderByPriority",
            Self::EqualTo => "equalTo",
            Self::StartAt => "startAt",
            Self::EndAt => "endAt",
            Self::LimitToFirst => "limitToFirst",
            Self::LimitToLast => "limitToLast",
        }
    }

    /// Parse an option name. Unrecognized names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.name() == name)
    }
}

impl fmt::Display for QueryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// QuerySpec — as declared by the caller
// ============================================================================

/// The declared value of one option: fixed, or produced over time.
#[derive(Clone)]
pub enum QueryParam {
    Static(Value),
    /// Resolved from the subject's first (and every later) value.
    Dynamic(ReplaySubject<Value>),
}

impl fmt::Debug for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(v) => f.debug_tuple("Static").field(v).finish(),
            Self::Dynamic(s) => f.debug_tuple("Dynamic").field(&s.value()).finish(),
        }
    }
}

impl From<Value> for QueryParam {
    fn from(value: Value) -> Self {
        Self::Static(value)
    }
}

impl From<ReplaySubject<Value>> for QueryParam {
    fn from(subject: ReplaySubject<Value>) -> Self {
        Self::Dynamic(subject)
    }
}

/// Declared query: recognized option names mapped to static or dynamic values.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    params: BTreeMap<QueryOption, QueryParam>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, option: QueryOption, param: impl Into<QueryParam>) -> Self {
        self.params.insert(option, param.into());
        self
    }

    pub fn set(&mut self, option: QueryOption, param: impl Into<QueryParam>) {
        self.params.insert(option, param.into());
    }

    /// Build a static spec from a JSON object such as
    /// `{ "orderByChild": "name", "limitToFirst": 10 }`.
    ///
    /// Unrecognized keys are ignored; a non-object yields an empty spec.
    pub fn from_json(json: &Value) -> Self {
        let mut spec = Self::new();
        if let Some(obj) = json.as_object() {
            for (name, value) in obj {
                if let Some(option) = QueryOption::from_name(name) {
                    spec.set(option, value.clone());
                }
            }
        }
        spec
    }

    pub fn options(&self) -> impl Iterator<Item = QueryOption> + '_ {
        self.params.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QueryOption, &QueryParam)> {
        self.params.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

// ============================================================================
// ResolvedQuery — concrete option values
// ============================================================================

/// Which attribute the list is ordered by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBy {
    Child(String),
    Key,
    Priority,
    Value,
}

/// A range/equality bound, optionally pinned to an item key.
///
/// Declared either as a bare value or as `{ "value": v, "key": k }`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBound {
    pub value: Value,
    pub key: Option<String>,
}

impl QueryBound {
    pub fn from_value(raw: &Value) -> Self {
        match raw.as_object() {
            Some(obj) if obj.contains_key("value") => Self {
                value: obj.get("value").cloned().unwrap_or(Value::Null),
                key: obj.get("key").and_then(Value::as_str).map(str::to_string),
            },
            _ => Self {
                value: raw.clone(),
                key: None,
            },
        }
    }
}

/// Query with every option replaced by a concrete value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedQuery {
    values: BTreeMap<QueryOption, Value>,
}

impl ResolvedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, option: QueryOption, value: Value) {
        self.values.insert(option, value);
    }

    pub fn with(mut self, option: QueryOption, value: Value) -> Self {
        self.insert(option, value);
        self
    }

    pub fn get(&self, option: QueryOption) -> Option<&Value> {
        self.values.get(&option)
    }

    /// True if the option has a value, even `null`.
    pub fn contains(&self, option: QueryOption) -> bool {
        self.values.contains_key(&option)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Ordering in precedence child, key, priority, value. Options holding
    /// a falsy value (`null`, `false`, `0`, `""`) do not count as set.
    pub fn order_by(&self) -> Option<OrderBy> {
        let set = |opt| self.get(opt).is_some_and(is_truthy);
        if set(QueryOption::OrderByChild) {
            let child = match self.get(QueryOption::OrderByChild) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => return None,
            };
            Some(OrderBy::Child(child))
        } else if set(QueryOption::OrderByKey) {
            Some(OrderBy::Key)
        } else if set(QueryOption::OrderByPriority) {
            Some(OrderBy::Priority)
        } else if set(QueryOption::OrderByValue) {
            Some(OrderBy::Value)
        } else {
            None
        }
    }

    pub fn bound(&self, option: QueryOption) -> Option<QueryBound> {
        self.get(option).map(QueryBound::from_value)
    }

    /// A limit option; `null` counts as unset.
    pub fn limit(&self, option: QueryOption) -> Result<Option<usize>> {
        match self.get(option) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    QueryError::InvalidLimit {
                        option: option.name(),
                        value: value.clone(),
                    }
                    .into()
                }),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Tests
// ============================================================================
