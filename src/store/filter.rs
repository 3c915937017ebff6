//! Comparators for filtered selects.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::JsontabError;

/// Comparison applied as `field_value OP query_value` with string ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Operator {
    /// Wire symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
        }
    }

    /// Compare a field value against the query value
    pub fn matches(self, field: &str, query: &str) -> bool {
        match self {
            Operator::Eq => field == query,
            Operator::Gt => field > query,
            Operator::Lt => field < query,
            Operator::Gte => field >= query,
            Operator::Lte => field <= query,
        }
    }

    /// Test a document: it must be an object holding `field`, and that field must match
    pub fn matches_document(self, document: &Value, field: &str, query: &str) -> bool {
        document
            .as_object()
            .and_then(|fields| fields.get(field))
            .map(|value| self.matches(&field_text(value), query))
            .unwrap_or(false)
    }
}

impl FromStr for Operator {
    type Err = JsontabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eq" => Ok(Operator::Eq),
            "gt" => Ok(Operator::Gt),
            "lt" => Ok(Operator::Lt),
            "gte" => Ok(Operator::Gte),
            "lte" => Ok(Operator::Lte),
            other => Err(JsontabError::Protocol(format!("unknown operator: {}", other))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Text a field value is compared as: a string's contents, otherwise compact JSON
fn field_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
