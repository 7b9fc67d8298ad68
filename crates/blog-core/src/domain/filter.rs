use serde_json::{Map, Value};

use crate::error::DomainError;

/// Field-match filter for listing blogs.
///
/// The filter is handed to the store as-is, except that query operators
/// (any key starting with `$`, at any depth) and integers the store cannot
/// represent are refused.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogFilter(Map<String, Value>);

impl BlogFilter {
    /// Parse the raw JSON text of the `filter` query parameter.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| DomainError::Validation(format!("`filter` is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        let Value::Object(fields) = value else {
            return Err(DomainError::Validation(
                "`filter` must be a JSON object".to_string(),
            ));
        };
        for (key, value) in &fields {
            check_entry(key, value)?;
        }
        Ok(Self(fields))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Top-level equality match against a serialized document.
    /// `_id` is accepted as an alias for `id`.
    pub fn matches(&self, document: &Value) -> bool {
        self.0.iter().all(|(key, expected)| {
            let key = if key == "_id" { "id" } else { key.as_str() };
            document.get(key) == Some(expected)
        })
    }
}

fn check_entry(key: &str, value: &Value) -> Result<(), DomainError> {
    if key.starts_with('$') {
        return Err(DomainError::Validation(format!(
            "query operator `{key}` is not allowed in `filter`"
        )));
    }
    match value {
        Value::Object(map) => map.iter().try_for_each(|(k, v)| check_entry(k, v)),
        Value::Array(items) => items.iter().try_for_each(|v| check_entry(key, v)),
        // Stored integers are signed 64-bit
        Value::Number(n) if n.is_u64() && n.as_i64().is_none() => {
            Err(DomainError::Validation(format!(
                "`filter` value for `{key}` is out of range: {n}"
            )))
        }
        _ => Ok(()),
    }
}

/// Raw skip/limit passthrough. A missing or zero limit means "no limit".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: Option<u64>,
}

impl Page {
    pub fn new(skip: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            skip: skip.unwrap_or(0),
            limit: limit.filter(|l| *l > 0),
        }
    }
}
