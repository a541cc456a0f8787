use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised by cache misuse.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalid query key: operation name is empty")]
    InvalidKey,

    #[error("Query parameters could not be serialized: {0}")]
    InvalidParams(#[from] serde_json::Error),
}

/// Identity of one cached read: operation name plus a parameter record.
///
/// Two keys are equal iff the operation names match and the parameter
/// records are deeply equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    operation: String,
    params: Value,
}

impl QueryKey {
    pub fn new<P: Serialize>(operation: impl Into<String>, params: &P) -> Result<Self, CacheError> {
        let operation = operation.into();
        if operation.trim().is_empty() {
            return Err(CacheError::InvalidKey);
        }
        Ok(Self {
            operation,
            params: serde_json::to_value(params)?,
        })
    }

    /// Key with no parameters.
    pub fn bare(operation: impl Into<String>) -> Result<Self, CacheError> {
        Self::new(operation, &Value::Null)
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn params(&self) -> &Value {
        &self.params
    }

    /// Prefix matching every key under this key's operation.
    pub fn operation_prefix(&self) -> KeyPrefix {
        KeyPrefix {
            operation: self.operation.clone(),
            params: None,
        }
    }
}

impl Hash for QueryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.operation.hash(state);
        // Object keys are sorted, so equal values render identically.
        self.params.to_string().hash(state);
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_null() {
            write!(f, "[{}]", self.operation)
        } else {
            write!(f, "[{}, {}]", self.operation, self.params)
        }
    }
}

/// Selects a family of keys for invalidate/cancel.
///
/// Matches on operation name and, when parameters are given, on a partial
/// deep match: every field present in the prefix must equal the key's field.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPrefix {
    operation: String,
    params: Option<Value>,
}

impl KeyPrefix {
    pub fn operation(operation: impl Into<String>) -> Result<Self, CacheError> {
        let operation = operation.into();
        if operation.trim().is_empty() {
            return Err(CacheError::InvalidKey);
        }
        Ok(Self {
            operation,
            params: None,
        })
    }

    pub fn with_params<P: Serialize>(
        operation: impl Into<String>,
        params: &P,
    ) -> Result<Self, CacheError> {
        let mut prefix = Self::operation(operation)?;
        prefix.params = Some(serde_json::to_value(params)?);
        Ok(prefix)
    }

    pub fn matches(&self, key: &QueryKey) -> bool {
        if self.operation != key.operation {
            return false;
        }
        match &self.params {
            Some(params) => partial_match(&key.params, params),
            None => true,
        }
    }
}

impl From<&QueryKey> for KeyPrefix {
    fn from(key: &QueryKey) -> Self {
        Self {
            operation: key.operation.clone(),
            params: Some(key.params.clone()),
        }
    }
}

fn partial_match(value: &Value, pattern: &Value) -> bool {
    match (value, pattern) {
        (Value::Object(value), Value::Object(pattern)) => pattern.iter().all(|(name, expected)| {
            value
                .get(name)
                .is_some_and(|actual| partial_match(actual, expected))
        }),
        _ => value == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn empty_operation_is_rejected() {
        assert!(matches!(QueryKey::bare(""), Err(CacheError::InvalidKey)));
        assert!(matches!(KeyPrefix::operation("  "), Err(CacheError::InvalidKey)));
    }

    #[test]
    fn keys_compare_params_deeply() {
        let a = QueryKey::new("users", &json!({"page": 1, "search": "Lea"})).unwrap();
        let b = QueryKey::new("users", &json!({"search": "Lea", "page": 1})).unwrap();
        let c = QueryKey::new("users", &json!({"page": 2, "search": "Lea"})).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<QueryKey> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn operation_prefix_matches_all_params() {
        let key = QueryKey::new("users", &json!({"page": 3})).unwrap();
        assert!(KeyPrefix::operation("users").unwrap().matches(&key));
        assert!(!KeyPrefix::operation("user").unwrap().matches(&key));
    }

    #[test]
    fn partial_params_match_subset() {
        let key = QueryKey::new("users", &json!({"page": 1, "search": "Lea"})).unwrap();
        let hit = KeyPrefix::with_params("users", &json!({"page": 1})).unwrap();
        let miss = KeyPrefix::with_params("users", &json!({"page": 2})).unwrap();
        assert!(hit.matches(&key));
        assert!(!miss.matches(&key));
        assert!(KeyPrefix::from(&key).matches(&key));
    }

    #[test]
    fn display_includes_params() {
        let key = QueryKey::new("user", &json!({"id": 7})).unwrap();
        assert_eq!(key.to_string(), r#"[user, {"id":7}]"#);
        assert_eq!(QueryKey::bare("companies").unwrap().to_string(), "[companies]");
    }
}
