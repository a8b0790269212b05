//! Keyword-style inputs handed to processors.
//!
//! [`Inputs`] maps argument names to values. Processors look their arguments
//! up by name and get a [`ProcessorError`] naming the missing argument when
//! one is absent.

use crate::core::error::ProcessorError;
use crate::core::types::Value;
use indexmap::IndexMap;

/// Named arguments for a processor call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    values: IndexMap<String, Value>,
}

impl Inputs {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace an argument.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Merge another argument set into this one; entries in `other` win.
    pub fn merge(&mut self, other: Inputs) {
        self.values.extend(other.values);
    }

    /// Get an argument by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check if an argument is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ========================================================================
    // Required Getters
    // ========================================================================

    /// Get a required argument.
    pub fn require(&self, processor: &str, name: &str) -> Result<&Value, ProcessorError> {
        self.values
            .get(name)
            .ok_or_else(|| ProcessorError::MissingArgument {
                processor: processor.to_string(),
                argument: name.to_string(),
            })
    }

    /// Get a required string argument.
    pub fn require_str(&self, processor: &str, name: &str) -> Result<&str, ProcessorError> {
        let value = self.require(processor, name)?;
        value.as_str().ok_or_else(|| ProcessorError::InvalidArgument {
            processor: processor.to_string(),
            argument: name.to_string(),
            reason: format!("expected string, got {}", value.type_name()),
        })
    }

    /// Get a required integer argument.
    pub fn require_integer(&self, processor: &str, name: &str) -> Result<i64, ProcessorError> {
        let value = self.require(processor, name)?;
        value.as_integer().ok_or_else(|| ProcessorError::InvalidArgument {
            processor: processor.to_string(),
            argument: name.to_string(),
            reason: format!("expected integer, got {}", value.type_name()),
        })
    }
}

impl FromIterator<(String, Value)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_missing() {
        let inputs = Inputs::new();
        let err = inputs.require("printer", "text").unwrap_err();
        assert_eq!(
            err,
            ProcessorError::MissingArgument {
                processor: "printer".into(),
                argument: "text".into()
            }
        );
    }

    #[test]
    fn test_require_wrong_type() {
        let inputs = Inputs::new().with("text", 4i64);
        assert!(matches!(
            inputs.require_str("printer", "text"),
            Err(ProcessorError::InvalidArgument { .. })
        ));
        assert_eq!(inputs.require_integer("printer", "text").unwrap(), 4);
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = Inputs::new().with("a", 1i64).with("b", 2i64);
        base.merge(Inputs::new().with("b", 3i64));
        assert_eq!(base.get("b"), Some(&Value::Integer(3)));
        assert_eq!(base.len(), 2);
    }
}
