//! Filter condition model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{QueryError, Result};
use crate::query::operator::{Connective, Operator};
use crate::schema::{PropertyDescriptor, ValueType};

static NEXT_CONDITION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a condition, unique within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(u64);

impl ConditionId {
    /// Allocate a fresh id; ids are never handed out twice
    pub fn next() -> Self {
        ConditionId(NEXT_CONDITION_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single filter condition and the connective to the condition after it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: ConditionId,
    /// Unset while the user is still picking a property
    pub property: Option<Arc<PropertyDescriptor>>,
    pub operator: Operator,
    /// Value as typed; validated only when serializing or parsing
    pub raw_value: String,
    /// Only meaningful for String properties
    pub case_insensitive: bool,
    /// Present iff another condition follows in the chain
    pub next_connective: Option<Connective>,
}

impl Default for Condition {
    fn default() -> Self {
        Self::new()
    }
}

impl Condition {
    /// Create an empty condition with a fresh id
    pub fn new() -> Self {
        Self {
            id: ConditionId::next(),
            property: None,
            operator: Operator::default(),
            raw_value: String::new(),
            case_insensitive: false,
            next_connective: None,
        }
    }

    pub fn for_property(property: Arc<PropertyDescriptor>) -> Self {
        Self {
            property: Some(property),
            ..Self::new()
        }
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.raw_value = value.into();
        self
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn followed_by(mut self, connective: Connective) -> Self {
        self.next_connective = Some(connective);
        self
    }

    #[inline]
    pub fn value_type(&self) -> Option<ValueType> {
        self.property.as_ref().map(|p| p.value_type)
    }

    /// Check that the condition can be turned into a query token
    pub fn validate(&self) -> Result<()> {
        let property = match &self.property {
            Some(p) if !p.name.trim().is_empty() => p,
            _ => {
                return Err(QueryError::IncompleteCondition(format!(
                    "condition {} has no property",
                    self.id
                )))
            }
        };

        // Boolean conditions are complete without a value
        if property.value_type != ValueType::Boolean && self.raw_value.trim().is_empty() {
            return Err(QueryError::IncompleteCondition(format!(
                "condition {} on {} has no value",
                self.id, property.name
            )));
        }

        Ok(())
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, value_type: ValueType) -> Arc<PropertyDescriptor> {
        Arc::new(PropertyDescriptor::new(name, name, value_type))
    }

    #[test]
    fn test_new_condition_defaults() {
        let cond = Condition::new();
        assert!(cond.property.is_none());
        assert_eq!(cond.operator, Operator::Equals);
        assert!(cond.raw_value.is_empty());
        assert!(!cond.case_insensitive);
        assert!(cond.next_connective.is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Condition::new();
        let b = Condition::new();
        let c = a.clone();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id, c.id);
    }

    #[test]
    fn test_validity() {
        assert!(!Condition::new().is_valid());

        let name = prop("Name", ValueType::String);
        assert!(!Condition::for_property(name.clone()).is_valid());
        assert!(!Condition::for_property(name.clone()).with_value("   ").is_valid());
        assert!(Condition::for_property(name).with_value("John").is_valid());

        // Boolean needs no value
        assert!(Condition::for_property(prop("IsActive", ValueType::Boolean)).is_valid());
    }

    #[test]
    fn test_validate_reports_reason() {
        let err = Condition::for_property(prop("Age", ValueType::Number))
            .validate()
            .unwrap_err();
        match err {
            QueryError::IncompleteCondition(msg) => assert!(msg.contains("Age")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_condition_json_shape() {
        let cond = Condition::for_property(prop("Age", ValueType::Number))
            .with_operator(Operator::GreaterThan)
            .with_value("30")
            .followed_by(Connective::Or);
        let json = serde_json::to_value(&cond).unwrap();
        assert_eq!(json["operator"], "GreaterThan");
        assert_eq!(json["raw_value"], "30");
        assert_eq!(json["next_connective"], "Or");
        assert_eq!(json["property"]["name"], "Age");
        assert!(json["id"].is_u64());
    }
}
