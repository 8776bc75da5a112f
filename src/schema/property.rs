//! Filterable property descriptors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Data types supported by the filter builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Date,
    DateTime,
}

impl ValueType {
    pub const ALL: [ValueType; 5] = [
        ValueType::String,
        ValueType::Number,
        ValueType::Boolean,
        ValueType::Date,
        ValueType::DateTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "String",
            ValueType::Number => "Number",
            ValueType::Boolean => "Boolean",
            ValueType::Date => "Date",
            ValueType::DateTime => "DateTime",
        }
    }

    /// Whether the value is compared as a calendar date or timestamp
    #[inline]
    pub fn is_temporal(self) -> bool {
        matches!(self, ValueType::Date | ValueType::DateTime)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::InvalidSchema(format!("Unknown value type: {}", s)))
    }
}

/// A property that can be filtered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name as it appears in a query, matched case-insensitively
    pub name: String,
    /// Label shown to the user
    #[serde(default)]
    pub display_label: String,
    pub value_type: ValueType,
    /// Optional labels for Boolean properties (default: "True"/"False")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_label: Option<String>,
}

impl PropertyDescriptor {
    pub fn new(
        name: impl Into<String>,
        display_label: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            name: name.into(),
            display_label: display_label.into(),
            value_type,
            true_label: None,
            false_label: None,
        }
    }

    pub fn with_boolean_labels(
        mut self,
        true_label: impl Into<String>,
        false_label: impl Into<String>,
    ) -> Self {
        self.true_label = Some(true_label.into());
        self.false_label = Some(false_label.into());
        self
    }

    /// Label for a Boolean value, falling back to "True"/"False"
    pub fn boolean_label(&self, value: bool) -> &str {
        let custom = if value {
            self.true_label.as_deref()
        } else {
            self.false_label.as_deref()
        };
        custom.unwrap_or(if value { "True" } else { "False" })
    }

    #[inline]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
