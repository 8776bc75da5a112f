//! Error types for the filter query core

use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::PyErr;
use thiserror::Error;

use crate::schema::ValueType;

/// Main error type for the filter query core
///
/// Parsing never surfaces these to the caller of [`crate::query::parse`];
/// they describe why a single segment or condition was dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Malformed segment: {0}")]
    MalformedSegment(String),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Invalid {value_type} value for {property}: {value:?}")]
    InvalidValue {
        property: String,
        value_type: ValueType,
        value: String,
    },

    #[error("Incomplete condition: {0}")]
    IncompleteCondition(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Deserialization(err.to_string())
    }
}

impl From<QueryError> for PyErr {
    fn from(err: QueryError) -> PyErr {
        match err {
            QueryError::UnknownProperty(_) => PyKeyError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Result type alias for the filter query core
pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_message() {
        let err = QueryError::InvalidValue {
            property: "HireDate".to_string(),
            value_type: ValueType::Date,
            value: "15/01/2023".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid Date value for HireDate: \"15/01/2023\""
        );
    }

    #[test]
    fn test_json_error_converts() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: QueryError = json_err.into();
        assert!(matches!(err, QueryError::Deserialization(_)));
    }
}
