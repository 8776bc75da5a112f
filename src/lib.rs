//! Gridify Query - filter conditions and their compact query language
//!
//! This crate maps a flat chain of filter conditions (property, operator,
//! value, connective) to a query string such as
//! `FirstName=John,Age>30|Dept=Sales` and back, with Python bindings via
//! PyO3.

use pyo3::prelude::*;

pub mod config;
pub mod error;
pub mod query;
pub mod schema;
pub mod session;

use crate::query::{operators_for, parse_with_report, serialize};
use crate::schema::{Schema, ValueType};
use crate::session::FilterQuery;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::types::PyList;
use std::sync::Arc;

// ============================================================================
// Cached Schema
// ============================================================================

/// Schema registered by the host application
static REGISTERED_SCHEMA: OnceCell<RwLock<Arc<Schema>>> = OnceCell::new();

// ============================================================================
// Helper Functions
// ============================================================================

/// Use the given properties, or fall back to the registered schema
fn resolve_schema(properties: Option<&Bound<'_, PyList>>) -> PyResult<Arc<Schema>> {
    if let Some(list) = properties {
        return Ok(Arc::new(config::deserialize_schema(list)?));
    }

    REGISTERED_SCHEMA
        .get()
        .map(|cached| cached.read().clone())
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(
                "Schema not registered. Call register_schema() first or pass properties.",
            )
        })
}

// ============================================================================
// Python Functions
// ============================================================================

/// Register the filterable properties (call once at startup)
///
/// # Arguments
/// * `properties` - List of dicts or objects with `name`, `display_label`
///   and `value_type` ("String", "Number", "Boolean", "Date", "DateTime")
#[pyfunction]
fn register_schema(properties: &Bound<'_, PyList>) -> PyResult<()> {
    let schema = Arc::new(config::deserialize_schema(properties)?);

    // Re-registering replaces the previous schema
    let slot = REGISTERED_SCHEMA.get_or_init(|| RwLock::new(Arc::new(Schema::default())));
    *slot.write() = schema;

    Ok(())
}

/// Check if a schema has been registered
#[pyfunction]
fn is_schema_registered() -> bool {
    REGISTERED_SCHEMA.get().is_some()
}

/// Parse a query string into a FilterQuery
///
/// Malformed segments are dropped, never raised; inspect
/// `FilterQuery.get_rejected()` to surface them.
///
/// # Raises
/// RuntimeError if no properties are given and `register_schema` was not called
#[pyfunction]
#[pyo3(signature = (query, properties=None))]
fn parse_query(query: &str, properties: Option<&Bound<'_, PyList>>) -> PyResult<FilterQuery> {
    let schema = resolve_schema(properties)?;
    Ok(FilterQuery::new(parse_with_report(query, &schema)))
}

/// Serialize a list of condition dicts into a query string
///
/// Incomplete conditions are left out of the result.
#[pyfunction]
#[pyo3(signature = (conditions, properties=None))]
fn serialize_query(
    conditions: &Bound<'_, PyList>,
    properties: Option<&Bound<'_, PyList>>,
) -> PyResult<String> {
    let schema = resolve_schema(properties)?;
    let conditions = config::deserialize_conditions(conditions, &schema)?;
    Ok(serialize(&conditions))
}

/// Operator symbols offered for a value type
#[pyfunction]
fn operators_for_type(type_name: &str) -> PyResult<Vec<&'static str>> {
    let value_type: ValueType = type_name.parse()?;
    Ok(operators_for(value_type).iter().map(|op| op.symbol()).collect())
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn gridify_query(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(register_schema, m)?)?;
    m.add_function(wrap_pyfunction!(is_schema_registered, m)?)?;
    m.add_function(wrap_pyfunction!(parse_query, m)?)?;
    m.add_function(wrap_pyfunction!(serialize_query, m)?)?;
    m.add_function(wrap_pyfunction!(operators_for_type, m)?)?;
    m.add_class::<FilterQuery>()?;
    Ok(())
}
