//! Schema configuration loading
//!
//! This module builds a [`Schema`] from JSON text or from Python objects
//! handed over by the UI layer.

use pyo3::types::{PyAnyMethods, PyDict, PyDictMethods, PyList, PyListMethods};
use pyo3::Bound;

use crate::error::{QueryError, Result};
use crate::query::{Condition, Connective, Operator};
use crate::schema::{PropertyDescriptor, Schema, ValueType};

/// Load a schema from a JSON array of property descriptors
///
/// ```json
/// [{"name": "Age", "display_label": "Age", "value_type": "Number"}]
/// ```
pub fn schema_from_json(json: &str) -> Result<Schema> {
    let properties: Vec<PropertyDescriptor> = serde_json::from_str(json)?;
    Schema::new(properties)
}

/// Helper to get attribute from either dict or object
fn get_attr<'py>(obj: &Bound<'py, pyo3::PyAny>, name: &str) -> pyo3::PyResult<Bound<'py, pyo3::PyAny>> {
    if let Ok(dict) = obj.downcast::<PyDict>() {
        dict.get_item(name)?
            .ok_or_else(|| pyo3::exceptions::PyKeyError::new_err(name.to_string()))
    } else {
        obj.getattr(name)
    }
}

/// Helper to get optional attribute from either dict or object
fn get_attr_opt<'py>(obj: &Bound<'py, pyo3::PyAny>, name: &str) -> Option<Bound<'py, pyo3::PyAny>> {
    let value = if let Ok(dict) = obj.downcast::<PyDict>() {
        dict.get_item(name).ok().flatten()
    } else {
        obj.getattr(name).ok()
    };
    value.filter(|v| !v.is_none())
}

/// First present attribute among several spellings
fn get_attr_any<'py>(obj: &Bound<'py, pyo3::PyAny>, names: &[&str]) -> Option<Bound<'py, pyo3::PyAny>> {
    names.iter().find_map(|name| get_attr_opt(obj, name))
}

/// Deserialize a schema from a Python list of dicts or objects
///
/// Accepts both `name`/`display_label`/`value_type` and the
/// `PropertyName`/`DisplayName`/`PropertyType` spellings.
pub fn deserialize_schema(properties: &Bound<'_, PyList>) -> pyo3::PyResult<Schema> {
    let mut descriptors = Vec::with_capacity(properties.len());
    for item in properties.iter() {
        descriptors.push(extract_property(&item)?);
    }
    Ok(Schema::new(descriptors)?)
}

fn extract_property(obj: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<PropertyDescriptor> {
    let name: String = match get_attr_any(obj, &["name", "PropertyName"]) {
        Some(v) => v.extract()?,
        None => get_attr(obj, "name")?.extract()?,
    };
    let display_label: String = get_attr_any(obj, &["display_label", "DisplayName"])
        .and_then(|v| v.extract().ok())
        .unwrap_or_else(|| name.clone());

    let type_obj = get_attr_any(obj, &["value_type", "PropertyType"]).ok_or_else(|| {
        QueryError::InvalidSchema(format!("Property {} has no value_type", name))
    })?;
    let value_type = extract_value_type(&type_obj)?;

    let true_label: Option<String> =
        get_attr_any(obj, &["true_label", "TrueLabel"]).and_then(|v| v.extract().ok());
    let false_label: Option<String> =
        get_attr_any(obj, &["false_label", "FalseLabel"]).and_then(|v| v.extract().ok());

    Ok(PropertyDescriptor {
        name,
        display_label,
        value_type,
        true_label,
        false_label,
    })
}

/// Value type given as a string or as a Python enum member
fn extract_value_type(obj: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<ValueType> {
    let type_name: String = match obj.extract::<String>() {
        Ok(s) => s,
        Err(_) => obj.getattr("name")?.extract()?,
    };
    Ok(type_name.parse::<ValueType>()?)
}

/// Deserialize a condition chain from a Python list of dicts or objects
///
/// Fields: `property` (name), `operator` (symbol or variant name, default
/// `=`), `value`, `case_insensitive`, `next` (`,`/`|` or `And`/`Or`).
/// A property missing from the schema leaves the condition incomplete.
pub fn deserialize_conditions(
    conditions: &Bound<'_, PyList>,
    schema: &Schema,
) -> pyo3::PyResult<Vec<Condition>> {
    let mut result = Vec::with_capacity(conditions.len());
    for item in conditions.iter() {
        result.push(extract_condition(&item, schema)?);
    }
    Ok(result)
}

fn extract_condition(obj: &Bound<'_, pyo3::PyAny>, schema: &Schema) -> pyo3::PyResult<Condition> {
    let mut condition = Condition::new();

    if let Some(name) = get_attr_opt(obj, "property") {
        let name: String = name.extract()?;
        condition.property = schema.find(&name).cloned();
    }

    if let Some(op) = get_attr_opt(obj, "operator") {
        let op: String = op.extract()?;
        condition.operator = Operator::from_symbol(&op)
            .or_else(|| Operator::from_name(&op))
            .ok_or_else(|| QueryError::Deserialization(format!("Unknown operator: {}", op)))?;
    }

    if let Some(value) = get_attr_opt(obj, "value") {
        condition.raw_value = extract_raw_value(&value)?;
    }

    condition.case_insensitive = get_attr_opt(obj, "case_insensitive")
        .and_then(|v| v.extract().ok())
        .unwrap_or(false);

    if let Some(next) = get_attr_opt(obj, "next") {
        let next: String = next.extract()?;
        condition.next_connective = Some(parse_connective(&next).ok_or_else(|| {
            QueryError::Deserialization(format!("Unknown connective: {}", next))
        })?);
    }

    Ok(condition)
}

/// Raw value from a str, bool or anything with a `str()` form
fn extract_raw_value(obj: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<String> {
    if let Ok(s) = obj.extract::<String>() {
        return Ok(s);
    }
    if let Ok(b) = obj.extract::<bool>() {
        return Ok(b.to_string());
    }
    Ok(obj.str()?.to_string())
}

fn parse_connective(text: &str) -> Option<Connective> {
    let text = text.trim();
    let mut chars = text.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(connective) = Connective::from_symbol(c) {
            return Some(connective);
        }
    }
    [Connective::And, Connective::Or]
        .into_iter()
        .find(|c| c.display_name().eq_ignore_ascii_case(text))
}
