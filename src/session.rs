//! FilterQuery - parsed query held for the Python-Rust boundary
//!
//! Python gets a handle to the parsed chain and pulls plain dicts out of it
//! on demand.

use pyo3::prelude::*;
use pyo3::types::{PyAny, PyDict, PyList};

use crate::query::{serialize, Condition, ParseReport, RejectedSegment};

/// Result of parsing one query string
#[pyclass]
pub struct FilterQuery {
    conditions: Vec<Condition>,
    rejected: Vec<RejectedSegment>,
}

impl FilterQuery {
    pub fn new(report: ParseReport) -> Self {
        Self {
            conditions: report.conditions,
            rejected: report.rejected,
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    fn condition_to_dict<'py>(
        &self,
        py: Python<'py>,
        condition: &Condition,
    ) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("id", condition.id.get())?;
        match &condition.property {
            Some(prop) => {
                dict.set_item("property", &prop.name)?;
                dict.set_item("display_label", &prop.display_label)?;
                dict.set_item("value_type", prop.value_type.as_str())?;
            }
            None => {
                dict.set_item("property", py.None())?;
                dict.set_item("display_label", py.None())?;
                dict.set_item("value_type", py.None())?;
            }
        }
        dict.set_item("operator", condition.operator.symbol())?;
        dict.set_item("operator_name", condition.operator.display_name())?;
        dict.set_item("value", &condition.raw_value)?;
        dict.set_item("case_insensitive", condition.case_insensitive)?;
        dict.set_item(
            "next",
            condition.next_connective.map(|c| c.symbol().to_string()),
        )?;
        Ok(dict)
    }
}

#[pymethods]
impl FilterQuery {
    fn __len__(&self) -> usize {
        self.conditions.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "FilterQuery({:?}, rejected={})",
            self.to_query(),
            self.rejected.len()
        )
    }

    /// Number of segments that were dropped while parsing
    #[getter]
    fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Parsed conditions as a list of dicts
    fn get_conditions(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let list = PyList::empty(py);
        for condition in &self.conditions {
            list.append(self.condition_to_dict(py, condition)?)?;
        }
        Ok(list.into())
    }

    /// Dropped segments with the reason each one was rejected
    fn get_rejected(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let list = PyList::empty(py);
        for rejected in &self.rejected {
            let dict = PyDict::new(py);
            dict.set_item("segment", &rejected.segment)?;
            dict.set_item("reason", rejected.reason.to_string())?;
            list.append(dict)?;
        }
        Ok(list.into())
    }

    /// Re-serialize the parsed chain in canonical form
    fn to_query(&self) -> String {
        serialize(&self.conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_with_report;
    use crate::schema::{PropertyDescriptor, Schema, ValueType};

    #[test]
    fn test_filter_query_keeps_report() {
        let schema = Schema::new(vec![
            PropertyDescriptor::new("Dept", "Department", ValueType::String),
            PropertyDescriptor::new("Age", "Age", ValueType::Number),
        ])
        .unwrap();

        let query = FilterQuery::new(parse_with_report("Dept=Sales/i|Age>x|Age<40", &schema));
        assert_eq!(query.conditions().len(), 2);
        assert_eq!(query.rejected_count(), 1);
        assert_eq!(query.to_query(), "Dept=Sales/i|Age<40");
    }
}
