//! Condition to query text

use crate::query::condition::Condition;
use crate::query::operator::Connective;
use crate::query::value;
use crate::schema::ValueType;

/// Suffix marking a case-insensitive string comparison
pub const CASE_INSENSITIVE_SUFFIX: &str = "/i";

impl Condition {
    /// Serialize this condition as `name` + `symbol` + `value`.
    ///
    /// Invalid conditions produce an empty token.
    pub fn to_token(&self) -> String {
        let property = match &self.property {
            Some(p) if self.is_valid() => p,
            _ => return String::new(),
        };

        let mut value = match property.value_type {
            ValueType::Date | ValueType::DateTime => {
                value::canonicalize(&self.raw_value, property.value_type)
            }
            _ => self.raw_value.clone(),
        };

        if self.case_insensitive
            && property.value_type == ValueType::String
            && !value.trim().is_empty()
        {
            value.push_str(CASE_INSENSITIVE_SUFFIX);
        }

        let symbol = self.operator.symbol();
        let mut token = String::with_capacity(property.name.len() + symbol.len() + value.len());
        token.push_str(&property.name);
        token.push_str(symbol);
        token.push_str(&value);
        token
    }
}

/// Serialize a condition chain into one query string.
///
/// Invalid conditions are skipped together with their connective. The
/// connective between two emitted tokens is the one stored on the earlier
/// of them, defaulting to AND when the chain pointer is missing.
pub fn serialize(conditions: &[Condition]) -> String {
    let mut query = String::new();
    let mut pending: Option<Connective> = None;

    for condition in conditions {
        let token = condition.to_token();
        if token.is_empty() {
            continue;
        }

        if !query.is_empty() {
            query.push(pending.unwrap_or_default().symbol());
        }
        query.push_str(&token);
        pending = condition.next_connective;
    }

    query
}
