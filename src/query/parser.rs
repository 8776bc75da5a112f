//! Query string parser
//!
//! Parsing is best effort: a segment that cannot be turned into a condition
//! is dropped and the scan continues with the next one.

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{QueryError, Result};
use crate::query::condition::Condition;
use crate::query::operator::{Connective, Operator};
use crate::query::serializer::CASE_INSENSITIVE_SUFFIX;
use crate::query::value;
use crate::schema::{Schema, ValueType};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").expect("identifier pattern"));

/// One slice of the query between connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment<'a> {
    text: &'a str,
    /// Connective that ended this segment, `None` for the last one
    connective: Option<Connective>,
}

/// A segment that did not produce a condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSegment {
    pub segment: String,
    pub reason: QueryError,
}

/// Conditions recovered from a query plus everything that was dropped
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub conditions: Vec<Condition>,
    pub rejected: Vec<RejectedSegment>,
}

/// Parse a query string into a condition chain.
///
/// Never fails; malformed segments, unknown properties and values that do
/// not fit the property type are skipped.
pub fn parse(query: &str, schema: &Schema) -> Vec<Condition> {
    parse_with_report(query, schema).conditions
}

/// Like [`parse`], but also returns the segments that were dropped and why
pub fn parse_with_report(query: &str, schema: &Schema) -> ParseReport {
    let mut report = ParseReport::default();

    if query.trim().is_empty() {
        return report;
    }

    for segment in split_segments(query) {
        let text = segment.text.trim();
        if text.is_empty() {
            trace!("skipping empty segment");
            continue;
        }

        match parse_segment(text, schema) {
            Ok(mut condition) => {
                trace!(
                    property = ?condition.property.as_ref().map(|p| p.name.as_str()),
                    operator = %condition.operator,
                    "parsed condition"
                );
                condition.next_connective = segment.connective;
                report.conditions.push(condition);
            }
            Err(reason) => {
                debug!(segment = %text, %reason, "dropping filter segment");
                report.rejected.push(RejectedSegment {
                    segment: text.to_string(),
                    reason,
                });
            }
        }
    }

    // The chain ends here even if the query had a trailing or dropped tail
    if let Some(last) = report.conditions.last_mut() {
        last.next_connective = None;
    }

    report
}

/// Split on whichever of `,` and `|` comes next, remembering which one it was
fn split_segments(query: &str) -> SmallVec<[Segment<'_>; 8]> {
    let mut segments = SmallVec::new();
    let mut rest = query;

    while !rest.is_empty() {
        match rest.char_indices().find_map(|(i, c)| Connective::from_symbol(c).map(|k| (i, k))) {
            Some((pos, connective)) => {
                segments.push(Segment {
                    text: &rest[..pos],
                    connective: Some(connective),
                });
                // Both delimiters are single-byte
                rest = &rest[pos + 1..];
            }
            None => {
                segments.push(Segment {
                    text: rest,
                    connective: None,
                });
                break;
            }
        }
    }

    segments
}

/// Parse a single `name` + `operator` + `value` [`/i`] segment
pub fn parse_segment(segment: &str, schema: &Schema) -> Result<Condition> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Err(QueryError::MalformedSegment("empty segment".to_string()));
    }

    let (body, case_insensitive) = match segment.strip_suffix(CASE_INSENSITIVE_SUFFIX) {
        Some(body) => (body, true),
        None => (segment, false),
    };

    let (name, operator, raw) = tokenize(body)
        .ok_or_else(|| QueryError::MalformedSegment(segment.to_string()))?;

    let property = schema
        .find(name)
        .ok_or_else(|| QueryError::UnknownProperty(name.to_string()))?;

    let raw_value = match value::validate(raw, property.value_type) {
        Some(v) => v,
        // A Boolean condition without a value is still complete
        None if property.value_type == ValueType::Boolean && raw.is_empty() => String::new(),
        None => {
            return Err(QueryError::InvalidValue {
                property: property.name.clone(),
                value_type: property.value_type,
                value: raw.to_string(),
            })
        }
    };

    Ok(Condition::for_property(property.clone())
        .with_operator(operator)
        .with_value(raw_value)
        .with_case_insensitive(case_insensitive))
}

/// Split a segment body into identifier, operator and remainder
fn tokenize(body: &str) -> Option<(&str, Operator, &str)> {
    let name = IDENTIFIER.find(body)?.as_str();
    let rest = &body[name.len()..];
    let (operator, len) = Operator::match_prefix(rest)?;
    Some((name, operator, &rest[len..]))
}
