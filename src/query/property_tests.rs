//! Property tests for the query module
//!
//! Round trip between condition chains and query strings, operator
//! disambiguation and canonical date output.

use proptest::prelude::*;
use std::sync::Arc;

use crate::query::operator::{operators_for, Connective, Operator};
use crate::query::parser::parse;
use crate::query::serializer::serialize;
use crate::query::value::canonicalize;
use crate::query::Condition;
use crate::schema::{PropertyDescriptor, Schema, ValueType};

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

fn descriptors() -> Vec<PropertyDescriptor> {
    vec![
        PropertyDescriptor::new("FirstName", "First Name", ValueType::String),
        PropertyDescriptor::new("Department", "Department", ValueType::String),
        PropertyDescriptor::new("Salary", "Salary", ValueType::Number),
        PropertyDescriptor::new("Age", "Age", ValueType::Number),
        PropertyDescriptor::new("IsActive", "Active", ValueType::Boolean),
        PropertyDescriptor::new("HireDate", "Hire Date", ValueType::Date),
        PropertyDescriptor::new("LastLogin", "Last Login", ValueType::DateTime),
    ]
}

fn schema() -> Schema {
    Schema::new(descriptors()).unwrap()
}

/// String values that survive trimming and cannot be read as an operator
fn string_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9_.-]{0,10}"
}

fn number_value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (-100000..=100000i32).prop_map(|n| n.to_string()),
        (-1000..=1000i32, 0..100u32).prop_map(|(n, f)| format!("{}.{:02}", n, f)),
    ]
}

fn date_value_strategy() -> impl Strategy<Value = String> {
    (1900..=2100i32, 1..=12u32, 1..=28u32)
        .prop_map(|(y, m, d)| format!("{:04}-{:02}-{:02}", y, m, d))
}

fn datetime_value_strategy() -> impl Strategy<Value = String> {
    (date_value_strategy(), 0..24u32, 0..60u32, 0..60u32)
        .prop_map(|(date, h, m, s)| format!("{}T{:02}:{:02}:{:02}", date, h, m, s))
}

fn value_strategy(value_type: ValueType) -> BoxedStrategy<String> {
    match value_type {
        ValueType::String => string_value_strategy().boxed(),
        ValueType::Number => number_value_strategy().boxed(),
        ValueType::Boolean => any::<bool>().prop_map(|b| b.to_string()).boxed(),
        ValueType::Date => date_value_strategy().boxed(),
        ValueType::DateTime => datetime_value_strategy().boxed(),
    }
}

/// Generate a complete condition against the test schema
fn condition_strategy() -> impl Strategy<Value = Condition> {
    let props: Vec<Arc<PropertyDescriptor>> = descriptors().into_iter().map(Arc::new).collect();

    (0..props.len()).prop_flat_map(move |i| {
        let property = props[i].clone();
        let ops = operators_for(property.value_type);
        (
            Just(property.clone()),
            prop::sample::select(ops),
            value_strategy(property.value_type),
            any::<bool>(),
        )
            .prop_map(|(property, op, value, ci)| {
                let ci = ci && property.value_type == ValueType::String;
                Condition::for_property(property)
                    .with_operator(op)
                    .with_value(value)
                    .with_case_insensitive(ci)
            })
    })
}

fn connective_strategy() -> impl Strategy<Value = Connective> {
    prop_oneof![Just(Connective::And), Just(Connective::Or)]
}

/// Chain conditions with one connective throughout
fn chain(mut conditions: Vec<Condition>, connective: Connective) -> Vec<Condition> {
    let last = conditions.len().saturating_sub(1);
    for (i, cond) in conditions.iter_mut().enumerate() {
        cond.next_connective = (i < last).then_some(connective);
    }
    conditions
}

fn property_name(cond: &Condition) -> &str {
    cond.property.as_ref().map(|p| p.name.as_str()).unwrap_or("")
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Uniform chains survive a serialize/parse round trip
    #[test]
    fn prop_uniform_chain_round_trip(
        conditions in prop::collection::vec(condition_strategy(), 1..=6),
        connective in connective_strategy()
    ) {
        let schema = schema();
        let original = chain(conditions, connective);
        let query = serialize(&original);
        let parsed = parse(&query, &schema);

        prop_assert_eq!(parsed.len(), original.len(), "query: {}", query);
        for (a, b) in original.iter().zip(parsed.iter()) {
            prop_assert_eq!(property_name(a), property_name(b));
            prop_assert_eq!(a.operator, b.operator);
            prop_assert_eq!(&a.raw_value, &b.raw_value);
            prop_assert_eq!(a.case_insensitive, b.case_insensitive);
            prop_assert_eq!(a.next_connective, b.next_connective);
        }
    }

    /// Mixed connectives are preserved per position
    #[test]
    fn prop_mixed_connectives_preserved(
        conditions in prop::collection::vec(condition_strategy(), 2..=6),
        connectives in prop::collection::vec(connective_strategy(), 6)
    ) {
        let schema = schema();
        let last = conditions.len() - 1;
        let original: Vec<Condition> = conditions
            .into_iter()
            .enumerate()
            .map(|(i, mut c)| {
                c.next_connective = (i < last).then(|| connectives[i]);
                c
            })
            .collect();

        let parsed = parse(&serialize(&original), &schema);
        let expected: Vec<_> = original.iter().map(|c| c.next_connective).collect();
        let actual: Vec<_> = parsed.iter().map(|c| c.next_connective).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Two-character symbols win over their one-character prefixes
    #[test]
    fn prop_longest_operator_wins(value in number_value_strategy()) {
        let schema = schema();
        for op in operators_for(ValueType::Number) {
            let query = format!("Salary{}{}", op.symbol(), value);
            let parsed = parse(&query, &schema);
            prop_assert_eq!(parsed.len(), 1, "query: {}", query);
            prop_assert_eq!(parsed[0].operator, *op);
            prop_assert_eq!(&parsed[0].raw_value, &value);
        }
    }

    /// Unknown properties only remove their own segment
    #[test]
    fn prop_unknown_property_dropped(
        conditions in prop::collection::vec(condition_strategy(), 1..=4),
        position in 0usize..=4
    ) {
        let schema = schema();
        let query = serialize(&chain(conditions.clone(), Connective::And));
        let mut segments: Vec<&str> = query.split(',').collect();
        let position = position.min(segments.len());
        segments.insert(position, "Bogus=1");

        let parsed = parse(&segments.join(","), &schema);
        prop_assert_eq!(parsed.len(), conditions.len());
    }

    /// Canonical date output is a fixed point
    #[test]
    fn prop_canonical_dates_idempotent(
        date in date_value_strategy(),
        datetime in datetime_value_strategy()
    ) {
        prop_assert_eq!(canonicalize(&date, ValueType::Date), date.clone());
        prop_assert_eq!(canonicalize(&datetime, ValueType::DateTime), datetime.clone());

        let once = canonicalize(&datetime, ValueType::Date);
        prop_assert_eq!(canonicalize(&once, ValueType::Date), once.clone());
    }

    /// Parsing arbitrary text never panics and only yields complete conditions
    #[test]
    fn prop_parse_is_total(query in "[A-Za-z0-9=!<>^$*,|/ .:-]{0,40}") {
        let schema = schema();
        for cond in parse(&query, &schema) {
            prop_assert!(cond.is_valid());
            let op = cond.operator;
            prop_assert!(Operator::all().contains(&op));
        }
    }
}
