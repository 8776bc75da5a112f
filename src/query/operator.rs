//! Operator and connective tables

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::ValueType;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (=)
    #[default]
    Equals,
    /// Not equal (!=)
    NotEquals,
    /// Greater than (>)
    GreaterThan,
    /// Less than (<)
    LessThan,
    /// Greater than or equal (>=)
    GreaterOrEqual,
    /// Less than or equal (<=)
    LessOrEqual,
    /// Contains (=*)
    Contains,
    /// Does not contain (!*)
    NotContains,
    /// Starts with (^)
    StartsWith,
    /// Does not start with (!^)
    NotStartsWith,
    /// Ends with ($)
    EndsWith,
    /// Does not end with (!$)
    NotEndsWith,
}

/// Operator symbols ordered longest first.
///
/// Several symbols are prefixes of others (`=` of `=*`, `>` of `>=`), so a
/// scan over this table must stop at the first hit.
pub const OPERATOR_SYMBOLS: [(&str, Operator); 12] = [
    ("!=", Operator::NotEquals),
    ("!*", Operator::NotContains),
    ("!^", Operator::NotStartsWith),
    ("!$", Operator::NotEndsWith),
    (">=", Operator::GreaterOrEqual),
    ("<=", Operator::LessOrEqual),
    ("=*", Operator::Contains),
    (">", Operator::GreaterThan),
    ("<", Operator::LessThan),
    ("=", Operator::Equals),
    ("^", Operator::StartsWith),
    ("$", Operator::EndsWith),
];

const STRING_OPERATORS: [Operator; 8] = [
    Operator::Equals,
    Operator::NotEquals,
    Operator::Contains,
    Operator::NotContains,
    Operator::StartsWith,
    Operator::NotStartsWith,
    Operator::EndsWith,
    Operator::NotEndsWith,
];

const ORDERED_OPERATORS: [Operator; 6] = [
    Operator::Equals,
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::GreaterOrEqual,
    Operator::LessOrEqual,
];

const BOOLEAN_OPERATORS: [Operator; 2] = [Operator::Equals, Operator::NotEquals];

/// Operators offered for a value type
pub fn operators_for(value_type: ValueType) -> &'static [Operator] {
    match value_type {
        ValueType::String => &STRING_OPERATORS,
        ValueType::Number | ValueType::Date | ValueType::DateTime => &ORDERED_OPERATORS,
        ValueType::Boolean => &BOOLEAN_OPERATORS,
    }
}

impl Operator {
    /// All operators in declaration order
    pub fn all() -> [Operator; 12] {
        [
            Operator::Equals,
            Operator::NotEquals,
            Operator::GreaterThan,
            Operator::LessThan,
            Operator::GreaterOrEqual,
            Operator::LessOrEqual,
            Operator::Contains,
            Operator::NotContains,
            Operator::StartsWith,
            Operator::NotStartsWith,
            Operator::EndsWith,
            Operator::NotEndsWith,
        ]
    }

    /// Query token for this operator
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::Contains => "=*",
            Operator::NotContains => "!*",
            Operator::StartsWith => "^",
            Operator::NotStartsWith => "!^",
            Operator::EndsWith => "$",
            Operator::NotEndsWith => "!$",
        }
    }

    /// Exact symbol lookup
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        OPERATOR_SYMBOLS
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|&(_, op)| op)
    }

    /// Longest symbol that prefixes `input`, with its byte length
    pub fn match_prefix(input: &str) -> Option<(Operator, usize)> {
        OPERATOR_SYMBOLS
            .iter()
            .find(|(s, _)| input.starts_with(s))
            .map(|&(s, op)| (op, s.len()))
    }

    /// Lookup by variant name ("NotEquals"), ignoring case
    pub fn from_name(name: &str) -> Option<Operator> {
        Operator::all()
            .into_iter()
            .find(|op| format!("{:?}", op).eq_ignore_ascii_case(name))
    }

    #[inline]
    pub fn is_allowed_for(self, value_type: ValueType) -> bool {
        operators_for(value_type).contains(&self)
    }

    /// English label for menus
    pub fn display_name(self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::NotEquals => "Not Equals",
            Operator::GreaterThan => "Greater Than",
            Operator::LessThan => "Less Than",
            Operator::GreaterOrEqual => "Greater or Equal",
            Operator::LessOrEqual => "Less or Equal",
            Operator::Contains => "Contains",
            Operator::NotContains => "Not Contains",
            Operator::StartsWith => "Starts With",
            Operator::NotStartsWith => "Not Starts With",
            Operator::EndsWith => "Ends With",
            Operator::NotEndsWith => "Not Ends With",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Logical join between two adjacent conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Connective {
    /// AND (,)
    #[default]
    And,
    /// OR (|)
    Or,
}

impl Connective {
    pub const AND_SYMBOL: char = ',';
    pub const OR_SYMBOL: char = '|';

    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Connective::And => Self::AND_SYMBOL,
            Connective::Or => Self::OR_SYMBOL,
        }
    }

    #[inline]
    pub fn from_symbol(c: char) -> Option<Connective> {
        match c {
            Self::AND_SYMBOL => Some(Connective::And),
            Self::OR_SYMBOL => Some(Connective::Or),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
