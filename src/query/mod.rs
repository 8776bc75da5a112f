//! Filter condition model and query language
//!
//! This module handles turning condition chains like
//! `FirstName=John,Age>30|Dept=Sales` into conditions and back.

mod condition;
pub mod operator;
pub mod parser;
pub mod serializer;
pub mod value;

#[cfg(test)]
mod property_tests;

pub use condition::*;
pub use operator::*;
pub use parser::*;
pub use serializer::*;
