//! Property schema module
//!
//! The schema is the externally supplied, ordered list of filterable
//! properties. The query core only ever reads it.

mod property;
mod registry;

pub use property::*;
pub use registry::*;
