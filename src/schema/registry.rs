//! Ordered schema with case-insensitive name lookup

use ahash::AHashMap;
use std::sync::Arc;
use tracing::warn;

use crate::error::{QueryError, Result};
use crate::schema::PropertyDescriptor;

/// Ordered collection of filterable properties
///
/// Lookup keys are ASCII-lowercased names. When two descriptors share a
/// name (ignoring case) the first one wins, matching a linear
/// first-match scan over the list.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    properties: Vec<Arc<PropertyDescriptor>>,
    index: AHashMap<String, usize>,
}

impl Schema {
    /// Build a schema, rejecting descriptors with a blank name
    pub fn new(properties: Vec<PropertyDescriptor>) -> Result<Self> {
        let mut schema = Self {
            properties: Vec::with_capacity(properties.len()),
            index: AHashMap::with_capacity(properties.len()),
        };

        for prop in properties {
            if prop.name.trim().is_empty() {
                return Err(QueryError::InvalidSchema(format!(
                    "Property with display label {:?} has an empty name",
                    prop.display_label
                )));
            }
            schema.push(prop);
        }

        Ok(schema)
    }

    fn push(&mut self, prop: PropertyDescriptor) {
        let key = prop.name.to_ascii_lowercase();
        if self.index.contains_key(&key) {
            warn!(property = %prop.name, "duplicate property name in schema, keeping the first");
        } else {
            self.index.insert(key, self.properties.len());
        }
        self.properties.push(Arc::new(prop));
    }

    /// Find a property by name, ignoring ASCII case
    #[inline]
    pub fn find(&self, name: &str) -> Option<&Arc<PropertyDescriptor>> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.properties[i])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PropertyDescriptor>> {
        self.properties.iter()
    }
}
