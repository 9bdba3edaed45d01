//! Definition domain model
//!
//! A definition is the unit of export: an opaque JSON object keyed by a
//! [`DefinitionId`]. Everything besides the `id` belongs to the storage layer.

use super::ids::DefinitionId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An exportable, uniquely identified definition
///
/// Serializes as a single flat JSON object: the `id` field followed by the
/// remaining attributes exactly as the resolver produced them.
///
/// # Examples
///
/// ```
/// use compendium::domain::Definition;
/// use serde_json::json;
///
/// let def = Definition::from_value(json!({"id": "obj-1", "name": "Contacts"})).unwrap();
/// assert_eq!(def.id.as_str(), "obj-1");
/// assert_eq!(def.attribute("name"), Some(&json!("Contacts")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Unique identifier
    pub id: DefinitionId,

    /// Remaining attributes, owned by the resolver
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Definition {
    /// Creates a definition with no attributes besides its ID
    pub fn new(id: DefinitionId) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    /// Parses a definition out of a JSON object
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object or has no valid `id`
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Adds an attribute, replacing any previous value under that key
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Looks up a single attribute
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}
