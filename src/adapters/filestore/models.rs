//! On-disk record formats for the file store

use crate::domain::{Definition, DefinitionId, ResolutionError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute listing the IDs a definition depends on
pub const DEPENDS_ON: &str = "dependsOn";

/// Application record stored at `<tenant>/applications/<id>.json`
///
/// Only the fields the store needs are modelled; the full file is still
/// exported verbatim as the application's own definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationRecord {
    /// The application's definition ID, equal to the file stem
    pub id: DefinitionId,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Definitions the application references directly
    #[serde(default)]
    pub definitions: Vec<DefinitionId>,
}

/// Direct dependencies declared by a stored definition
///
/// A missing `dependsOn` attribute means no dependencies.
///
/// # Errors
///
/// Returns [`ResolutionError::Malformed`] if the attribute is not an array of
/// non-empty strings.
pub fn dependencies_of(definition: &Definition) -> Result<Vec<DefinitionId>, ResolutionError> {
    let malformed = |message: String| ResolutionError::Malformed {
        id: definition.id.clone(),
        message,
    };

    match definition.attribute(DEPENDS_ON) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => DefinitionId::new(s.as_str()).map_err(malformed),
                other => Err(malformed(format!(
                    "{DEPENDS_ON} entries must be strings, got {other}"
                ))),
            })
            .collect(),
        Some(other) => Err(malformed(format!(
            "{DEPENDS_ON} must be an array, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_application_record_defaults() {
        let record: ApplicationRecord = serde_json::from_value(json!({"id": "app-1"})).unwrap();
        assert_eq!(record.id.as_str(), "app-1");
        assert!(record.name.is_none());
        assert!(record.definitions.is_empty());
    }

    #[test]
    fn test_application_record_ignores_extra_fields() {
        let record: ApplicationRecord = serde_json::from_value(json!({
            "id": "app-1",
            "name": "CRM",
            "definitions": ["a", "b"],
            "translations": [{"language_code": "en"}]
        }))
        .unwrap();
        assert_eq!(record.name.as_deref(), Some("CRM"));
        assert_eq!(record.definitions.len(), 2);
    }

    #[test]
    fn test_dependencies_of() {
        let none = Definition::from_value(json!({"id": "a"})).unwrap();
        assert!(dependencies_of(&none).unwrap().is_empty());

        let some = Definition::from_value(json!({"id": "a", "dependsOn": ["b", "c"]})).unwrap();
        let deps: Vec<String> = dependencies_of(&some)
            .unwrap()
            .into_iter()
            .map(DefinitionId::into_inner)
            .collect();
        assert_eq!(deps, vec!["b", "c"]);
    }

    #[test]
    fn test_dependencies_of_malformed() {
        let not_array = Definition::from_value(json!({"id": "a", "dependsOn": "b"})).unwrap();
        assert!(matches!(
            dependencies_of(&not_array),
            Err(ResolutionError::Malformed { .. })
        ));

        let bad_entry = Definition::from_value(json!({"id": "a", "dependsOn": [1]})).unwrap();
        assert!(dependencies_of(&bad_entry).is_err());
    }
}
