//! Registration form schema owned by an event.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{FieldDefinition, FieldType};

/// The ordered field list plus the public registration switch and slug.
///
/// Serializes to the `{fields, enabled, slug}` body the events service stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationFormSchema {
    pub fields: Vec<FieldDefinition>,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl RegistrationFormSchema {
    /// Decode a stored schema without failing on unexpected shapes.
    ///
    /// A non-array `fields` yields no fields; entries that are not valid field
    /// objects are dropped.
    pub fn from_value(value: &Value) -> Self {
        let fields = match value.get("fields") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match FieldDefinition::deserialize(item) {
                    Ok(field) => Some(field),
                    Err(e) => {
                        tracing::warn!("Skipping malformed form field {}: {}", item, e);
                        None
                    }
                })
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                tracing::warn!("Registration form fields are not a list: {}", other);
                Vec::new()
            }
        };

        let enabled = value.get("enabled").and_then(Value::as_bool).unwrap_or(false);
        let slug = value
            .get("slug")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            fields,
            enabled,
            slug,
        }
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }
}

impl<'de> Deserialize<'de> for RegistrationFormSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Request body for changing a draft's public registration settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettingsRequest {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Request body for adding a field to a draft.
#[derive(Debug, Clone, Deserialize)]
pub struct AddFieldRequest {
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Request body for reordering a draft's fields.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveFieldRequest {
    pub from: usize,
    pub to: usize,
}

/// Request body for editing one select option.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOptionRequest {
    pub value: String,
}
