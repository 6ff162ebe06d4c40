//! Registration form field model.
//!
//! Fields travel over the wire in the flat shape the events service stores
//! (`{id, type, label, placeholder, required, options}`) and are held in
//! memory as a closed [`FieldKind`] union.

use serde::{Deserialize, Serialize};

/// Discriminator for the kinds of input an administrator can add.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Number,
    Select,
    Textarea,
    Checkbox,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
            FieldType::Checkbox => "checkbox",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(FieldType::Text),
            "email" => Some(FieldType::Email),
            "tel" => Some(FieldType::Tel),
            "number" => Some(FieldType::Number),
            "select" => Some(FieldType::Select),
            "textarea" => Some(FieldType::Textarea),
            "checkbox" => Some(FieldType::Checkbox),
            _ => None,
        }
    }
}

/// Kind-specific attributes of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text { placeholder: String },
    Email { placeholder: String },
    Tel { placeholder: String },
    Number { placeholder: String },
    Textarea { placeholder: String },
    Select { options: Vec<String> },
    /// `affirm_label` is stored as the field's placeholder and shown next to the box.
    Checkbox { affirm_label: String },
}

impl FieldKind {
    /// Fresh attributes for a newly added field. Select fields start with one blank option.
    pub fn new(field_type: FieldType) -> Self {
        Self::from_parts(field_type, String::new(), vec![String::new()])
    }

    fn from_parts(field_type: FieldType, placeholder: String, options: Vec<String>) -> Self {
        match field_type {
            FieldType::Text => FieldKind::Text { placeholder },
            FieldType::Email => FieldKind::Email { placeholder },
            FieldType::Tel => FieldKind::Tel { placeholder },
            FieldType::Number => FieldKind::Number { placeholder },
            FieldType::Textarea => FieldKind::Textarea { placeholder },
            FieldType::Select => FieldKind::Select { options },
            FieldType::Checkbox => FieldKind::Checkbox {
                affirm_label: placeholder,
            },
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text { .. } => FieldType::Text,
            FieldKind::Email { .. } => FieldType::Email,
            FieldKind::Tel { .. } => FieldType::Tel,
            FieldKind::Number { .. } => FieldType::Number,
            FieldKind::Textarea { .. } => FieldType::Textarea,
            FieldKind::Select { .. } => FieldType::Select,
            FieldKind::Checkbox { .. } => FieldType::Checkbox,
        }
    }

    /// The wire `placeholder` value, if this kind carries one.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            FieldKind::Text { placeholder }
            | FieldKind::Email { placeholder }
            | FieldKind::Tel { placeholder }
            | FieldKind::Number { placeholder }
            | FieldKind::Textarea { placeholder } => Some(placeholder),
            FieldKind::Checkbox { affirm_label } => Some(affirm_label),
            FieldKind::Select { .. } => None,
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::Select { options } => options,
            _ => &[],
        }
    }

    /// Returns the option list for select fields only.
    pub fn options_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            FieldKind::Select { options } => Some(options),
            _ => None,
        }
    }

    fn set_placeholder(&mut self, value: String) {
        match self {
            FieldKind::Text { placeholder }
            | FieldKind::Email { placeholder }
            | FieldKind::Tel { placeholder }
            | FieldKind::Number { placeholder }
            | FieldKind::Textarea { placeholder } => *placeholder = value,
            FieldKind::Checkbox { affirm_label } => *affirm_label = value,
            FieldKind::Select { .. } => {}
        }
    }
}

/// One field of an event's registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawField", into = "RawField")]
pub struct FieldDefinition {
    pub id: String,
    pub label: String,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            required: false,
            kind: FieldKind::new(field_type),
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    /// Merge a partial edit. Attributes the field's kind does not carry are ignored.
    pub fn apply(&mut self, patch: FieldPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(placeholder) = patch.placeholder {
            self.kind.set_placeholder(placeholder);
        }
        if let Some(required) = patch.required {
            self.required = required;
        }
        if let (Some(new_options), Some(options)) = (patch.options, self.kind.options_mut()) {
            *options = new_options;
        }
    }
}

/// Partial changes to a field, as sent by the form builder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

/// Flat wire representation of a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    id: String,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    options: Vec<String>,
}

impl TryFrom<RawField> for FieldDefinition {
    type Error = String;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        let field_type = FieldType::parse(&raw.field_type)
            .ok_or_else(|| format!("unknown field type '{}'", raw.field_type))?;

        Ok(Self {
            id: raw.id,
            label: raw.label,
            required: raw.required,
            kind: FieldKind::from_parts(field_type, raw.placeholder.unwrap_or_default(), raw.options),
        })
    }
}

impl From<FieldDefinition> for RawField {
    fn from(field: FieldDefinition) -> Self {
        let field_type = field.field_type().as_str().to_string();
        let placeholder = field.kind.placeholder().map(str::to_string);
        let options = match field.kind {
            FieldKind::Select { options } => options,
            _ => Vec::new(),
        };

        Self {
            id: field.id,
            field_type,
            label: field.label,
            placeholder,
            required: field.required,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checkbox_placeholder_becomes_affirm_label() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "id": "f9",
            "type": "checkbox",
            "label": "Consent",
            "placeholder": "I agree to the terms",
            "required": true
        }))
        .unwrap();

        assert_eq!(
            field.kind,
            FieldKind::Checkbox {
                affirm_label: "I agree to the terms".to_string()
            }
        );
    }

    #[test]
    fn test_wire_shape_is_flat() {
        let mut field = FieldDefinition::new("f1", FieldType::Select);
        field.label = "Meal".to_string();
        field.apply(FieldPatch {
            options: Some(vec!["Veg".to_string(), "Fish".to_string()]),
            ..Default::default()
        });

        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["type"], "select");
        assert_eq!(value["options"], json!(["Veg", "Fish"]));
        assert!(value.get("placeholder").is_none());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<FieldDefinition, _> =
            serde_json::from_value(json!({ "id": "f1", "type": "radio" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_ignores_options_on_text() {
        let mut field = FieldDefinition::new("f1", FieldType::Text);
        field.apply(FieldPatch {
            placeholder: Some("Your name".to_string()),
            options: Some(vec!["x".to_string()]),
            ..Default::default()
        });

        assert_eq!(field.kind.placeholder(), Some("Your name"));
        assert!(field.kind.options().is_empty());
    }
}
