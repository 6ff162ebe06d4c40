//! Form schema builder.
//!
//! Holds the field list an administrator is editing. Every operation is a
//! local state change; nothing reaches the events service until the draft
//! is saved.

use chrono::Utc;
use serde::Serialize;

use crate::models::{FieldDefinition, FieldPatch, FieldType, RegistrationFormSchema};

/// Editable registration form for one event.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormSchemaBuilder {
    fields: Vec<FieldDefinition>,
    enabled: bool,
    slug: Option<String>,
    #[serde(skip)]
    last_issued: i64,
}

impl FormSchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume editing a persisted schema.
    pub fn from_schema(schema: RegistrationFormSchema) -> Self {
        Self {
            fields: schema.fields,
            enabled: schema.enabled,
            slug: schema.slug,
            last_issued: 0,
        }
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Snapshot of the form as it would be persisted.
    pub fn schema(&self) -> RegistrationFormSchema {
        RegistrationFormSchema {
            fields: self.fields.clone(),
            enabled: self.enabled,
            slug: self.slug.clone(),
        }
    }

    /// Append a blank field of the given type.
    pub fn add_field(&mut self, field_type: FieldType) -> &FieldDefinition {
        let id = self.next_field_id();
        self.fields.push(FieldDefinition::new(id, field_type));
        &self.fields[self.fields.len() - 1]
    }

    /// Merge `patch` into the field with `id`. Unknown ids are ignored.
    pub fn update_field(&mut self, id: &str, patch: FieldPatch) {
        if let Some(field) = self.field_mut(id) {
            field.apply(patch);
        }
    }

    pub fn remove_field(&mut self, id: &str) {
        self.fields.retain(|f| f.id != id);
    }

    /// Move the field at `from` so it ends up at `to`.
    ///
    /// Returns `false` without changes when `from` is out of range; `to` is
    /// clamped to the last position.
    pub fn move_field(&mut self, from: usize, to: usize) -> bool {
        if from >= self.fields.len() {
            return false;
        }
        let to = to.min(self.fields.len() - 1);
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        true
    }

    /// Append a blank option to a select field.
    pub fn add_option(&mut self, field_id: &str) {
        if let Some(options) = self.field_mut(field_id).and_then(|f| f.kind.options_mut()) {
            options.push(String::new());
        }
    }

    /// Replace one option of a select field. Out-of-range indexes are ignored.
    pub fn update_option(&mut self, field_id: &str, index: usize, value: impl Into<String>) {
        if let Some(option) = self
            .field_mut(field_id)
            .and_then(|f| f.kind.options_mut())
            .and_then(|options| options.get_mut(index))
        {
            *option = value.into();
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Set the public slug; blank clears it.
    pub fn set_slug(&mut self, slug: &str) {
        let slug = slug.trim();
        self.slug = (!slug.is_empty()).then(|| slug.to_string());
    }

    fn field_mut(&mut self, id: &str) -> Option<&mut FieldDefinition> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    /// Ids are creation timestamps in milliseconds, bumped past any id
    /// already issued or present so two quick adds never collide.
    fn next_field_id(&mut self) -> String {
        let mut candidate = Utc::now().timestamp_millis().max(self.last_issued + 1);
        while self.fields.iter().any(|f| f.id == field_id(candidate)) {
            candidate += 1;
        }
        self.last_issued = candidate;
        field_id(candidate)
    }
}

fn field_id(millis: i64) -> String {
    format!("field_{}", millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldKind;

    fn ids(builder: &FormSchemaBuilder) -> Vec<String> {
        builder.fields().iter().map(|f| f.id.clone()).collect()
    }

    #[test]
    fn test_select_starts_with_one_blank_option() {
        let mut builder = FormSchemaBuilder::new();
        let field = builder.add_field(FieldType::Select);
        assert_eq!(field.kind.options(), [String::new()]);
        assert_eq!(field.label, "");
        assert!(!field.required);
    }

    #[test]
    fn test_other_types_have_no_options() {
        let mut builder = FormSchemaBuilder::new();
        for field_type in [
            FieldType::Text,
            FieldType::Email,
            FieldType::Tel,
            FieldType::Number,
            FieldType::Textarea,
            FieldType::Checkbox,
        ] {
            let field = builder.add_field(field_type);
            assert!(field.kind.options().is_empty());
            assert_eq!(field.field_type(), field_type);
        }
    }

    #[test]
    fn test_ids_are_unique_for_rapid_adds() {
        let mut builder = FormSchemaBuilder::new();
        for _ in 0..50 {
            builder.add_field(FieldType::Text);
        }
        let mut all = ids(&builder);
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 50);
        assert!(all.iter().all(|id| id.starts_with("field_")));
    }

    #[test]
    fn test_ids_survive_reordering() {
        let mut builder = FormSchemaBuilder::new();
        let a = builder.add_field(FieldType::Text).id.clone();
        let b = builder.add_field(FieldType::Email).id.clone();
        let c = builder.add_field(FieldType::Select).id.clone();

        assert!(builder.move_field(0, 2));
        assert_eq!(ids(&builder), [b.clone(), c.clone(), a.clone()]);

        builder.remove_field(&c);
        assert!(builder.move_field(1, 0));
        assert_eq!(ids(&builder), [a.clone(), b.clone()]);
        assert_eq!(builder.fields()[1].field_type(), FieldType::Email);

        let d = builder.add_field(FieldType::Tel).id.clone();
        assert!(![a, b].contains(&d));
    }

    #[test]
    fn test_move_is_bounds_checked() {
        let mut builder = FormSchemaBuilder::new();
        assert!(!builder.move_field(0, 0));

        let a = builder.add_field(FieldType::Text).id.clone();
        let b = builder.add_field(FieldType::Text).id.clone();

        assert!(!builder.move_field(5, 0));
        assert_eq!(ids(&builder), [a.clone(), b.clone()]);

        assert!(builder.move_field(0, 99));
        assert_eq!(ids(&builder), [b, a]);
    }

    #[test]
    fn test_update_and_remove_unknown_ids_are_noops() {
        let mut builder = FormSchemaBuilder::new();
        builder.add_field(FieldType::Text);
        let before = builder.schema();

        builder.update_field(
            "missing",
            FieldPatch {
                label: Some("x".to_string()),
                ..Default::default()
            },
        );
        builder.remove_field("missing");

        assert_eq!(builder.schema(), before);
    }

    #[test]
    fn test_update_merges_only_given_attributes() {
        let mut builder = FormSchemaBuilder::new();
        let id = builder.add_field(FieldType::Email).id.clone();

        builder.update_field(
            &id,
            FieldPatch {
                label: Some("Email".to_string()),
                required: Some(true),
                ..Default::default()
            },
        );
        builder.update_field(
            &id,
            FieldPatch {
                placeholder: Some("you@example.org".to_string()),
                ..Default::default()
            },
        );

        let field = &builder.fields()[0];
        assert_eq!(field.label, "Email");
        assert!(field.required);
        assert_eq!(
            field.kind,
            FieldKind::Email {
                placeholder: "you@example.org".to_string()
            }
        );
    }

    #[test]
    fn test_options_edit_in_place() {
        let mut builder = FormSchemaBuilder::new();
        let id = builder.add_field(FieldType::Select).id.clone();

        builder.update_option(&id, 0, "Small");
        builder.add_option(&id);
        builder.update_option(&id, 1, "Large");
        builder.update_option(&id, 7, "ignored");

        assert_eq!(builder.fields()[0].kind.options(), ["Small", "Large"]);
    }

    #[test]
    fn test_option_ops_ignore_non_select_fields() {
        let mut builder = FormSchemaBuilder::new();
        let id = builder.add_field(FieldType::Checkbox).id.clone();
        builder.add_option(&id);
        builder.update_option(&id, 0, "x");
        assert!(builder.fields()[0].kind.options().is_empty());
    }

    #[test]
    fn test_resume_from_schema_keeps_ids() {
        let mut original = FormSchemaBuilder::new();
        original.add_field(FieldType::Text);
        original.set_enabled(true);
        original.set_slug("  harvest-dinner ");

        let mut resumed = FormSchemaBuilder::from_schema(original.schema());
        assert_eq!(resumed.slug(), Some("harvest-dinner"));
        assert!(resumed.enabled());
        assert_eq!(ids(&resumed), ids(&original));

        let added = resumed.add_field(FieldType::Text).id.clone();
        assert_ne!(added, original.fields()[0].id);
    }
}
