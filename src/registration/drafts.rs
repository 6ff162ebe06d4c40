//! Open form-builder sessions, one per event.
//!
//! A draft is created from the event's persisted form, edited locally and
//! written back only on save. Cancelling drops it, so the next open starts
//! again from what was last persisted.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;

use super::builder::FormSchemaBuilder;
use crate::backend::RegistrationBackend;
use crate::errors::{AppError, FieldError};
use crate::models::{FieldDefinition, FieldPatch, FieldType, RegistrationFormSchema};
use crate::session::Session;

/// A builder operation applied to an open draft.
#[derive(Debug, Clone)]
pub enum DraftEdit {
    AddField(FieldType),
    UpdateField { field_id: String, patch: FieldPatch },
    RemoveField { field_id: String },
    MoveField { from: usize, to: usize },
    AddOption { field_id: String },
    UpdateOption { field_id: String, index: usize, value: String },
    Settings { enabled: Option<bool>, slug: Option<String> },
}

struct Draft {
    title: String,
    builder: FormSchemaBuilder,
    persisted: RegistrationFormSchema,
}

impl Draft {
    fn view(&self, event_id: &str) -> DraftView {
        let schema = self.builder.schema();
        let suggested_slug = match schema.slug {
            Some(_) => None,
            None => Some(slugify(&self.title)).filter(|s| !s.is_empty()),
        };

        DraftView {
            event_id: event_id.to_string(),
            event_title: self.title.clone(),
            dirty: schema != self.persisted,
            fields: schema.fields,
            enabled: schema.enabled,
            slug: schema.slug,
            suggested_slug,
        }
    }
}

/// What the builder screen shows for a draft.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub event_id: String,
    pub event_title: String,
    pub fields: Vec<FieldDefinition>,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_slug: Option<String>,
    /// True when the draft differs from the last persisted form.
    pub dirty: bool,
}

/// Drafts keyed by event id.
#[derive(Default)]
pub struct DraftStore {
    drafts: RwLock<HashMap<String, Draft>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the open draft for an event, loading it from the events service if needed.
    pub async fn open(
        &self,
        backend: &dyn RegistrationBackend,
        session: &Session,
        event_id: &str,
    ) -> Result<DraftView, AppError> {
        if let Some(draft) = self.drafts.read().await.get(event_id) {
            return Ok(draft.view(event_id));
        }

        let event = backend.event(session, event_id).await?;
        tracing::info!(
            "Opening form draft for event {} with {} field(s)",
            event_id,
            event.registration_form.fields.len()
        );

        let mut drafts = self.drafts.write().await;
        let draft = drafts.entry(event_id.to_string()).or_insert_with(|| Draft {
            title: event.title,
            builder: FormSchemaBuilder::from_schema(event.registration_form.clone()),
            persisted: event.registration_form,
        });
        Ok(draft.view(event_id))
    }

    pub async fn view(&self, event_id: &str) -> Result<DraftView, AppError> {
        self.drafts
            .read()
            .await
            .get(event_id)
            .map(|draft| draft.view(event_id))
            .ok_or_else(|| not_open(event_id))
    }

    pub async fn edit(&self, event_id: &str, edit: DraftEdit) -> Result<DraftView, AppError> {
        let mut drafts = self.drafts.write().await;
        let draft = drafts.get_mut(event_id).ok_or_else(|| not_open(event_id))?;
        let builder = &mut draft.builder;

        match edit {
            DraftEdit::AddField(field_type) => {
                let id = &builder.add_field(field_type).id;
                tracing::debug!("Added {} field {}", field_type.as_str(), id);
            }
            DraftEdit::UpdateField { field_id, patch } => builder.update_field(&field_id, patch),
            DraftEdit::RemoveField { field_id } => builder.remove_field(&field_id),
            DraftEdit::MoveField { from, to } => {
                if !builder.move_field(from, to) {
                    return Err(AppError::BadRequest(format!(
                        "No field at position {}",
                        from
                    )));
                }
            }
            DraftEdit::AddOption { field_id } => builder.add_option(&field_id),
            DraftEdit::UpdateOption {
                field_id,
                index,
                value,
            } => builder.update_option(&field_id, index, value),
            DraftEdit::Settings { enabled, slug } => {
                if let Some(enabled) = enabled {
                    builder.set_enabled(enabled);
                }
                if let Some(slug) = slug {
                    builder.set_slug(&slug);
                }
            }
        }

        Ok(draft.view(event_id))
    }

    /// Persist the draft. A failed save leaves the draft exactly as it was.
    pub async fn save(
        &self,
        backend: &dyn RegistrationBackend,
        session: &Session,
        event_id: &str,
    ) -> Result<DraftView, AppError> {
        let schema = self
            .drafts
            .read()
            .await
            .get(event_id)
            .map(|draft| draft.builder.schema())
            .ok_or_else(|| not_open(event_id))?;

        check_slug(&schema)?;
        if let (true, Some(slug)) = (schema.enabled, schema.slug.as_deref()) {
            if let Some(other) = backend.event_by_slug(session, slug).await? {
                if other.id != event_id && other.registration_form.enabled {
                    return Err(slug_error(format!(
                        "The slug '{}' is already used by \"{}\"",
                        slug, other.title
                    )));
                }
            }
        }

        backend
            .save_registration_form(session, event_id, &schema)
            .await?;
        tracing::info!(
            "Saved registration form for event {} ({} field(s), enabled: {})",
            event_id,
            schema.fields.len(),
            schema.enabled
        );

        let mut drafts = self.drafts.write().await;
        let draft = drafts.get_mut(event_id).ok_or_else(|| not_open(event_id))?;
        draft.persisted = schema;
        Ok(draft.view(event_id))
    }

    /// Drop the draft. Returns whether one was open.
    pub async fn cancel(&self, event_id: &str) -> bool {
        self.drafts.write().await.remove(event_id).is_some()
    }
}

fn not_open(event_id: &str) -> AppError {
    AppError::NotFound(format!("No form draft is open for event {}", event_id))
}

fn slug_error(message: String) -> AppError {
    AppError::Validation {
        message: message.clone(),
        fields: vec![FieldError::new("slug", message)],
    }
}

fn check_slug(schema: &RegistrationFormSchema) -> Result<(), AppError> {
    match schema.slug.as_deref() {
        None if schema.enabled => Err(slug_error(
            "A slug is required when registration is enabled".to_string(),
        )),
        Some(slug) if !is_valid_slug(slug) => Err(slug_error(
            "Slugs may only contain lowercase letters, numbers and hyphens".to_string(),
        )),
        _ => Ok(()),
    }
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Lowercase slug from free text: runs of other characters become one hyphen.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
