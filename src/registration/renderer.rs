//! Public registration form.
//!
//! Turns a persisted schema into input controls, collects answers keyed by
//! field id and submits them to the events service.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::backend::RegistrationBackend;
use crate::errors::{AppError, FieldError};
use crate::models::{Event, FieldDefinition, FieldKind, PublicRegistrationRequest, RegistrationFormSchema};
use crate::session::Session;

const REQUIRED_MESSAGE: &str = "This field is required";

/// Semantic type of a single-line input.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Text,
    Email,
    Tel,
    Number,
}

/// One entry of a dropdown.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// The widget used for a field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "widget", rename_all = "camelCase")]
pub enum Input {
    Line { kind: LineKind, placeholder: String },
    MultiLine { placeholder: String },
    /// The first option is always the empty prompt.
    Select { options: Vec<SelectOption> },
    /// Rendered without a separate label; `caption` sits next to the box.
    Checkbox { caption: String },
}

/// An input control for one field, in schema order.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub field_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub required: bool,
    pub input: Input,
    pub value: Value,
}

/// What the visitor sees.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum FormView {
    /// Registration is switched off for the event.
    Unavailable { title: String, message: String },
    /// The form has no fields, so there is nothing to submit.
    Empty { title: String, message: String },
    #[serde(rename_all = "camelCase")]
    Open {
        title: String,
        controls: Vec<Control>,
        submit_label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Submitted { title: String, message: String },
}

impl FormView {
    /// Whether the view offers a submit action.
    pub fn can_submit(&self) -> bool {
        matches!(self, FormView::Open { .. })
    }
}

/// Lifecycle of one visitor's form.
///
/// `submit` holds the form mutably for the whole request, so a second submit
/// cannot start while one is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitted,
    /// The last submit failed; answers are kept for a retry.
    Failed { message: String },
}

/// A visitor's registration form for one event.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    event_id: String,
    title: String,
    schema: RegistrationFormSchema,
    answers: Map<String, Value>,
    state: FormState,
}

impl RegistrationForm {
    pub fn new(event: Event) -> Self {
        Self {
            event_id: event.id,
            title: event.title,
            schema: event.registration_form,
            answers: Map::new(),
            state: FormState::Editing,
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn answers(&self) -> &Map<String, Value> {
        &self.answers
    }

    pub fn render(&self) -> FormView {
        let title = self.title.clone();

        if self.state == FormState::Submitted {
            return FormView::Submitted {
                message: format!("Thank you for registering for {}.", self.title),
                title,
            };
        }
        if self.schema.fields.is_empty() {
            return FormView::Empty {
                title,
                message: "This event has no registration questions yet.".to_string(),
            };
        }
        if !self.schema.enabled {
            return FormView::Unavailable {
                title,
                message: "Registration is not available for this event.".to_string(),
            };
        }

        let controls = self
            .schema
            .fields
            .iter()
            .map(|field| self.control(field))
            .collect();
        let error = match &self.state {
            FormState::Failed { message } => Some(message.clone()),
            _ => None,
        };

        FormView::Open {
            title,
            controls,
            submit_label: "Register".to_string(),
            error,
        }
    }

    fn control(&self, field: &FieldDefinition) -> Control {
        let (input, label) = match &field.kind {
            FieldKind::Text { placeholder } => (line(LineKind::Text, placeholder), true),
            FieldKind::Email { placeholder } => (line(LineKind::Email, placeholder), true),
            FieldKind::Tel { placeholder } => (line(LineKind::Tel, placeholder), true),
            FieldKind::Number { placeholder } => (line(LineKind::Number, placeholder), true),
            FieldKind::Textarea { placeholder } => (
                Input::MultiLine {
                    placeholder: placeholder.clone(),
                },
                true,
            ),
            FieldKind::Select { options } => {
                let prompt = SelectOption {
                    value: String::new(),
                    label: "Select an option".to_string(),
                };
                let options = std::iter::once(prompt)
                    .chain(options.iter().map(|o| SelectOption {
                        value: o.clone(),
                        label: o.clone(),
                    }))
                    .collect();
                (Input::Select { options }, true)
            }
            FieldKind::Checkbox { affirm_label } => {
                let caption = if affirm_label.is_empty() {
                    field.label.clone()
                } else {
                    affirm_label.clone()
                };
                (Input::Checkbox { caption }, false)
            }
        };

        Control {
            field_id: field.id.clone(),
            label: label.then(|| field.label.clone()),
            required: field.required,
            input,
            value: self.answers.get(&field.id).cloned().unwrap_or(Value::Null),
        }
    }

    /// Record the answer for one field. Ids not on the form are ignored.
    pub fn on_field_change(&mut self, field_id: &str, value: Value) {
        if self.schema.field(field_id).is_none() {
            tracing::debug!("Ignoring answer for unknown field {}", field_id);
            return;
        }
        self.answers.insert(field_id.to_string(), value);
    }

    /// Check every answer against its field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let errors: Vec<FieldError> = self
            .schema
            .fields
            .iter()
            .filter_map(|field| {
                check_answer(field, self.answers.get(&field.id))
                    .err()
                    .map(|message| FieldError::new(&field.id, message))
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and send the answers.
    ///
    /// On failure the answers stay in place and the error message is shown
    /// with the form so the visitor can retry.
    pub async fn submit(
        &mut self,
        backend: &dyn RegistrationBackend,
        session: &Session,
    ) -> Result<(), AppError> {
        if self.state == FormState::Submitted {
            return Err(AppError::Conflict(
                "This registration has already been submitted".to_string(),
            ));
        }
        if self.schema.fields.is_empty() {
            return Err(AppError::validation(
                "This registration form has no questions to answer",
            ));
        }
        if !self.schema.enabled {
            return Err(AppError::Unavailable(
                "Registration is not available for this event".to_string(),
            ));
        }
        if let Err(fields) = self.validate() {
            return Err(AppError::Validation {
                message: "Please correct the highlighted fields".to_string(),
                fields,
            });
        }

        let request = PublicRegistrationRequest {
            form_data: self.answers.clone(),
        };

        match backend
            .submit_public_registration(session, &self.event_id, &request)
            .await
        {
            Ok(()) => {
                tracing::info!("Public registration submitted for event {}", self.event_id);
                self.state = FormState::Submitted;
                Ok(())
            }
            Err(e) => {
                self.state = FormState::Failed {
                    message: e.message(),
                };
                Err(e)
            }
        }
    }
}

fn line(kind: LineKind, placeholder: &str) -> Input {
    Input::Line {
        kind,
        placeholder: placeholder.to_string(),
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(_) => false,
    }
}

fn check_answer(field: &FieldDefinition, value: Option<&Value>) -> Result<(), &'static str> {
    if is_blank(value) {
        return if field.required {
            Err(REQUIRED_MESSAGE)
        } else {
            Ok(())
        };
    }
    let Some(value) = value else {
        return Ok(());
    };

    match &field.kind {
        FieldKind::Email { .. } => match value.as_str() {
            Some(s) if looks_like_email(s.trim()) => Ok(()),
            _ => Err("Please enter a valid email address"),
        },
        FieldKind::Number { .. } => match value {
            Value::Number(_) => Ok(()),
            Value::String(s) if s.trim().parse::<f64>().is_ok() => Ok(()),
            _ => Err("Please enter a number"),
        },
        FieldKind::Select { options } => match value.as_str() {
            Some(s) if options.iter().any(|o| o == s) => Ok(()),
            _ => Err("Please choose one of the listed options"),
        },
        FieldKind::Checkbox { .. } => match value {
            Value::Bool(_) => Ok(()),
            _ => Err("Please tick or clear the box"),
        },
        FieldKind::Text { .. } | FieldKind::Tel { .. } | FieldKind::Textarea { .. } => {
            match value {
                Value::String(_) | Value::Number(_) => Ok(()),
                _ => Err("Please enter text"),
            }
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !s.chars().any(char::is_whitespace)
}
