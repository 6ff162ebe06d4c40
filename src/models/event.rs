//! Event model as returned by the events service.

use serde::{Deserialize, Serialize};

use super::RegistrationFormSchema;

/// An event that may accept registrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub registration_form: RegistrationFormSchema,
}
