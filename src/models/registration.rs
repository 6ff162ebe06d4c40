//! Registration records for an event: signed-in members and anonymous public respondents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attendance status of a member registration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Registered,
    Attended,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::Attended => "attended",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }
}

/// Contact details of the member account behind a registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A registration made by a signed-in member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRegistration {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub member: MemberSummary,
    #[serde(default)]
    pub status: RegistrationStatus,
    /// Empty when the events service did not send one.
    #[serde(default)]
    pub registered_at: String,
}

/// A registration submitted through the public form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRegistration {
    #[serde(default)]
    pub id: String,
    /// Answers keyed by field id.
    #[serde(default)]
    pub form_data: Map<String, Value>,
    /// Field list stored alongside the record. Kept raw since older records may not hold a list.
    #[serde(default)]
    pub fields: Value,
    #[serde(default)]
    pub submitted_at: String,
}

/// Both registration populations of one event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistrations {
    #[serde(default)]
    pub member_registrations: Vec<MemberRegistration>,
    #[serde(default)]
    pub public_registrations: Vec<PublicRegistration>,
}

/// Request body for a public registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRegistrationRequest {
    #[serde(default)]
    pub form_data: Map<String, Value>,
}
