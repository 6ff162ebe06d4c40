//! Access to the community events service.
//!
//! The portal never stores events or registrations itself; every read and
//! write goes through [`RegistrationBackend`].

mod http;
#[cfg(test)]
pub mod memory;

pub use http::HttpBackend;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{Event, EventRegistrations, PublicRegistrationRequest, RegistrationFormSchema};
use crate::session::Session;

/// Calls the registration subsystem makes against the events service.
#[async_trait]
pub trait RegistrationBackend: Send + Sync {
    /// Load an event with its persisted registration form.
    async fn event(&self, session: &Session, event_id: &str) -> Result<Event, AppError>;

    /// Load the event whose public registration lives at `slug`.
    async fn event_by_slug(&self, session: &Session, slug: &str)
        -> Result<Option<Event>, AppError>;

    /// Store an anonymous registration for an event.
    async fn submit_public_registration(
        &self,
        session: &Session,
        event_id: &str,
        request: &PublicRegistrationRequest,
    ) -> Result<(), AppError>;

    /// Fetch member and public registrations for an event.
    async fn event_registrations(
        &self,
        session: &Session,
        event_id: &str,
    ) -> Result<EventRegistrations, AppError>;

    /// Persist `{fields, enabled, slug}` on an event.
    async fn save_registration_form(
        &self,
        session: &Session,
        event_id: &str,
        schema: &RegistrationFormSchema,
    ) -> Result<(), AppError>;
}
