//! In-memory events service used by tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::RegistrationBackend;
use crate::errors::AppError;
use crate::models::{
    Event, EventRegistrations, MemberRegistration, PublicRegistration, PublicRegistrationRequest,
    RegistrationFormSchema,
};
use crate::session::Session;

#[derive(Default)]
struct Store {
    events: HashMap<String, Event>,
    registrations: HashMap<String, EventRegistrations>,
    failure: Option<String>,
    saves: usize,
}

/// Events service stand-in holding everything in a map.
#[derive(Default)]
pub struct InMemoryBackend {
    store: Mutex<Store>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(self, event: Event) -> Self {
        self.store
            .lock()
            .unwrap()
            .events
            .insert(event.id.clone(), event);
        self
    }

    pub fn add_member_registration(&self, event_id: &str, registration: MemberRegistration) {
        self.store
            .lock()
            .unwrap()
            .registrations
            .entry(event_id.to_string())
            .or_default()
            .member_registrations
            .push(registration);
    }

    pub fn add_public_registration(&self, event_id: &str, registration: PublicRegistration) {
        self.store
            .lock()
            .unwrap()
            .registrations
            .entry(event_id.to_string())
            .or_default()
            .public_registrations
            .push(registration);
    }

    /// Make every following call fail with `message` until cleared.
    pub fn fail_with(&self, message: Option<&str>) {
        self.store.lock().unwrap().failure = message.map(str::to_string);
    }

    pub fn saved_form(&self, event_id: &str) -> Option<RegistrationFormSchema> {
        let store = self.store.lock().unwrap();
        store
            .events
            .get(event_id)
            .map(|e| e.registration_form.clone())
    }

    pub fn save_count(&self) -> usize {
        self.store.lock().unwrap().saves
    }

    pub fn public_registrations(&self, event_id: &str) -> Vec<PublicRegistration> {
        let store = self.store.lock().unwrap();
        store
            .registrations
            .get(event_id)
            .map(|r| r.public_registrations.clone())
            .unwrap_or_default()
    }

    fn check_failure(store: &Store) -> Result<(), AppError> {
        match &store.failure {
            Some(message) => Err(AppError::Upstream {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RegistrationBackend for InMemoryBackend {
    async fn event(&self, _session: &Session, event_id: &str) -> Result<Event, AppError> {
        let store = self.store.lock().unwrap();
        Self::check_failure(&store)?;
        store.events.get(event_id).cloned().ok_or(AppError::Upstream {
            status: 404,
            message: format!("Event {} not found", event_id),
        })
    }

    async fn event_by_slug(
        &self,
        _session: &Session,
        slug: &str,
    ) -> Result<Option<Event>, AppError> {
        let store = self.store.lock().unwrap();
        Self::check_failure(&store)?;
        Ok(store
            .events
            .values()
            .find(|e| e.registration_form.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn submit_public_registration(
        &self,
        _session: &Session,
        event_id: &str,
        request: &PublicRegistrationRequest,
    ) -> Result<(), AppError> {
        let mut store = self.store.lock().unwrap();
        Self::check_failure(&store)?;
        let event = store.events.get(event_id).ok_or(AppError::Upstream {
            status: 404,
            message: format!("Event {} not found", event_id),
        })?;
        if !event.registration_form.enabled {
            return Err(AppError::Upstream {
                status: 403,
                message: "Registration is closed".to_string(),
            });
        }

        let fields = serde_json::to_value(&event.registration_form.fields)?;
        let regs = store.registrations.entry(event_id.to_string()).or_default();
        let id = format!("p{}", regs.public_registrations.len() + 1);
        regs.public_registrations.push(PublicRegistration {
            id,
            form_data: request.form_data.clone(),
            fields,
            submitted_at: chrono::Utc::now().to_rfc3339(),
        });
        Ok(())
    }

    async fn event_registrations(
        &self,
        _session: &Session,
        event_id: &str,
    ) -> Result<EventRegistrations, AppError> {
        let store = self.store.lock().unwrap();
        Self::check_failure(&store)?;
        Ok(store
            .registrations
            .get(event_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_registration_form(
        &self,
        _session: &Session,
        event_id: &str,
        schema: &RegistrationFormSchema,
    ) -> Result<(), AppError> {
        let mut store = self.store.lock().unwrap();
        Self::check_failure(&store)?;
        let event = store.events.get_mut(event_id).ok_or(AppError::Upstream {
            status: 404,
            message: format!("Event {} not found", event_id),
        })?;
        event.registration_form = schema.clone();
        store.saves += 1;
        Ok(())
    }
}
