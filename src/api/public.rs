//! Public registration endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::bus::PortalEvent;
use crate::errors::AppError;
use crate::models::{Event, PublicRegistrationRequest};
use crate::registration::{FormView, RegistrationForm};
use crate::session::Session;
use crate::AppState;

async fn event_for_slug(state: &AppState, session: &Session, slug: &str) -> Result<Event, AppError> {
    state
        .backend
        .event_by_slug(session, slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No registration found at '{}'", slug)))
}

/// GET /api/register/{slug} - Render the public registration form.
pub async fn get_registration_form(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> ApiResult<FormView> {
    let event = event_for_slug(&state, &session, &slug).await?;
    let view = RegistrationForm::new(event).render();
    if !view.can_submit() {
        tracing::debug!("Registration at '{}' is not accepting answers", slug);
    }
    success(view)
}

/// POST /api/register/{slug} - Submit a public registration.
pub async fn submit_registration(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Json(request): Json<PublicRegistrationRequest>,
) -> ApiResult<FormView> {
    let event = event_for_slug(&state, &session, &slug).await?;

    let mut form = RegistrationForm::new(event);
    for (field_id, value) in request.form_data {
        form.on_field_change(&field_id, value);
    }
    form.submit(state.backend.as_ref(), &session).await?;

    state.bus.publish(PortalEvent::RegistrationSubmitted {
        event_id: form.event_id().to_string(),
        slug,
    });
    success(form.render())
}
