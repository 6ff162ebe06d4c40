//! Registration form builder endpoints (admin).

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::bus::PortalEvent;
use crate::models::{
    AddFieldRequest, FieldPatch, FormSettingsRequest, MoveFieldRequest, UpdateOptionRequest,
};
use crate::registration::{DraftEdit, DraftView};
use crate::session::Session;
use crate::AppState;

/// POST /api/admin/events/{id}/form - Open (or resume) the form draft.
pub async fn open_form_draft(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<String>,
) -> ApiResult<DraftView> {
    let view = state
        .drafts
        .open(state.backend.as_ref(), &session, &event_id)
        .await?;
    success(view)
}

/// GET /api/admin/events/{id}/form - Get the open draft.
pub async fn get_form_draft(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<DraftView> {
    success(state.drafts.view(&event_id).await?)
}

/// DELETE /api/admin/events/{id}/form - Discard the draft.
pub async fn cancel_form_draft(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> ApiResult<()> {
    if state.drafts.cancel(&event_id).await {
        state.bus.publish(PortalEvent::DraftDiscarded { event_id });
    }
    success(())
}

/// POST /api/admin/events/{id}/form/fields - Append a field.
pub async fn add_field(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(request): Json<AddFieldRequest>,
) -> ApiResult<DraftView> {
    let view = state
        .drafts
        .edit(&event_id, DraftEdit::AddField(request.field_type))
        .await?;
    success(view)
}

/// PATCH /api/admin/events/{id}/form/fields/{field_id} - Edit a field.
pub async fn update_field(
    State(state): State<AppState>,
    Path((event_id, field_id)): Path<(String, String)>,
    Json(patch): Json<FieldPatch>,
) -> ApiResult<DraftView> {
    let view = state
        .drafts
        .edit(&event_id, DraftEdit::UpdateField { field_id, patch })
        .await?;
    success(view)
}

/// DELETE /api/admin/events/{id}/form/fields/{field_id} - Remove a field.
pub async fn remove_field(
    State(state): State<AppState>,
    Path((event_id, field_id)): Path<(String, String)>,
) -> ApiResult<DraftView> {
    let view = state
        .drafts
        .edit(&event_id, DraftEdit::RemoveField { field_id })
        .await?;
    success(view)
}

/// POST /api/admin/events/{id}/form/move - Reorder fields.
pub async fn move_field(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(request): Json<MoveFieldRequest>,
) -> ApiResult<DraftView> {
    let edit = DraftEdit::MoveField {
        from: request.from,
        to: request.to,
    };
    success(state.drafts.edit(&event_id, edit).await?)
}

/// POST /api/admin/events/{id}/form/fields/{field_id}/options - Append an option.
pub async fn add_option(
    State(state): State<AppState>,
    Path((event_id, field_id)): Path<(String, String)>,
) -> ApiResult<DraftView> {
    let view = state
        .drafts
        .edit(&event_id, DraftEdit::AddOption { field_id })
        .await?;
    success(view)
}

/// PUT /api/admin/events/{id}/form/fields/{field_id}/options/{index} - Edit an option.
pub async fn update_option(
    State(state): State<AppState>,
    Path((event_id, field_id, index)): Path<(String, String, usize)>,
    Json(request): Json<UpdateOptionRequest>,
) -> ApiResult<DraftView> {
    let edit = DraftEdit::UpdateOption {
        field_id,
        index,
        value: request.value,
    };
    success(state.drafts.edit(&event_id, edit).await?)
}

/// PUT /api/admin/events/{id}/form/settings - Toggle registration or change the slug.
pub async fn update_form_settings(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(request): Json<FormSettingsRequest>,
) -> ApiResult<DraftView> {
    let edit = DraftEdit::Settings {
        enabled: request.enabled,
        slug: request.slug,
    };
    success(state.drafts.edit(&event_id, edit).await?)
}

/// POST /api/admin/events/{id}/form/save - Persist the draft on the event.
pub async fn save_form_draft(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<String>,
) -> ApiResult<DraftView> {
    let view = state
        .drafts
        .save(state.backend.as_ref(), &session, &event_id)
        .await?;

    state.bus.publish(PortalEvent::FormSaved {
        event_id,
        field_count: view.fields.len(),
    });
    success(view)
}
