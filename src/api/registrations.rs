//! Registration review and export endpoints (admin).

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::registration::{aggregate, export_filename, to_csv, RegistrationTable};
use crate::session::Session;
use crate::AppState;

/// GET /api/admin/events/{id}/registrations - Member and public registrations in one table.
pub async fn list_registrations(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<String>,
) -> ApiResult<RegistrationTable> {
    let registrations = state
        .backend
        .event_registrations(&session, &event_id)
        .await?;
    success(aggregate(&registrations))
}

/// GET /api/admin/events/{id}/registrations/export - Download registrations as CSV.
pub async fn export_registrations(
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let event = state.backend.event(&session, &event_id).await?;
    let registrations = state
        .backend
        .event_registrations(&session, &event_id)
        .await?;

    let table = aggregate(&registrations);
    let csv = to_csv(&table);
    let filename = export_filename(&event.title, Utc::now().date_naive());
    tracing::info!(
        "Exporting {} registration(s) for event {} as {}",
        table.total,
        event_id,
        filename
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response())
}
