//! reqwest client for the events service REST API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use super::RegistrationBackend;
use crate::errors::AppError;
use crate::models::{Event, EventRegistrations, PublicRegistrationRequest, RegistrationFormSchema};
use crate::session::Session;

/// Header carrying the correlation id of an upstream request.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Events service client.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Internal(format!("Invalid events service URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Internal(format!(
                "Invalid events service URL: {}",
                base_url
            )));
        }

        let http = Client::builder()
            .user_agent(concat!("events-portal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Build an endpoint URL below the base, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn execute(&self, session: &Session, request: RequestBuilder) -> Result<Response, AppError> {
        let request_id = Uuid::new_v4().to_string();
        let mut request = request.header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = session.token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(
            "Events service answered {} for request {} (authenticated: {})",
            status,
            request_id,
            session.is_authenticated()
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = upstream_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Events service error")
                .to_string()
        });
        tracing::warn!(
            "Events service returned {} for request {}: {}",
            status,
            request_id,
            message
        );

        Err(AppError::Upstream {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        session: &Session,
        request: RequestBuilder,
    ) -> Result<T, AppError> {
        let response = self.execute(session, request).await?;
        let bytes = response.bytes().await?;
        decode(&bytes)
    }
}

/// Parse a success body, accepting both `{ "data": ... }` and bare payloads.
///
/// When the body carries a `data` key only that payload is decoded, so a bad
/// record inside the envelope is reported instead of hidden.
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let mut body: Value = serde_json::from_slice(bytes).map_err(unexpected_payload)?;
    let data = body.as_object_mut().and_then(|object| object.remove("data"));
    serde_json::from_value(data.unwrap_or(body)).map_err(unexpected_payload)
}

fn unexpected_payload(err: serde_json::Error) -> AppError {
    tracing::error!("Unexpected events service payload: {:?}", err);
    AppError::Internal(format!("Unexpected response from events service: {}", err))
}

/// Pull the human-readable message out of an error body.
fn upstream_message(body: &str) -> Option<String> {
    let text = body.trim();
    if text.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return Some(text.to_string());
    };

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| value.get("error").and_then(Value::as_str))
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        });

    Some(message.map(str::to_string).unwrap_or_else(|| text.to_string()))
}

#[async_trait]
impl RegistrationBackend for HttpBackend {
    async fn event(&self, session: &Session, event_id: &str) -> Result<Event, AppError> {
        let url = self.endpoint(&["events", event_id]);
        self.fetch(session, self.http.get(url)).await
    }

    async fn event_by_slug(
        &self,
        session: &Session,
        slug: &str,
    ) -> Result<Option<Event>, AppError> {
        let url = self.endpoint(&["events", "slug", slug]);
        match self.fetch(session, self.http.get(url)).await {
            Ok(event) => Ok(Some(event)),
            Err(AppError::Upstream { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn submit_public_registration(
        &self,
        session: &Session,
        event_id: &str,
        request: &PublicRegistrationRequest,
    ) -> Result<(), AppError> {
        let url = self.endpoint(&["events", event_id, "public-registrations"]);
        self.execute(session, self.http.post(url).json(request)).await?;
        Ok(())
    }

    async fn event_registrations(
        &self,
        session: &Session,
        event_id: &str,
    ) -> Result<EventRegistrations, AppError> {
        let url = self.endpoint(&["events", event_id, "registrations"]);
        self.fetch(session, self.http.get(url)).await
    }

    async fn save_registration_form(
        &self,
        session: &Session,
        event_id: &str,
        schema: &RegistrationFormSchema,
    ) -> Result<(), AppError> {
        let url = self.endpoint(&["events", event_id, "registration-form"]);
        self.execute(session, self.http.put(url).json(schema)).await?;
        Ok(())
    }
}
