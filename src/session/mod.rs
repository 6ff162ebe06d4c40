//! Per-request session context.
//!
//! The caller's token is read once from the `Authorization` header and handed
//! explicitly to every events-service call that needs it.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// Session of the browser making the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// A session without credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then_some(token),
        }
    }

    /// Bearer token to forward to the events service.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(Session::with_token)
            .unwrap_or_default();

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Session {
        let (mut parts, _) = request.into_parts();
        Session::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_bearer_token_is_captured() {
        let request = Request::builder()
            .header("authorization", "Bearer abc123")
            .body(())
            .unwrap();

        let session = extract(request).await;
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        let session = extract(Request::builder().body(()).unwrap()).await;
        assert_eq!(session, Session::anonymous());
    }

    #[test]
    fn test_blank_token_is_anonymous() {
        assert!(!Session::with_token("  ").is_authenticated());
    }
}
