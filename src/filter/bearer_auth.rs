//! Bearer token check (header extraction → validation → reject or pass).
//!
//! - Only the first `Authorization` value is inspected.
//! - The literal `"Bearer"` is removed wherever it occurs in that value, not
//!   just as a prefix; leftover whitespace is left for the validator.
//! - On success the original request is forwarded untouched.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    http::{HeaderValue, header},
    response::IntoResponse,
};
use tracing::{debug, error};

use crate::error::AuthError;
use crate::filter::{FilterResult, GatewayFilter, GatewayRequest, Next};
use crate::services::auth::{TokenValidator, TokenValidity};

/// Strip every occurrence of the literal `"Bearer"` from a header value.
pub fn strip_bearer(value: &str) -> String {
    value.replace("Bearer", "")
}

#[derive(Debug, Clone)]
pub struct BearerAuthFilter {
    validator: Arc<TokenValidator>,
}

impl BearerAuthFilter {
    pub fn new(validator: Arc<TokenValidator>) -> Self {
        Self { validator }
    }

    /// Returns the authenticated subject, or the reason for rejection.
    pub fn authorize(&self, req: &GatewayRequest) -> Result<String, AuthError> {
        // `get` yields the first value when the header is repeated.
        let value = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorizationHeader)?;

        let token = token_from(value).ok_or(AuthError::InvalidToken)?;

        match self.validator.validate(&token) {
            TokenValidity::Valid { subject } => Ok(subject),
            TokenValidity::Invalid => Err(AuthError::InvalidToken),
        }
    }
}

// Non-visible-ASCII header values cannot carry a JWT.
fn token_from(value: &HeaderValue) -> Option<String> {
    value.to_str().ok().map(strip_bearer)
}

#[async_trait]
impl GatewayFilter for BearerAuthFilter {
    fn name(&self) -> &'static str {
        "bearer-auth"
    }

    async fn filter(&self, req: GatewayRequest, next: Next<'_>) -> FilterResult {
        match self.authorize(&req) {
            Ok(subject) => {
                debug!(request_id = %req.id(), subject = %subject, "request authorized");
                next.run(req).await
            }
            Err(reason) => {
                error!(request_id = %req.id(), reason = %reason, "request rejected");
                Ok(reason.into_response())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterChain;
    use crate::filter::test_support::{LogBuffer, request};
    use crate::services::auth::SecretEncoding;
    use crate::services::auth::token::tests::{SECRET, now, sign};
    use crate::services::backend::testing::StubBackend;
    use axum::http::StatusCode;

    fn filter() -> BearerAuthFilter {
        BearerAuthFilter::new(Arc::new(
            TokenValidator::new(SECRET, SecretEncoding::Raw).unwrap(),
        ))
    }

    fn chain(backend: Arc<StubBackend>) -> FilterChain {
        FilterChain::new(vec![Arc::new(filter())], backend)
    }

    async fn body_of(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn strip_bearer_is_literal_and_unanchored() {
        assert_eq!(strip_bearer("Bearer abc"), " abc");
        assert_eq!(strip_bearer("Bearerabc"), "abc");
        assert_eq!(strip_bearer("abcBearer"), "abc");
        assert_eq!(strip_bearer("bearer abc"), "bearer abc");
        assert_eq!(strip_bearer("Bearer Bearer x"), "  x");
    }

    #[test]
    fn authorize_distinguishes_missing_from_invalid() {
        let f = filter();
        assert_eq!(
            f.authorize(&request(&[])),
            Err(AuthError::MissingAuthorizationHeader)
        );
        assert_eq!(
            f.authorize(&request(&[("authorization", "Bearer nope")])),
            Err(AuthError::InvalidToken)
        );
        assert_eq!(
            f.authorize(&request(&[("authorization", "")])),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn only_first_authorization_value_counts() {
        let good = format!("Bearer {}", sign(SECRET, Some("user-42"), now() + 3600));
        let f = filter();

        let req = request(&[("authorization", "Bearer junk"), ("authorization", good.as_str())]);
        assert_eq!(f.authorize(&req), Err(AuthError::InvalidToken));

        let req = request(&[("authorization", good.as_str()), ("authorization", "Bearer junk")]);
        assert_eq!(f.authorize(&req), Ok("user-42".to_string()));
    }

    #[tokio::test]
    async fn missing_header_rejects_without_backend_call() {
        let (logs, _guard) = LogBuffer::capture();
        let backend = Arc::new(StubBackend::ok("secret data"));

        let resp = chain(backend.clone()).handle(request(&[])).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(backend.calls(), 0);
        assert!(body_of(resp).await.contains("no authorization header"));
        assert!(logs.contents().contains("no authorization header"));
    }

    #[tokio::test]
    async fn expired_token_rejects_without_backend_call() {
        let backend = Arc::new(StubBackend::ok("secret data"));
        let token = sign(SECRET, Some("user-42"), now() - 1);
        let header = format!("Bearer {token}");

        let resp = chain(backend.clone())
            .handle(request(&[("authorization", header.as_str())]))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn wrongly_signed_token_reports_invalid_token() {
        let (logs, _guard) = LogBuffer::capture();
        let backend = Arc::new(StubBackend::ok("secret data"));
        let token = sign("someone-elses-secret", Some("user-42"), now() + 3600);
        let header = format!("Bearer {token}");

        let resp = chain(backend.clone())
            .handle(request(&[("authorization", header.as_str())]))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(backend.calls(), 0);
        let body = body_of(resp).await;
        assert!(body.contains("token is not valid"));
        assert!(!body.contains("no authorization header"));
        assert!(logs.contents().contains("token is not valid"));
    }

    #[tokio::test]
    async fn valid_token_forwards_original_request_once() {
        let backend = Arc::new(StubBackend::ok("backend says hi"));
        let token = sign(SECRET, Some("user-42"), now() + 3600);
        let header = format!("Bearer {token}");
        let req = request(&[("authorization", header.as_str()), ("accept", "application/json")]);
        let original = req.clone();

        let resp = chain(backend.clone()).handle(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, "backend says hi");
        let received = backend.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].headers(), original.headers());
        assert_eq!(received[0].uri(), original.uri());
        assert_eq!(received[0].id(), original.id());
    }
}
