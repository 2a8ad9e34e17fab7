//! Immutable request value that travels through the filter chain.
//!
//! Stages never mutate a `GatewayRequest` in place. A stage that needs
//! different headers builds a new value with [`GatewayRequest::with_headers`];
//! the body is `Bytes`, so the copy shares the same buffer.

use std::fmt;

use axum::{
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, Uri},
};
use bytes::Bytes;
use tower_http::request_id::RequestId as IngressRequestId;
use uuid::Uuid;

use crate::error::GatewayError;

/// Unique identifier assigned to a request at ingress.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct GatewayRequest {
    id: RequestId,
    method: Method,
    uri: Uri,
    // Case-insensitive names; repeated values keep their arrival order.
    headers: HeaderMap,
    body: Bytes,
}

impl GatewayRequest {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            id: RequestId::generate(),
            method,
            uri,
            headers,
            body,
        }
    }

    /// Build from an inbound axum request.
    ///
    /// The id comes from `SetRequestIdLayer` when it ran, otherwise a new UUID
    /// is assigned. The body is buffered up to `body_limit` bytes.
    pub async fn from_http(req: Request<Body>, body_limit: usize) -> Result<Self, GatewayError> {
        let (parts, body) = req.into_parts();

        let id = parts
            .extensions
            .get::<IngressRequestId>()
            .and_then(|id| id.header_value().to_str().ok())
            .map(RequestId::from)
            .unwrap_or_else(RequestId::generate);

        let body = to_bytes(body, body_limit).await.map_err(|err| {
            tracing::warn!(request_id = %id, error = %err, "failed to buffer request body");
            GatewayError::InvalidRequestBody
        })?;

        Ok(Self {
            id,
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        })
    }

    /// A copy of this request with its header view replaced.
    ///
    /// Every other field, including the body buffer, is shared with `self`.
    pub fn with_headers(&self, headers: HeaderMap) -> Self {
        Self {
            id: self.id.clone(),
            method: self.method.clone(),
            uri: self.uri.clone(),
            headers,
            body: self.body.clone(),
        }
    }

    pub fn id(&self) -> &RequestId {
        &self.id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}
