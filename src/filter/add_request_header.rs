//! Header-mutation filter.
//!
//! Forwards a copy of the request carrying one extra header; the caller's
//! request value is never modified. It logs the request id before dispatch,
//! then the id and the response status once the downstream result is back.

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use tracing::{info, warn};

use crate::filter::{FilterResult, GatewayFilter, GatewayRequest, Next};

pub const DEFAULT_HEADER_NAME: &str = "first-request";
pub const DEFAULT_HEADER_VALUE: &str = "first-request-header-value";

#[derive(Debug, Clone)]
pub struct AddRequestHeaderFilter {
    name: HeaderName,
    value: HeaderValue,
}

impl AddRequestHeaderFilter {
    pub fn new(name: HeaderName, value: HeaderValue) -> Self {
        Self { name, value }
    }

    /// The request handed to the next stage.
    pub fn mutate(&self, req: &GatewayRequest) -> GatewayRequest {
        let mut headers = req.headers().clone();
        headers.append(self.name.clone(), self.value.clone());
        req.with_headers(headers)
    }
}

impl Default for AddRequestHeaderFilter {
    fn default() -> Self {
        Self::new(
            HeaderName::from_static(DEFAULT_HEADER_NAME),
            HeaderValue::from_static(DEFAULT_HEADER_VALUE),
        )
    }
}

#[async_trait]
impl GatewayFilter for AddRequestHeaderFilter {
    fn name(&self) -> &'static str {
        "add-request-header"
    }

    async fn filter(&self, req: GatewayRequest, next: Next<'_>) -> FilterResult {
        let mutated = self.mutate(&req);
        let request_id = mutated.id().clone();
        info!(request_id = %request_id, uri = %mutated.uri(), "custom pre filter: request uri");

        let result = next.run(mutated).await;

        info!(request_id = %request_id, "custom post filter: request id");
        match &result {
            Ok(resp) => info!(
                request_id = %request_id,
                status = resp.status().as_u16(),
                "custom post filter: response code"
            ),
            Err(err) => warn!(
                request_id = %request_id,
                status = err.status().as_u16(),
                error = %err,
                "custom post filter: response code"
            ),
        }

        result
    }
}
