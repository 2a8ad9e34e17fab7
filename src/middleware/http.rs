//! Tower layers wrapped around the gateway router.
//!
//! The filter chain keys every log line on the request id assigned here, so
//! the id must be gateway-owned: an inbound `x-request-id` is discarded and a
//! fresh UUID always takes its place. The same id is echoed on the response.
//!
//! The timeout bounds the whole exchange as seen by the client. When it fires
//! the client gets a 504 while the chain finishes unwinding in its own task.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::{Request, StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

// Client-supplied ids are not unique; `SetRequestIdLayer` only generates one
// when the header is absent.
fn discard_inbound_request_id(mut req: Request<Body>) -> Request<Body> {
    if let Some(value) = req.headers_mut().remove(REQUEST_ID_HEADER) {
        debug!(client_request_id = ?value, "discarding client-supplied request id");
    }
    req
}

pub fn apply(router: Router, timeout: Duration, body_limit_bytes: usize) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .map_request(discard_inbound_request_id)
        // Timeout and body-limit failures become plain status codes.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                StatusCode::GATEWAY_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        // Ingress buffers the body, so the limit is enforced before any stage runs.
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}
