//! Terminal forward: the backend collaborator the filter chain dispatches to.
use async_trait::async_trait;
use axum::response::Response;

use crate::error::GatewayError;
use crate::filter::GatewayRequest;

pub mod http;

pub use http::HttpBackend;

/// Backend collaborator invoked once every filter has run its pre-phase.
///
/// Implementations must return a fully materialised response or an error;
/// timeouts surface as `GatewayError::DownstreamTimeout`.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    async fn forward(&self, req: GatewayRequest) -> Result<Response, GatewayError>;
}
