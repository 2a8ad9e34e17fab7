//! reqwest-based backend: forwards the (possibly mutated) request to the
//! configured upstream and buffers its response.
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, Uri},
    response::Response,
};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::error::GatewayError;
use crate::filter::GatewayRequest;
use crate::services::backend::Backend;

// Connection-scoped headers are not relayed by a proxy; `host` and
// `content-length` are recomputed by the client.
fn relayable(name: &HeaderName) -> bool {
    !matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "host"
            | "content-length"
    )
}

fn relay_headers(from: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(from.len());
    for (name, value) in from {
        if relayable(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    /// `{base_url}{path}?{query}`, keeping any path prefix of the base URL.
    pub fn target_url(&self, uri: &Uri) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        format!("{}{}", base, path_and_query)
    }
}

fn downstream_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::DownstreamTimeout
    } else {
        GatewayError::DownstreamFailure(err.to_string())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn forward(&self, req: GatewayRequest) -> Result<Response, GatewayError> {
        let url = self.target_url(req.uri());
        debug!(request_id = %req.id(), url = %url, "forwarding to backend");

        let upstream = self
            .client
            .request(req.method().clone(), url.as_str())
            .headers(relay_headers(req.headers()))
            .body(req.body().clone())
            .send()
            .await
            .map_err(|err| {
                warn!(request_id = %req.id(), error = %err, "backend request failed");
                downstream_error(err)
            })?;

        let status = upstream.status();
        let headers = relay_headers(upstream.headers());

        // Buffer fully so a failure mid-body never leaves a half-written response.
        let body = upstream.bytes().await.map_err(|err| {
            warn!(request_id = %req.id(), error = %err, "failed to read backend response");
            downstream_error(err)
        })?;

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
