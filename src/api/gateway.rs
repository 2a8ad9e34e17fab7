/*
 * Responsibility
 * - Router fallback: health 以外の全リクエストを filter chain に流す
 * - axum Request → GatewayRequest への変換 (request id / body の確定)
 * - GatewayError → status + 最小限の message (詳細はログのみ)
 */
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::error::GatewayError;
use crate::filter::GatewayRequest;
use crate::state::AppState;

pub async fn proxy(State(state): State<AppState>, req: Request<Body>) -> Response {
    let req = match GatewayRequest::from_http(req, state.request_body_limit_bytes).await {
        Ok(req) => req,
        Err(err) => return err.into_response(),
    };
    let request_id = req.id().clone();
    let chain = Arc::clone(&state.chain);

    // Detached from the connection: if the client goes away or the timeout
    // layer fires, entered filters still run their post-phase.
    let outcome = tokio::spawn(async move { chain.handle(req).await }).await;

    match outcome {
        Ok(Ok(resp)) => resp,
        Ok(Err(err)) => {
            error!(request_id = %request_id, error = %err, "gateway request failed");
            err.into_response()
        }
        Err(join_err) => {
            error!(request_id = %request_id, error = %join_err, "filter chain task aborted");
            GatewayError::Internal.into_response()
        }
    }
}
