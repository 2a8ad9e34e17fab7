/*
 * Responsibility
 * - Gateway-wide error types (auth rejection / downstream failure / config)
 * - IntoResponse implementations (HTTP status + minimal JSON error body)
 * - Diagnostic detail stays in the log; clients only see code + short message
 */
use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

fn error_response(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        error: ErrorBody {
            code,
            message: message.into(),
        },
    };

    (status, Json(body)).into_response()
}

/// Rejections produced by the bearer-auth stage.
///
/// Both kinds terminate the request with 401 and never travel past the stage
/// that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no authorization header")]
    MissingAuthorizationHeader,
    #[error("token is not valid")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string())
    }
}

/// Failures that unwind through the filter chain and are turned into a
/// response at the ingress boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("downstream request failed: {0}")]
    DownstreamFailure(String),
    #[error("downstream request timed out")]
    DownstreamTimeout,
    #[error("failed to read request body")]
    InvalidRequestBody,
    #[error("internal server error")]
    Internal,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::DownstreamFailure(_) => StatusCode::BAD_GATEWAY,
            GatewayError::DownstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::InvalidRequestBody => StatusCode::BAD_REQUEST,
            GatewayError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        // The downstream detail is not part of the public message.
        let (code, message) = match &self {
            GatewayError::DownstreamFailure(_) => ("BAD_GATEWAY", "bad gateway"),
            GatewayError::DownstreamTimeout => ("GATEWAY_TIMEOUT", "gateway timeout"),
            GatewayError::InvalidRequestBody => ("BAD_REQUEST", "invalid request body"),
            GatewayError::Internal => ("INTERNAL", "internal server error"),
        };

        error_response(self.status(), code, message)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}
