/*
 * Responsibility
 * - 環境変数や設定の読み込み (TOKEN_SECRET, BACKEND_URL, filter 構成など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動後は read-only (全リクエストで共有)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;
use crate::filter::{FilterKind, LoggingConfig};
use crate::services::auth::SecretEncoding;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Shared HMAC secret for bearer tokens
    pub token_secret: String,
    pub token_secret_encoding: SecretEncoding,

    pub backend_url: Url,
    pub backend_timeout: Duration,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,

    // Stage order, fixed for the lifetime of the process
    pub filters: Vec<FilterKind>,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 8000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let token_secret =
            std::env::var("TOKEN_SECRET").map_err(|_| ConfigError::Missing("TOKEN_SECRET"))?;
        if token_secret.is_empty() {
            return Err(ConfigError::Invalid("TOKEN_SECRET"));
        }

        let token_secret_encoding = if env_bool("TOKEN_SECRET_BASE64", false)? {
            SecretEncoding::Base64
        } else {
            SecretEncoding::Raw
        };

        let backend_url = parse_backend_url(
            &std::env::var("BACKEND_URL").map_err(|_| ConfigError::Missing("BACKEND_URL"))?,
        )?;

        let backend_timeout = Duration::from_secs(env_u64("BACKEND_TIMEOUT_SECONDS", 30)?);
        let request_timeout = Duration::from_secs(env_u64("REQUEST_TIMEOUT_SECONDS", 60)?);

        let request_body_limit_bytes = match std::env::var("REQUEST_BODY_LIMIT_BYTES") {
            Ok(v) => v
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))?,
            Err(_) => 1024 * 1024,
        };

        let filters = match std::env::var("GATEWAY_FILTERS") {
            Ok(v) => parse_filters(&v)?,
            Err(_) => FilterKind::DEFAULT_ORDER.to_vec(),
        };

        let defaults = LoggingConfig::default();
        let logging = LoggingConfig {
            base_message: std::env::var("LOGGING_BASE_MESSAGE").unwrap_or(defaults.base_message),
            pre_logger: env_bool("LOGGING_PRE_LOGGER", defaults.pre_logger)?,
            post_logger: env_bool("LOGGING_POST_LOGGER", defaults.post_logger)?,
        };

        Ok(Self {
            addr,
            app_env,
            token_secret,
            token_secret_encoding,
            backend_url,
            backend_timeout,
            request_timeout,
            request_body_limit_bytes,
            filters,
            logging,
        })
    }
}

fn env_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

fn env_bool(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(key) {
        Ok(v) => parse_bool(&v).ok_or(ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Comma-separated stage names, in chain order. Empty entries are skipped.
pub fn parse_filters(value: &str) -> Result<Vec<FilterKind>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<FilterKind>().map_err(|err| {
                tracing::warn!(error = %err, "unknown entry in GATEWAY_FILTERS");
                ConfigError::Invalid("GATEWAY_FILTERS")
            })
        })
        .collect()
}

pub fn parse_backend_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|_| ConfigError::Invalid("BACKEND_URL"))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ConfigError::Invalid("BACKEND_URL")),
    }
}
