/// Factory: build the `FilterChain` from application `Config`.
use std::{fmt, str::FromStr, sync::Arc};

use crate::config::Config;
use crate::filter::{
    AddRequestHeaderFilter, BearerAuthFilter, FilterChain, GatewayFilter, LoggingFilter,
};
use crate::services::{auth::TokenValidator, backend::Backend};

/// Stages that can be named in `GATEWAY_FILTERS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Logging,
    BearerAuth,
    AddRequestHeader,
}

impl FilterKind {
    pub const DEFAULT_ORDER: [FilterKind; 3] = [
        FilterKind::Logging,
        FilterKind::BearerAuth,
        FilterKind::AddRequestHeader,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Logging => "logging",
            FilterKind::BearerAuth => "bearer-auth",
            FilterKind::AddRequestHeader => "add-request-header",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for FilterKind {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "logging" => Ok(FilterKind::Logging),
            "bearer-auth" => Ok(FilterKind::BearerAuth),
            "add-request-header" => Ok(FilterKind::AddRequestHeader),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

pub fn build_filter_chain(
    config: &Config,
    validator: Arc<TokenValidator>,
    backend: Arc<dyn Backend>,
) -> FilterChain {
    let filters = config
        .filters
        .iter()
        .map(|kind| -> Arc<dyn GatewayFilter> {
            match kind {
                FilterKind::Logging => Arc::new(LoggingFilter::new(config.logging.clone())),
                FilterKind::BearerAuth => Arc::new(BearerAuthFilter::new(validator.clone())),
                FilterKind::AddRequestHeader => Arc::new(AddRequestHeaderFilter::default()),
            }
        })
        .collect();

    let chain = FilterChain::new(filters, backend);
    tracing::info!(filters = ?chain.filter_names(), "filter chain built");
    chain
}
