//! Observability filter.
//!
//! Logs a fixed base message on every request, then optionally the request id
//! before dispatch and the response status after it. Never alters the request
//! or response and never rejects.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::filter::{FilterResult, GatewayFilter, GatewayRequest, Next};

/// Settings for [`LoggingFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub base_message: String,
    pub pre_logger: bool,
    pub post_logger: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            base_message: "Gateway global filter".to_string(),
            pre_logger: true,
            post_logger: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoggingFilter {
    config: LoggingConfig,
}

impl LoggingFilter {
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl GatewayFilter for LoggingFilter {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn filter(&self, req: GatewayRequest, next: Next<'_>) -> FilterResult {
        let request_id = req.id().clone();

        info!("global filter baseMessage: {}", self.config.base_message);
        if self.config.pre_logger {
            info!(request_id = %request_id, "global filter start");
        }

        let result = next.run(req).await;

        if self.config.post_logger {
            match &result {
                Ok(resp) => {
                    info!(request_id = %request_id, status = resp.status().as_u16(), "global filter end");
                }
                Err(err) => {
                    warn!(
                        request_id = %request_id,
                        status = err.status().as_u16(),
                        error = %err,
                        "global filter end"
                    );
                }
            }
        }

        result
    }
}
