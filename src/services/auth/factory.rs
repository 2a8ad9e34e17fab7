/// Factory: build `TokenValidator` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::ConfigError;
use crate::services::auth::TokenValidator;

pub fn build_token_validator(config: &Config) -> Result<Arc<TokenValidator>, ConfigError> {
    let validator = TokenValidator::new(&config.token_secret, config.token_secret_encoding)
        .map_err(|err| {
            tracing::warn!(error = %err, "failed to build token validator");
            ConfigError::Invalid("TOKEN_SECRET")
        })?;

    Ok(Arc::new(validator))
}
