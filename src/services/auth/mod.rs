pub mod factory;
pub mod token;

pub use factory::build_token_validator;
pub use token::{SecretEncoding, TokenValidator, TokenValidity};
