//! Filter chain and the gateway's built-in stages.
//!
//! | Stage | Type | Phase |
//! |-------|------|-------|
//! | `logging` | [`LoggingFilter`] | pre + post |
//! | `bearer-auth` | [`BearerAuthFilter`] | pre (may reject) |
//! | `add-request-header` | [`AddRequestHeaderFilter`] | pre (mutates copy) + post |

mod add_request_header;
mod bearer_auth;
mod chain;
pub mod factory;
mod logging;
mod request;

pub use add_request_header::AddRequestHeaderFilter;
pub use bearer_auth::{BearerAuthFilter, strip_bearer};
pub use chain::{FilterChain, FilterResult, GatewayFilter, Next};
pub use factory::{FilterKind, build_filter_chain};
pub use logging::{LoggingConfig, LoggingFilter};
pub use request::{GatewayRequest, RequestId};
