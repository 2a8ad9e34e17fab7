//! Request-authorization and filter-chain layer of an API gateway.
//!
//! Every inbound request (except `/healthcheck`) runs through an ordered
//! [`filter::FilterChain`] before it is forwarded to the backend collaborator.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod filter;
pub mod middleware;
pub mod services;
pub mod state;
