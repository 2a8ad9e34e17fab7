//! Ordered filter chain with onion (pre/post) semantics.
//!
//! ```text
//! request → F1 pre → F2 pre → … → Fn pre → backend.forward
//!                                                 ↓
//! response ← F1 post ← F2 post ← … ← Fn post ←────┘
//! ```
//!
//! Each filter receives a [`Next`] bound to the rest of the chain plus the
//! terminal forward call. A filter that returns without running `next`
//! short-circuits: later filters never see the request and the backend is not
//! called. Its own post-phase code never runs; filters before it unwind with
//! the response it returned.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use axum::response::Response;

use crate::error::GatewayError;
use crate::filter::GatewayRequest;
use crate::services::backend::Backend;

pub type FilterResult = Result<Response, GatewayError>;

/// One stage of request processing.
///
/// Implementations must be stateless per request: the same instance is shared
/// by every concurrent request task.
#[async_trait]
pub trait GatewayFilter: Send + Sync + 'static {
    // Stage name (for logging/debugging).
    fn name(&self) -> &'static str;

    async fn filter(&self, req: GatewayRequest, next: Next<'_>) -> FilterResult;
}

/// Continuation for the remaining filters and the terminal forward call.
///
/// `run` consumes `self`, so a filter can invoke the rest of the chain at most
/// once.
pub struct Next<'a> {
    filters: &'a [Arc<dyn GatewayFilter>],
    backend: &'a dyn Backend,
}

impl<'a> Next<'a> {
    pub async fn run(self, req: GatewayRequest) -> FilterResult {
        match self.filters.split_first() {
            Some((filter, rest)) => {
                let next = Next {
                    filters: rest,
                    backend: self.backend,
                };
                filter.filter(req, next).await
            }
            None => self.backend.forward(req).await,
        }
    }
}

/// Filters in registration order plus the backend collaborator.
///
/// Built once at startup and shared read-only; every request gets a fresh
/// traversal via [`FilterChain::handle`].
pub struct FilterChain {
    filters: Vec<Arc<dyn GatewayFilter>>,
    backend: Arc<dyn Backend>,
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.filter_names())
            .finish()
    }
}

impl FilterChain {
    pub fn new(filters: Vec<Arc<dyn GatewayFilter>>, backend: Arc<dyn Backend>) -> Self {
        Self { filters, backend }
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub async fn handle(&self, req: GatewayRequest) -> FilterResult {
        let next = Next {
            filters: &self.filters,
            backend: self.backend.as_ref(),
        };
        next.run(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::backend::testing::StubBackend;
    use axum::http::{HeaderMap, Method, StatusCode, Uri};
    use axum::response::IntoResponse;
    use bytes::Bytes;
    use std::sync::Mutex;

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Recording {
        name: &'static str,
        journal: Journal,
        reject: bool,
    }

    #[async_trait]
    impl GatewayFilter for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn filter(&self, req: GatewayRequest, next: Next<'_>) -> FilterResult {
            self.journal.lock().unwrap().push(format!("{} pre", self.name));
            if self.reject {
                return Ok(StatusCode::UNAUTHORIZED.into_response());
            }
            let result = next.run(req).await;
            let outcome = match &result {
                Ok(resp) => resp.status().as_u16().to_string(),
                Err(_) => "error".to_string(),
            };
            self.journal
                .lock()
                .unwrap()
                .push(format!("{} post {}", self.name, outcome));
            result
        }
    }

    fn recording(name: &'static str, journal: &Journal, reject: bool) -> Arc<dyn GatewayFilter> {
        Arc::new(Recording {
            name,
            journal: journal.clone(),
            reject,
        })
    }

    fn request() -> GatewayRequest {
        GatewayRequest::new(Method::GET, Uri::from_static("/"), HeaderMap::new(), Bytes::new())
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn pre_in_order_post_in_reverse() {
        let journal = Journal::default();
        let backend = Arc::new(StubBackend::ok("done"));
        let chain = FilterChain::new(
            vec![
                recording("a", &journal, false),
                recording("b", &journal, false),
                recording("c", &journal, false),
            ],
            backend.clone(),
        );

        let resp = chain.handle(request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(backend.calls(), 1);
        assert_eq!(
            entries(&journal),
            ["a pre", "b pre", "c pre", "c post 200", "b post 200", "a post 200"]
        );
    }

    #[tokio::test]
    async fn rejecting_filter_short_circuits() {
        let journal = Journal::default();
        let backend = Arc::new(StubBackend::ok("done"));
        let chain = FilterChain::new(
            vec![
                recording("a", &journal, false),
                recording("b", &journal, true),
                recording("c", &journal, false),
            ],
            backend.clone(),
        );

        let resp = chain.handle(request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(backend.calls(), 0);
        // "a" still unwinds because it did call next; "b" and "c" record no post.
        assert_eq!(entries(&journal), ["a pre", "b pre", "a post 401"]);
    }

    #[tokio::test]
    async fn downstream_failure_unwinds_every_entered_filter() {
        let journal = Journal::default();
        let backend = Arc::new(StubBackend::failing());
        let chain = FilterChain::new(
            vec![recording("a", &journal, false), recording("b", &journal, false)],
            backend.clone(),
        );

        let err = chain.handle(request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::DownstreamFailure(_)));
        assert_eq!(
            entries(&journal),
            ["a pre", "b pre", "b post error", "a post error"]
        );
    }

    #[tokio::test]
    async fn empty_chain_forwards_directly() {
        let backend = Arc::new(StubBackend::ok("direct"));
        let chain = FilterChain::new(Vec::new(), backend.clone());

        let resp = chain.handle(request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn chain_is_reusable_across_requests() {
        let journal = Journal::default();
        let backend = Arc::new(StubBackend::ok("done"));
        let chain = Arc::new(FilterChain::new(
            vec![recording("a", &journal, false)],
            backend.clone(),
        ));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let chain = chain.clone();
                tokio::spawn(async move { chain.handle(request()).await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap().status(), StatusCode::OK);
        }
        assert_eq!(backend.calls(), 8);
        assert_eq!(chain.filter_names(), ["a"]);
    }
}
