/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: chain: FilterChain (validator / backend を内包)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::filter::FilterChain;

#[derive(Clone, Debug)]
pub struct AppState {
    pub chain: Arc<FilterChain>,
    pub request_body_limit_bytes: usize,
}

impl AppState {
    pub fn new(chain: Arc<FilterChain>, request_body_limit_bytes: usize) -> Self {
        Self {
            chain,
            request_body_limit_bytes,
        }
    }
}
