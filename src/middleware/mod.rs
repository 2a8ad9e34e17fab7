/*
 * Responsibility
 * - middleware の公開インターフェース
 * - tower/axum layer (transport 層) のみ。gateway の filter chain は crate::filter
 */
pub mod http;
