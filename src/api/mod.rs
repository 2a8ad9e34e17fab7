/*
 * Responsibility
 * - HTTP handler の公開ポイント (health / gateway fallback)
 */
pub mod gateway;
pub mod health;
