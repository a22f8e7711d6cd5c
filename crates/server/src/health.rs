use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

/// Liveness only. The body is `ok` whether or not the database or the bot
/// API are reachable, so the chat platform keeps delivering webhooks during
/// backend incidents.
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
