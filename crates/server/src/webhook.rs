use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use tracing::{debug, info, warn};

use warung_telegram::api::BotApi;
use warung_telegram::commands::CommandRouter;
use warung_telegram::update::Update;

use crate::storefront::Storefront;

pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Clone)]
pub struct WebhookState {
    router: Arc<CommandRouter<Storefront>>,
    bot: Arc<dyn BotApi>,
    /// `None` is permissive mode: every caller is accepted. Chosen explicitly
    /// at bootstrap, with a startup warning.
    webhook_secret: Option<String>,
}

impl WebhookState {
    pub fn new(
        router: CommandRouter<Storefront>,
        bot: Arc<dyn BotApi>,
        webhook_secret: Option<String>,
    ) -> Self {
        Self { router: Arc::new(router), bot, webhook_secret }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.webhook_secret else {
            return true;
        };
        let provided =
            headers.get(SECRET_TOKEN_HEADER).and_then(|value| value.to_str().ok());
        provided.is_some_and(|token| token_matches(expected, token))
    }
}

// The shared token is not a cryptographic secret exchange, but there is no
// reason to hand out the obvious timing shortcut either.
fn token_matches(expected: &str, provided: &str) -> bool {
    if expected.len() != provided.len() {
        return false;
    }
    expected
        .bytes()
        .zip(provided.bytes())
        .fold(0u8, |acc, (left, right)| acc | (left ^ right))
        == 0
}

pub fn router(state: WebhookState) -> Router {
    Router::new().route("/webhook", post(webhook)).with_state(state)
}

/// The webhook always acknowledges receipt once the caller is authorized;
/// every downstream failure is swallowed into a best-effort reply so the
/// chat platform never retry-storms a transient error.
pub async fn webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, &'static str) {
    if !state.authorized(&headers) {
        warn!(event_name = "ingress.webhook.unauthorized", "webhook secret mismatch");
        return (StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    // Alien payload shapes deserialize to an empty update and fall into the
    // ignored branch below instead of erroring back to the platform.
    let update: Update = serde_json::from_str(&body).unwrap_or_default();
    let Some(message) = update.into_inbound() else {
        debug!(event_name = "ingress.webhook.ignored", "update lacks chat or sender id");
        return (StatusCode::OK, "ignored");
    };

    let chat_id = message.chat_id;
    let reply = state.router.route(&message).await;

    if let Err(error) = state.bot.send_message(chat_id, &reply).await {
        warn!(
            event_name = "ingress.webhook.reply_send_failed",
            chat_id,
            error = %error,
            "failed to deliver reply"
        );
    } else {
        info!(event_name = "ingress.webhook.reply_sent", chat_id, "reply delivered");
    }

    (StatusCode::OK, "ok")
}
