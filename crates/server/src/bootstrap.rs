use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{info, warn};

use warung_core::config::AppConfig;
use warung_db::repositories::{
    SqlCustomerRepository, SqlOrderRepository, SqlProductRepository, UnavailableStore,
};
use warung_db::{connect_from, migrations, DbPool};
use warung_telegram::api::{BotApi, NoopBotApi, TelegramBotApi};
use warung_telegram::commands::CommandRouter;

use crate::storefront::Storefront;
use crate::{health, webhook};

pub struct Application {
    pub config: AppConfig,
    pub router: Router,
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Wires the application. Missing bot token and unreachable database degrade
/// with a warning instead of failing startup: `/health` must answer and the
/// webhook must keep acknowledging regardless of backend state.
pub async fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let storefront = match connect_and_migrate(&config).await {
        Ok(pool) => {
            info!(
                event_name = "system.bootstrap.database_ready",
                url = %config.database.url,
                "database connected and migrations applied"
            );
            Storefront::new(
                Arc::new(SqlProductRepository::new(pool.clone())),
                Arc::new(SqlCustomerRepository::new(pool.clone())),
                Arc::new(SqlOrderRepository::new(pool)),
            )
        }
        Err(error) => {
            warn!(
                event_name = "system.bootstrap.database_unavailable",
                url = %config.database.url,
                error = %error,
                "database unreachable; serving degraded replies"
            );
            let store = Arc::new(UnavailableStore);
            Storefront::new(store.clone(), store.clone(), store)
        }
    };

    let bot = build_bot_api(&config);

    if config.telegram.webhook_secret.is_none() {
        warn!(
            event_name = "system.bootstrap.webhook_permissive",
            "no webhook secret configured; accepting all webhook callers"
        );
    }

    let state = webhook::WebhookState::new(
        CommandRouter::new(storefront),
        bot,
        config.telegram.webhook_secret.clone(),
    );
    let router = webhook::router(state).merge(health::router());

    Application { config, router }
}

async fn connect_and_migrate(config: &AppConfig) -> Result<DbPool, DbInitError> {
    let pool = connect_from(&config.database).await.map_err(DbInitError::Connect)?;
    migrations::run_pending(&pool).await.map_err(DbInitError::Migrate)?;
    Ok(pool)
}

fn build_bot_api(config: &AppConfig) -> Arc<dyn BotApi> {
    if config.telegram.bot_token.expose_secret().is_empty() {
        warn!(
            event_name = "system.bootstrap.bot_token_missing",
            "bot token missing; outbound replies disabled"
        );
        return Arc::new(NoopBotApi);
    }

    match TelegramBotApi::new(
        config.telegram.bot_token.clone(),
        config.telegram.api_base_url.clone(),
        Duration::from_secs(config.telegram.send_timeout_secs),
    ) {
        Ok(api) => Arc::new(api),
        Err(error) => {
            warn!(
                event_name = "system.bootstrap.bot_client_failed",
                error = %error,
                "bot api client construction failed; outbound replies disabled"
            );
            Arc::new(NoopBotApi)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    use warung_core::config::{AppConfig, ConfigOverrides, LoadOptions};

    use super::bootstrap_with_config;

    fn config_with_database(url: &str) -> AppConfig {
        AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(url.to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("config loads")
    }

    #[tokio::test]
    async fn bootstrap_serves_health_with_a_working_database() {
        let app = bootstrap_with_config(config_with_database("sqlite::memory:")).await;

        let response = app
            .router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn bootstrap_survives_an_unreachable_database() {
        // Read-only mode against a file that does not exist cannot connect.
        let app = bootstrap_with_config(config_with_database(
            "sqlite:///nonexistent-warung-dir/warung.db?mode=ro",
        ))
        .await;

        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        // The webhook still acknowledges; the reply path degrades internally.
        let body = r#"{"message":{"chat":{"id":42},"from":{"id":555},"text":"/katalog"}}"#;
        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
