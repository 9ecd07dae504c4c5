//! chat_economy - Chat-driven economy engine
//!
//! Receives chat command events over HTTP from the chat adapter, runs them
//! through the middleware chain and the economy handlers, and answers with
//! the reply to post back into the channel.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_economy::api::{self, AppState};
use chat_economy::identity::HelixDirectory;
use chat_economy::store::{JsonFileStore, LedgerStore};
use chat_economy::{Config, Dispatcher, EconomyHandler, Ledger, RouteSettings};

/// Initialize tracing/logging. Production emits one JSON object per line.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chat_economy=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Build the application router
fn build_router(state: AppState) -> Router {
    let api_router = api::create_router()
        .layer(middleware::from_fn(api::middleware::logging_middleware));

    Router::new()
        // Health check
        .route("/health", axum::routing::get(health_check))
        .nest("/api/v1", api_router)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(config.is_production());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(environment = %config.environment, "Starting chat_economy");
    tracing::info!(path = %config.storage_path.display(), "Opening ledger storage...");

    let store: Arc<dyn LedgerStore> = Arc::new(JsonFileStore::open(&config.storage_path).await?);
    let ledger = Arc::new(Ledger::new(store).with_autosave(config.autosave));
    tracing::info!(currency = %ledger.currency().await?, "Ledger ready");

    let directory = HelixDirectory::new(
        &config.twitch_client_id,
        &config.twitch_access_token,
        config.directory_timeout,
    )?;

    let handler = Arc::new(EconomyHandler::new(
        ledger.clone(),
        Arc::new(directory),
        &config.bot_username,
    ));
    let dispatcher = Dispatcher::with_economy_routes(
        config.command_prefix.clone(),
        handler,
        &RouteSettings {
            operators: config.operators.iter().cloned().collect(),
            cooldown: config.cooldown,
        },
    );

    let app = build_router(AppState::new(Arc::new(dispatcher)));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    tracing::info!("Server shutting down, flushing ledger...");
    ledger.save().await?;
    tracing::info!("Ledger saved. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
