use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod i18n;
mod routes;
mod services;

use config::Config;
use services::{
    init,
    notifications::{NotificationDispatcher, PushGateway},
    profiles::SqliteProfileStore,
};

pub struct AppState {
    pub config: Config,
    pub dispatcher: NotificationDispatcher,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "debt_notifications=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to bind SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received; draining in-flight triggers");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    init_tracing(config.logging.json);

    tracing::info!("Starting Debt Notifications Service");

    // Profile store
    let pool = init::init_db(&config).await?;

    // Push service (optional; sends fail until it is configured)
    let push = Arc::new(RwLock::new(None));
    init::initialize_push_service(&config.fcm, &push).await;

    let dispatcher = NotificationDispatcher::new(
        Arc::new(SqliteProfileStore::new(pool.clone())),
        Arc::new(PushGateway::new(push)),
    );

    let app_state = Arc::new(AppState {
        config: config.clone(),
        dispatcher,
    });

    let app = routes::app(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Give the pool a bounded amount of time to close its connections.
    let close_wait = Duration::from_secs(5);
    if tokio::time::timeout(close_wait, pool.close()).await.is_err() {
        tracing::warn!(
            "Database pool did not close within {}s",
            close_wait.as_secs()
        );
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
