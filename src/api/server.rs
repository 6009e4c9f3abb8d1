//! API Server
//!
//! Wires the store, the router and the middleware stack, then serves until
//! Ctrl+C or SIGTERM.

use super::{
    handlers::AppState,
    middleware::{create_cors_layer, request_id_middleware},
    routes::create_router,
};
use crate::common::CasinoStore;
use crate::config::ServerConfig;
use crate::db::PgStore;
use crate::errors::{CasinoResult, StoreError};
use std::sync::Arc;
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};

/// Build the full application: routes plus middleware
pub fn build_app(state: Arc<AppState>, config: &ServerConfig) -> axum::Router {
    create_router(state, config.static_dir.as_deref())
        // Request ID middleware (first for tracing)
        .layer(axum::middleware::from_fn(request_id_middleware))
        // CORS layer (before timeout to handle preflight)
        .layer(create_cors_layer(&config.allowed_origins))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
}

/// HTTP server for the casino API and the static client
pub struct ApiServer {
    config: ServerConfig,
}

impl ApiServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Connect the store (if configured) and serve until shutdown
    pub async fn run(self) -> CasinoResult<()> {
        self.config.validate()?;

        let store = self.connect_store().await?;
        let state = Arc::new(AppState::new(store));
        let app = build_app(state, &self.config);
        let addr = self.config.socket_addr()?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Highroller API listening on http://{}", addr);
        self.log_server_info();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }

    async fn connect_store(&self) -> CasinoResult<Option<Arc<dyn CasinoStore>>> {
        let Some(url) = self.config.database_url.clone() else {
            warn!("DATABASE_URL is not set; data endpoints will answer 500");
            return Ok(None);
        };

        let pool_size = self.config.database_pool_size;
        let run_migrations = self.config.run_migrations;

        // r2d2 blocks while filling the pool
        let store = tokio::task::spawn_blocking(move || {
            let store = PgStore::connect(&url, pool_size)?;
            if run_migrations {
                store.run_migrations()?;
            }
            Ok::<_, StoreError>(store)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))??;

        info!("Connected to PostgreSQL (pool size {})", pool_size);
        Ok(Some(Arc::new(store)))
    }

    fn log_server_info(&self) {
        info!("Server configuration:");
        info!("   CORS: {:?}", self.config.allowed_origins);
        info!("   Request timeout: {}s", self.config.request_timeout_secs);
        match &self.config.static_dir {
            Some(dir) => info!("   Static files: {}", dir.display()),
            None => info!("   Static files: disabled"),
        }
        info!("Available endpoints:");
        info!("   GET   /health");
        info!("   POST  /api/auth/register");
        info!("   POST  /api/auth/login");
        info!("   GET   /api/users/:id");
        info!("   PATCH /api/users/:id");
        info!("   GET   /api/game-state/:userId");
        info!("   PUT   /api/game-state/:userId");
        info!("   GET   /api/leaderboards");
        info!("   GET   /api/achievements");
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
