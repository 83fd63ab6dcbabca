//! HTTP backend
//!
//! Thin JSON API for the mobile app: catalog proxy, accounts, pantry
//! submissions, favorites, speech upload, plus the matcher-backed menu.

mod error;
pub mod routes;

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::accounts::AccountService;
use crate::catalog::{self, MealDbClient, RecipeCatalog};
use crate::config::Config;
use crate::error::LarderResult;
use crate::favorites::FavoritesStore;
use crate::matching::IngredientMatcher;
use crate::pantry::SubmissionStore;
use crate::recipe::Recipe;
use crate::speech::{CloudSpeechClient, SpeechTranscriber};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<dyn RecipeCatalog>,
    pub speech: Arc<dyn SpeechTranscriber>,
    pub accounts: AccountService,
    pub submissions: SubmissionStore,
    pub favorites: FavoritesStore,
    pub matcher: IngredientMatcher,
    /// Full catalog, loaded on first use; `None` until fetched
    recipes: RwLock<Option<Vec<Recipe>>>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn RecipeCatalog>,
        speech: Arc<dyn SpeechTranscriber>,
    ) -> LarderResult<Self> {
        let db_path = PathBuf::from(&config.db_path);
        Ok(Self {
            accounts: AccountService::new(db_path.clone())?,
            submissions: SubmissionStore::new(db_path.clone())?,
            favorites: FavoritesStore::new(db_path)?,
            matcher: IngredientMatcher::new(config.match_threshold),
            config,
            catalog,
            speech,
            recipes: RwLock::new(None),
        })
    }

    /// Whole catalog in letter order, fetched once.
    ///
    /// An empty result is cached too; `invalidate_recipes` forces a refetch.
    pub async fn all_recipes(&self) -> Vec<Recipe> {
        if let Some(cached) = self.recipes.read().await.as_ref() {
            return cached.clone();
        }

        let mut cached = self.recipes.write().await;
        // Another request may have filled it while we waited for the write lock
        if let Some(recipes) = cached.as_ref() {
            return recipes.clone();
        }

        let fetched = catalog::fetch_all(self.catalog.as_ref()).await;
        info!("📚 Loaded {} recipes from the catalog", fetched.len());
        *cached = Some(fetched.clone());
        fetched
    }

    /// Drop the cached catalog so the next view refetches it
    pub async fn invalidate_recipes(&self) {
        *self.recipes.write().await = None;
    }
}

/// Build the router; split out so tests can drive it without a socket
pub fn router(state: Arc<AppState>) -> Router {
    let max_upload = state.config.max_upload_bytes;

    routes::routes()
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn run(config: Config) -> Result<()> {
    let catalog: Arc<dyn RecipeCatalog> = Arc::new(MealDbClient::new(&config)?);
    let speech: Arc<dyn SpeechTranscriber> = Arc::new(CloudSpeechClient::new(&config)?);
    let address = format!("{}:{}", config.server_host, config.server_port);

    info!("Initializing state...");
    let state = Arc::new(AppState::new(config, catalog, speech)?);
    let app = router(state);

    let listener = TcpListener::bind(&address).await?;
    info!("🚀 Server running on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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
}
