use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vidshare_backend::{
    AppState,
    config::Config,
    image_host::{CloudinaryImageHost, ImageHost, LocalImageHost},
    repository::{MemoryStore, PgStore, UserRepository, VideoRepository},
    router,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidshare_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let (users, videos): (Arc<dyn UserRepository>, Arc<dyn VideoRepository>) =
        match &config.database_url {
            Some(url) => {
                let store = Arc::new(
                    PgStore::connect(url, config.max_connections)
                        .await
                        .context("connecting to database")?,
                );
                tracing::info!("Using PostgreSQL store");
                let users: Arc<dyn UserRepository> = store.clone();
                let videos: Arc<dyn VideoRepository> = store;
                (users, videos)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, data will only live in memory");
                let store = Arc::new(MemoryStore::new());
                let users: Arc<dyn UserRepository> = store.clone();
                let videos: Arc<dyn VideoRepository> = store;
                (users, videos)
            }
        };

    let images: Arc<dyn ImageHost> = match &config.cloudinary {
        Some(cloudinary) => {
            tracing::info!("Avatars are uploaded to Cloudinary");
            Arc::new(CloudinaryImageHost::new(cloudinary.clone()))
        }
        None => {
            tracing::info!("Avatars are stored under {}", config.upload_dir.display());
            Arc::new(LocalImageHost::new(config.upload_dir.clone(), "avatars"))
        }
    };
    let uploads_dir = config
        .cloudinary
        .is_none()
        .then(|| config.upload_dir.clone());

    let state = AppState {
        users,
        videos,
        images,
        auth_config: Arc::new(config.auth.clone()),
    };

    let app = router(state, uploads_dir);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;
    tracing::info!("Server running on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running API server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {err}");
    }
    tracing::info!("Shutting down");
}
