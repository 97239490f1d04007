//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;

use std::net::SocketAddr;

use auth::{AuthAppState, InMemoryUserRepository, PgUserRepository};
use shop::{FsImageStore, InMemoryShopRepository, PgShopRepository, ShopAppState};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::build_app;
use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,shop=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let images = FsImageStore::new(&config.upload_dir);
    images.ensure_root().await?;

    let app = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            build_app(
                AuthAppState::new(PgUserRepository::new(pool.clone()), config.auth.clone())?,
                ShopAppState::new(PgShopRepository::new(pool), images, config.shop.clone()),
                &config.upload_dir,
                &config.frontend_origins,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory storage, data is lost on exit");

            build_app(
                AuthAppState::new(InMemoryUserRepository::new(), config.auth.clone())?,
                ShopAppState::new(InMemoryShopRepository::new(), images, config.shop.clone()),
                &config.upload_dir,
                &config.frontend_origins,
            )
        }
    };

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
