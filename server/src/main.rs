use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use connectech_server::config::{Config, SecurityHeadersLayer, StorageBackend};
use connectech_server::payments::PagBankClient;
use connectech_server::routes::{create_routes, AppState};
use connectech_server::services::{EventService, SystemClock};
use connectech_server::storage::{EventRepository, InMemoryStore, PgStore, VolunteerRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,connectech_server=debug")),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let (events, volunteers): (Arc<dyn EventRepository>, Arc<dyn VolunteerRepository>) =
        match config.storage {
            StorageBackend::Postgres => {
                let store = PgStore::connect(&config.database_url, config.database_max_connections)
                    .await
                    .context("Failed to connect to database")?;
                tracing::info!("Successfully connected to database");

                sqlx::migrate!()
                    .run(store.pool())
                    .await
                    .context("Failed to run migrations")?;
                tracing::info!("Migrations run successfully");

                let store = Arc::new(store);
                (store.clone() as Arc<dyn EventRepository>, store as Arc<dyn VolunteerRepository>)
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage, data is lost on restart");
                let store = Arc::new(InMemoryStore::new());
                (store.clone() as Arc<dyn EventRepository>, store as Arc<dyn VolunteerRepository>)
            }
        };

    if config.payment.token.is_empty() {
        tracing::warn!("PAGBANK_TOKEN is not set, checkout requests will be rejected");
    }
    let gateway = Arc::new(PagBankClient::new(reqwest::Client::new(), &config.payment));

    let service = EventService::new(
        events,
        volunteers,
        gateway,
        config.payment.clone(),
        Arc::new(SystemClock),
    );

    let app = create_routes(
        AppState::new(service),
        &config.cors,
        SecurityHeadersLayer::new(config.production),
    );

    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .context("Failed to bind address")?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
