//! SmartPark server
//!
//! Parking lot occupancy and billing over REST.
//! Reads configuration from TOML file (~/.config/smartpark/config.toml).

use std::sync::Arc;

use tracing::{error, info};

use smartpark::api::{create_api_router, ApiState};
use smartpark::application::{
    BillingService, IdentityService, InventoryService, OccupancyService, ReportService,
};
use smartpark::auth::JwtConfig;
use smartpark::config::{default_config_path, AppConfig};
use smartpark::infrastructure::{JsonStore, MemoryStore, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("SMARTPARK_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting SmartPark...");

    // ── Storage ────────────────────────────────────────────────
    let store: Arc<dyn Store> = if config.storage.ephemeral {
        info!("Using in-memory storage, nothing will be persisted");
        Arc::new(MemoryStore::new())
    } else {
        let data_dir = config.storage.data_dir.clone();
        info!("Data directory: {}", data_dir.display());
        Arc::new(JsonStore::open(&data_dir).await?)
    };

    // ── Services ───────────────────────────────────────────────
    let identity = Arc::new(IdentityService::new(store.clone()));
    identity.seed_admin(&config.admin).await?;

    let occupancy = Arc::new(OccupancyService::new(store.clone()));
    let billing = Arc::new(BillingService::new(
        store.clone(),
        occupancy.clone(),
        config.billing.clone(),
    ));
    let inventory = Arc::new(InventoryService::new(store.clone()));
    let reports = Arc::new(ReportService::new(store.clone()));

    let jwt_config = JwtConfig::from_security(&config.security);
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    let state = ApiState {
        store,
        occupancy,
        billing,
        inventory,
        identity,
        reports,
        jwt_config,
    };

    // ── HTTP server ────────────────────────────────────────────
    let router = create_api_router(state);
    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    info!("SmartPark shutdown complete");
    Ok(())
}
