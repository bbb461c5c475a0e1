//! Referral Shop Gateway
//!
//! Single action endpoint in front of the shop's spreadsheet:
//! - Catalog, user, commission, and product-stat actions
//! - Cached table snapshots with single-flight refills
//! - Demo fixtures when the sheet is unreachable

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use api::{router, AdminConfig, AppState};
use gateway_core::aggregate::CommissionConfig;
use sheets_store::{
    fixtures::demo_store, health::check_connection, CacheConfig, FallbackStore, SheetsConfig,
    SheetsStore, TableCache, TableStore, Tables,
};
use telemetry::{health, init_tracing, TracingConfig};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Serve demo data for reads when the sheet cannot be reached
    #[serde(default = "default_use_fixtures")]
    use_fixtures_on_failure: bool,

    #[serde(default)]
    sheets: SheetsConfig,

    #[serde(default)]
    cache: CacheConfig,

    #[serde(default)]
    commission: CommissionConfig,

    #[serde(default)]
    admin: AdminConfig,

    #[serde(default)]
    logging: TracingConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_use_fixtures() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            use_fixtures_on_failure: default_use_fixtures(),
            sheets: SheetsConfig::default(),
            cache: CacheConfig::default(),
            commission: CommissionConfig::default(),
            admin: AdminConfig::default(),
            logging: TracingConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = load_config()?;

    init_tracing(&config.logging);

    info!("Starting Referral Gateway v{}", env!("CARGO_PKG_VERSION"));
    info!(
        spreadsheet = %config.sheets.spreadsheet_id,
        api_key = config.sheets.api_key.is_some(),
        access_token = config.sheets.access_token.is_some(),
        cache_ttl_secs = config.cache.ttl_secs,
        "Loaded store config"
    );
    if config.sheets.spreadsheet_id.is_empty() {
        warn!("No spreadsheet id configured; reads will fail");
    }

    let sheets: Arc<dyn TableStore> = Arc::new(
        SheetsStore::new(config.sheets.clone()).context("Failed to create Sheets client")?,
    );

    if config.sheets.timeout() >= config.cache.store_timeout() {
        warn!(
            http_timeout_secs = config.sheets.timeout_secs,
            store_timeout_ms = config.cache.store_timeout_ms,
            "Sheets HTTP timeout is not below the store bound"
        );
    }

    health().set_fixtures_enabled(config.use_fixtures_on_failure);
    let store: Arc<dyn TableStore> = if config.use_fixtures_on_failure {
        let limit = config.cache.fallback_read_limit(config.sheets.timeout());
        Arc::new(FallbackStore::new(sheets.clone(), demo_store(), true).with_read_limit(limit))
    } else {
        sheets.clone()
    };

    // Probe the sheet itself, not the fallback.
    if let Err(e) = check_connection(sheets.as_ref(), config.cache.store_timeout()).await {
        if config.use_fixtures_on_failure {
            warn!(error = %e, "Sheet unreachable; serving demo data for reads");
        } else {
            error!(error = %e, "Sheet unreachable");
        }
    }

    let cache = Arc::new(TableCache::new(store, &config.cache));
    let tables = Tables::new(cache);

    let state = AppState::new(tables)
        .with_commission(config.commission.clone())
        .with_admin(config.admin.clone());

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("REFERRAL")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Nested keys with underscores don't survive the `__` separator, so the
    // common secrets get flat names too.
    if let Ok(id) = std::env::var("REFERRAL_SHEETS_SPREADSHEET_ID") {
        config.sheets.spreadsheet_id = id;
    }
    if let Ok(key) = std::env::var("REFERRAL_SHEETS_API_KEY") {
        config.sheets.api_key = Some(key);
    }
    if let Ok(token) = std::env::var("REFERRAL_SHEETS_ACCESS_TOKEN") {
        config.sheets.access_token = Some(token);
    }
    if let Ok(password) = std::env::var("REFERRAL_ADMIN_PASSWORD") {
        config.admin.password = Some(password);
    }
    if let Ok(json) = std::env::var("LOG_JSON") {
        config.logging.json = json == "1" || json.eq_ignore_ascii_case("true");
    }
    if let Ok(ttl) = std::env::var("REFERRAL_CACHE_TTL_SECS") {
        config.cache.ttl_secs = ttl
            .parse()
            .context("REFERRAL_CACHE_TTL_SECS must be a number of seconds")?;
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
