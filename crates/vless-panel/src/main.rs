//! VLESS panel - Entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use systemctl_client::SystemctlClient;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vless_panel::{
    api::{create_router, AppState},
    config::Config,
    registry::{LinkSettings, Registry, Store, UserService},
    xray::ConfigWriter,
};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting VLESS panel");

    // Initialize registry storage
    let store = if config.registry.persist {
        info!(path = ?config.registry.path, "Using file-backed registry");
        Store::file(config.registry.path.clone())
    } else {
        info!("Persistence disabled, registry is in-memory only");
        Store::memory()
    };

    // Load existing registry
    let registry = match store.load().await {
        Ok(r) => {
            info!("Loaded registry with {} users", r.count());
            r
        }
        Err(e) => {
            error!("Failed to load registry: {}", e);
            info!("Starting with empty registry");
            Registry::new()
        }
    };

    let link = LinkSettings {
        host: config.xray.host.clone(),
        port: config.xray.port,
        protocol: config.xray.protocol.clone(),
    };

    let users = UserService::new(
        registry,
        ConfigWriter::new(config.xray.config_path.clone()),
        Arc::new(SystemctlClient::new(config.xray.service_name.clone())),
        store,
        link.clone(),
    );

    // Create application state and router
    let state = AppState::new(users, link);
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse()
            .unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
