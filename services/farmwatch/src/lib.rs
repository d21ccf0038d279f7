//! Farmwatch - Smart farm weather monitoring dashboard
//!
//! Subscribes to live sensor readings in a realtime database, derives a
//! naive seven-day forecast, and serves both on a web dashboard.

pub mod condition;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod firebase;
pub mod forecast;
pub mod sensor;
pub mod state;
pub mod store;

pub use config::{load_config, Config};
pub use error::{FarmwatchError, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::controller::DashboardController;
use crate::firebase::FirebaseStore;
use crate::store::RealtimeStore;

/// Run the farmwatch service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let store: Arc<dyn RealtimeStore> = Arc::new(FirebaseStore::new(&config.store));
    run_with_store(config, store).await
}

/// Run the service against any realtime store until ctrl-c
pub async fn run_with_store(config: Config, store: Arc<dyn RealtimeStore>) -> Result<()> {
    let cancel = CancellationToken::new();

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    serve(config, store, cancel).await
}

/// Run the controller and dashboard until `cancel` fires
pub async fn serve(
    config: Config,
    store: Arc<dyn RealtimeStore>,
    cancel: CancellationToken,
) -> Result<()> {
    let state = state::new_state_handle();

    let controller = DashboardController::new(
        store,
        Arc::clone(&state),
        Duration::from_secs(config.store.reconnect_delay_seconds),
        cancel.clone(),
    );

    // Start dashboard if enabled
    let dashboard_task = if config.dashboard.enabled {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.dashboard.port));
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind dashboard to {}: {}", addr, e);
            FarmwatchError::Dashboard(format!(
                "Failed to bind dashboard to port {}: {}",
                config.dashboard.port, e
            ))
        })?;
        tracing::info!("Dashboard listening on http://{}", addr);

        let router = dashboard::build_router(Arc::clone(&state), &config.dashboard);
        let cancel_for_dashboard = cancel.clone();
        Some(tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();
            tracing::debug!("Dashboard stopped");
        }))
    } else {
        tracing::info!("Dashboard disabled");
        None
    };

    tracing::info!("Farmwatch controller started");

    // Run the controller (blocks until cancelled)
    controller.run().await;

    if let Some(handle) = dashboard_task {
        let _ = handle.await;
    }
    tracing::info!("Farmwatch stopped");

    Ok(())
}
