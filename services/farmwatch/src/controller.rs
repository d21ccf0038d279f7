//! Dashboard controller: keeps sensor state in sync with the realtime store

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::sensor::SensorKey;
use crate::state::StateHandle;
use crate::store::{RealtimeStore, StoreEvent};

const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Opens one subscription per sensor and funnels every update into the state
pub struct DashboardController {
    store: Arc<dyn RealtimeStore>,
    state: StateHandle,
    reconnect_delay: Duration,
    cancel: CancellationToken,
}

impl DashboardController {
    pub fn new(
        store: Arc<dyn RealtimeStore>,
        state: StateHandle,
        reconnect_delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            store,
            state,
            reconnect_delay,
            cancel,
        }
    }

    /// Subscribe to every sensor and apply updates. Returns when the
    /// cancellation token is triggered and all subscriptions are closed.
    pub async fn run(&self) {
        let (tx, mut rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);

        let mut handles = Vec::new();
        for key in SensorKey::ALL {
            let store = Arc::clone(&self.store);
            let tx = tx.clone();
            let cancel = self.cancel.clone();
            let delay = self.reconnect_delay;

            handles.push(tokio::spawn(async move {
                subscription_loop(store, key.path(), tx, delay, cancel).await;
            }));
        }
        drop(tx);
        tracing::info!("Opened {} sensor subscriptions", handles.len());

        // Single writer: updates are applied one at a time in arrival order
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                event = rx.recv() => match event {
                    Some(event) => apply_event(&self.state, event).await,
                    None => break,
                },
            }
        }

        // Unblock any subscription waiting on a full channel
        drop(rx);
        for handle in handles {
            let _ = handle.await;
        }
        tracing::info!("Sensor subscriptions closed");
    }
}

async fn subscription_loop(
    store: Arc<dyn RealtimeStore>,
    path: String,
    events: mpsc::Sender<StoreEvent>,
    reconnect_delay: Duration,
    cancel: CancellationToken,
) {
    loop {
        match store.watch(&path, events.clone(), cancel.clone()).await {
            Ok(()) if cancel.is_cancelled() || events.is_closed() => break,
            Ok(()) => tracing::warn!(
                "Subscription to {} ended, reconnecting in {:?}",
                path,
                reconnect_delay
            ),
            Err(e) => tracing::warn!(
                "Subscription to {} failed: {}. Reconnecting in {:?}",
                path,
                e,
                reconnect_delay
            ),
        }

        tokio::select! {
            _ = tokio::time::sleep(reconnect_delay) => {}
            _ = cancel.cancelled() => break,
        }
    }
    tracing::debug!("Subscription loop for {} stopped", path);
}

/// Apply a single store event to the shared state
pub async fn apply_event(state: &StateHandle, event: StoreEvent) {
    let Some(key) = SensorKey::from_path(&event.path) else {
        tracing::debug!("Ignoring update for unknown path {}", event.path);
        return;
    };

    let now_ms = current_epoch_ms();
    let outcome = state
        .write()
        .await
        .apply_update(key, event.value.as_ref(), now_ms);

    tracing::debug!(
        "Update {} = {:?} (changed={}, forecast_recomputed={})",
        key,
        event.value,
        outcome.changed,
        outcome.forecast_recomputed
    );
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
