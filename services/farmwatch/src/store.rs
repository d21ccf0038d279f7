//! Realtime store abstraction

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A value delivered for a watched path
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEvent {
    pub path: String,
    /// `None` when the node does not exist
    pub value: Option<Value>,
}

/// A key-value store that pushes value changes for a path
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait RealtimeStore: Send + Sync + std::fmt::Debug {
    /// Watch `path` and send an event for its current value and every change.
    ///
    /// Returns `Ok(())` when `cancel` fires or the server ends the stream,
    /// and an error when the subscription cannot be opened or breaks.
    async fn watch(
        &self,
        path: &str,
        events: mpsc::Sender<StoreEvent>,
        cancel: CancellationToken,
    ) -> crate::Result<()>;
}
