//! Realtime Database streaming client
//!
//! Subscribes through the REST streaming protocol: a GET on `<path>.json`
//! with `Accept: text/event-stream` answers with server-sent events. `put`
//! and `patch` events carry `{"path": ..., "data": ...}` relative to the
//! watched node; `keep-alive` is sent periodically; `cancel` and
//! `auth_revoked` end the subscription.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::StoreConfig;
use crate::store::{RealtimeStore, StoreEvent};
use crate::FarmwatchError;

/// A decoded server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

/// Incremental `text/event-stream` decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: String,
    data: Vec<String>,
}

impl SseDecoder {
    /// Feed a chunk of bytes and return every event it completes
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if let Some(event) = self.dispatch() {
                    events.push(event);
                }
                continue;
            }
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            match field {
                "event" => self.event = value.to_string(),
                "data" => self.data.push(value.to_string()),
                _ => {}
            }
        }

        events
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = std::mem::take(&mut self.event);
        let data = std::mem::take(&mut self.data);
        if event.is_empty() && data.is_empty() {
            return None;
        }
        Some(SseEvent {
            event: if event.is_empty() {
                "message".to_string()
            } else {
                event
            },
            data: data.join("\n"),
        })
    }
}

#[derive(Debug, Deserialize)]
struct StreamPayload {
    path: String,
    data: Value,
}

/// A streaming protocol message
#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    Put { path: String, data: Value },
    Patch { path: String, data: Value },
    KeepAlive,
    Cancel(String),
    AuthRevoked(String),
    Unknown(String),
}

impl StreamMessage {
    pub fn parse(event: &SseEvent) -> crate::Result<Self> {
        Ok(match event.event.as_str() {
            "put" => {
                let payload: StreamPayload = serde_json::from_str(&event.data)?;
                StreamMessage::Put {
                    path: payload.path,
                    data: payload.data,
                }
            }
            "patch" => {
                let payload: StreamPayload = serde_json::from_str(&event.data)?;
                StreamMessage::Patch {
                    path: payload.path,
                    data: payload.data,
                }
            }
            "keep-alive" => StreamMessage::KeepAlive,
            "cancel" => StreamMessage::Cancel(event.data.clone()),
            "auth_revoked" => StreamMessage::AuthRevoked(event.data.clone()),
            other => StreamMessage::Unknown(other.to_string()),
        })
    }
}

/// Local copy of the watched node, kept in sync with `put`/`patch` events
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NodeMirror {
    value: Option<Value>,
}

impl NodeMirror {
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Replace the value at `path` (relative to the node) with `data`
    pub fn put(&mut self, path: &str, data: Value) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            self.value = (!data.is_null()).then_some(data);
            return;
        };

        let mut node = self.value.get_or_insert_with(|| Value::Object(Map::new()));
        for segment in parents {
            node = object_mut(node)
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        let children = object_mut(node);
        if data.is_null() {
            children.remove(*last);
        } else {
            children.insert(last.to_string(), data);
        }

        if matches!(&self.value, Some(Value::Object(map)) if map.is_empty()) {
            self.value = None;
        }
    }

    /// Merge each child of `data` into the node at `path`
    pub fn patch(&mut self, path: &str, data: Value) {
        let Value::Object(children) = data else {
            self.put(path, data);
            return;
        };
        let base = path.trim_end_matches('/');
        for (key, value) in children {
            self.put(&format!("{}/{}", base, key), value);
        }
    }
}

fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

/// Realtime Database client using reqwest
#[derive(Default)]
pub struct FirebaseStore {
    database_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl std::fmt::Debug for FirebaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseStore")
            .field("database_url", &self.database_url)
            .field("authenticated", &self.auth_token.is_some())
            .finish()
    }
}

impl FirebaseStore {
    pub fn new(config: &StoreConfig) -> Self {
        tracing::debug!("Created FirebaseStore for {}", config.database_url);
        Self {
            database_url: config.database_url.clone(),
            auth_token: config.auth_token.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// REST URL for `path`, including the auth parameter when configured
    pub fn stream_url(&self, path: &str) -> crate::Result<Url> {
        let raw = format!(
            "{}/{}.json",
            self.database_url.trim_end_matches('/'),
            path.trim_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|e| {
            FarmwatchError::Config(format!("Invalid database URL {}: {}", raw, e))
        })?;
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }
}

#[async_trait]
impl RealtimeStore for FirebaseStore {
    async fn watch(
        &self,
        path: &str,
        events: mpsc::Sender<StoreEvent>,
        cancel: CancellationToken,
    ) -> crate::Result<()> {
        let url = self.stream_url(path)?;
        tracing::debug!("Subscribing to {}", path);

        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream");

        let mut response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            response = request.send() => response
                .map_err(|e| FarmwatchError::Http(format!("GET {} failed: {}", path, e)))?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FarmwatchError::Store(format!(
                "Subscription to {} rejected with status {}",
                path,
                status.as_u16()
            )));
        }
        tracing::info!("Subscribed to {}", path);

        let mut decoder = SseDecoder::default();
        let mut node = NodeMirror::default();

        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Subscription to {} cancelled", path);
                    return Ok(());
                }
                chunk = response.chunk() => chunk
                    .map_err(|e| FarmwatchError::Http(format!("Reading stream for {}: {}", path, e)))?,
            };
            let Some(chunk) = chunk else {
                tracing::debug!("Stream for {} ended", path);
                return Ok(());
            };

            for event in decoder.feed(&chunk) {
                match StreamMessage::parse(&event)? {
                    StreamMessage::Put { path: rel, data } => node.put(&rel, data),
                    StreamMessage::Patch { path: rel, data } => node.patch(&rel, data),
                    StreamMessage::KeepAlive => continue,
                    StreamMessage::Cancel(reason) => {
                        return Err(FarmwatchError::Store(format!(
                            "Subscription to {} cancelled by server: {}",
                            path, reason
                        )));
                    }
                    StreamMessage::AuthRevoked(reason) => {
                        return Err(FarmwatchError::Store(format!(
                            "Credentials for {} revoked: {}",
                            path, reason
                        )));
                    }
                    StreamMessage::Unknown(name) => {
                        tracing::debug!("Ignoring '{}' event on {}", name, path);
                        continue;
                    }
                }

                let event = StoreEvent {
                    path: path.to_string(),
                    value: node.value().cloned(),
                };
                if events.send(event).await.is_err() {
                    tracing::debug!("Receiver for {} dropped", path);
                    return Ok(());
                }
            }
        }
    }
}
