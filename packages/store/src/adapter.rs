use crate::error::{StoreError, StoreResult};
use crate::records::Session;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

/// Remote document-style key-value store.
///
/// Paths are hierarchical keys (see [`crate::paths`]); a `get` on an interior
/// path returns the assembled subtree. No transactions, no atomicity across
/// paths: every multi-step operation is best-effort sequential.
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// Read the value (or assembled subtree) at `path`
    async fn get(&self, path: &str) -> StoreResult<Option<Value>>;

    /// Overwrite the value at `path`
    async fn set(&self, path: &str, value: Value) -> StoreResult<()>;

    /// Remove the value (and any subtree) at `path`
    async fn remove(&self, path: &str) -> StoreResult<()>;

    /// Watch `path`: the subscription yields the current value immediately,
    /// then the full replacement value after every change under the path.
    /// Dropping the handle releases the listener.
    fn subscribe(&self, path: &str) -> StoreResult<Subscription>;
}

/// Handle for a push-based store subscription
pub struct Subscription {
    initial: Option<Value>,
    receiver: broadcast::Receiver<Value>,
}

impl Subscription {
    pub fn new(initial: Option<Value>, receiver: broadcast::Receiver<Value>) -> Self {
        Self { initial, receiver }
    }

    /// Next replacement value; `None` once the store is gone.
    /// Missed intermediate values are skipped (each push is a full
    /// replacement, so only the latest matters).
    pub async fn next(&mut self) -> Option<Value> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }
        loop {
            match self.receiver.recv().await {
                Ok(value) => return Some(value),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Synchronous key-value mirror on the device: read on startup before remote
/// data arrives, and the fallback when remote reads fail.
pub trait DeviceCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    fn remove(&self, key: &str);
}

/// Typed convenience layer over [`DeviceCache`]
pub trait DeviceCacheExt: DeviceCache {
    fn get_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    fn set_record<T: Serialize>(&self, key: &str, record: &T) {
        if let Ok(value) = serde_json::to_value(record) {
            self.set(key, value);
        }
    }
}

impl<C: DeviceCache + ?Sized> DeviceCacheExt for C {}

/// External image hosting service; returns a public URL for uploaded bytes
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, bytes: &[u8]) -> Result<String, StoreError>;
}

/// Exposes the current signed-in identity, if any
pub trait SessionProvider: Send + Sync {
    fn current(&self) -> Option<Session>;
}
