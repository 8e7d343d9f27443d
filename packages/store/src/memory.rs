//! In-memory implementations of the adapter contracts, used by tests and by
//! anything that needs a store without a network.

use crate::adapter::{DeviceCache, ImageHost, SessionProvider, StoreAdapter, Subscription};
use crate::error::{StoreError, StoreResult};
use crate::records::Session;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Document store backed by a flat leaf map. Interior reads assemble the
/// subtree; writes notify subscribers watching any overlapping path.
pub struct MemoryStore {
    data: Mutex<BTreeMap<String, Value>>,
    watchers: Mutex<HashMap<String, broadcast::Sender<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(BTreeMap::new()),
            watchers: Mutex::new(HashMap::new()),
        }
    }

    fn value_at(data: &BTreeMap<String, Value>, path: &str) -> Option<Value> {
        if let Some(value) = data.get(path) {
            return Some(value.clone());
        }

        let prefix = format!("{path}/");
        let mut root = Map::new();
        for (key, value) in data.range(prefix.clone()..) {
            let Some(rest) = key.strip_prefix(&prefix) else {
                break;
            };
            let segments: Vec<&str> = rest.split('/').collect();
            insert_nested(&mut root, &segments, value.clone());
        }

        if root.is_empty() {
            None
        } else {
            Some(Value::Object(root))
        }
    }

    fn notify(&self, changed: &str) {
        let data = self.data.lock().unwrap();
        let watchers = self.watchers.lock().unwrap();
        for (watched, sender) in watchers.iter() {
            if !paths_overlap(watched, changed) || sender.receiver_count() == 0 {
                continue;
            }
            let value = Self::value_at(&data, watched).unwrap_or(Value::Null);
            let _ = sender.send(value);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_nested(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child) = entry {
                insert_nested(child, rest, value);
            }
        }
    }
}

/// Segment-boundary-aware overlap: a change anywhere under a watched path
/// (or above it) affects the watched value
fn paths_overlap(watched: &str, changed: &str) -> bool {
    watched == changed
        || changed.starts_with(&format!("{watched}/"))
        || watched.starts_with(&format!("{changed}/"))
}

#[async_trait]
impl StoreAdapter for MemoryStore {
    async fn get(&self, path: &str) -> StoreResult<Option<Value>> {
        let data = self.data.lock().unwrap();
        Ok(Self::value_at(&data, path))
    }

    async fn set(&self, path: &str, value: Value) -> StoreResult<()> {
        {
            let mut data = self.data.lock().unwrap();
            let prefix = format!("{path}/");
            data.retain(|key, _| key != path && !key.starts_with(&prefix));
            data.insert(path.to_string(), value);
        }
        self.notify(path);
        Ok(())
    }

    async fn remove(&self, path: &str) -> StoreResult<()> {
        {
            let mut data = self.data.lock().unwrap();
            let prefix = format!("{path}/");
            data.retain(|key, _| key != path && !key.starts_with(&prefix));
        }
        self.notify(path);
        Ok(())
    }

    fn subscribe(&self, path: &str) -> StoreResult<Subscription> {
        let initial = {
            let data = self.data.lock().unwrap();
            Self::value_at(&data, path).unwrap_or(Value::Null)
        };
        let mut watchers = self.watchers.lock().unwrap();
        let sender = watchers
            .entry(path.to_string())
            .or_insert_with(|| broadcast::channel(32).0);
        Ok(Subscription::new(Some(initial), sender.subscribe()))
    }
}

/// Device cache backed by a plain map
pub struct MemoryCache {
    map: Mutex<HashMap<String, Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.map.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.map.lock().unwrap().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.map.lock().unwrap().remove(key);
    }
}

/// Image host returning predictable URLs, with injectable failure
pub struct MemoryImageHost {
    counter: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryImageHost {
    pub fn new() -> Self {
        Self {
            counter: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent upload fail
    pub fn fail_uploads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl Default for MemoryImageHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageHost for MemoryImageHost {
    async fn upload(&self, _bytes: &[u8]) -> Result<String, StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::upload("image host rejected the upload"));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("https://img.test/upload-{n}.png"))
    }
}

/// Session provider with a fixed identity (or none)
pub struct FixedSession {
    session: Option<Session>,
}

impl FixedSession {
    pub fn signed_in(uid: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            session: Some(Session {
                uid: uid.into(),
                username: username.into(),
            }),
        }
    }

    pub fn signed_out() -> Self {
        Self { session: None }
    }
}

impl SessionProvider for FixedSession {
    fn current(&self) -> Option<Session> {
        self.session.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::DeviceCacheExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_interior_get_assembles_subtree() {
        let store = MemoryStore::new();
        store
            .set("userPatterns/u1/100", json!({"id": 100}))
            .await
            .unwrap();
        store
            .set("userPatterns/u1/200", json!({"id": 200}))
            .await
            .unwrap();

        let tree = store.get("userPatterns/u1").await.unwrap().unwrap();
        assert_eq!(tree["100"]["id"], 100);
        assert_eq!(tree["200"]["id"], 200);

        let all = store.get("userPatterns").await.unwrap().unwrap();
        assert_eq!(all["u1"]["100"]["id"], 100);
    }

    #[tokio::test]
    async fn test_subscription_yields_initial_then_replacements() {
        let store = MemoryStore::new();
        store.set("userPatterns/u1/1", json!({"id": 1})).await.unwrap();

        let mut sub = store.subscribe("userPatterns").unwrap();
        let initial = sub.next().await.unwrap();
        assert_eq!(initial["u1"]["1"]["id"], 1);

        store.set("userPatterns/u2/2", json!({"id": 2})).await.unwrap();
        let updated = sub.next().await.unwrap();
        assert_eq!(updated["u2"]["2"]["id"], 2);
        assert_eq!(updated["u1"]["1"]["id"], 1);
    }

    #[tokio::test]
    async fn test_remove_notifies_with_null_when_empty() {
        let store = MemoryStore::new();
        store.set("users/u1/likedPatterns", json!([1, 2])).await.unwrap();

        let mut sub = store.subscribe("users/u1/likedPatterns").unwrap();
        let _ = sub.next().await; // initial

        store.remove("users/u1/likedPatterns").await.unwrap();
        assert_eq!(sub.next().await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_set_replaces_subtree() {
        let store = MemoryStore::new();
        store.set("userStitches/u1/1", json!({"id": 1})).await.unwrap();
        store.set("userStitches/u1", json!({"fresh": true})).await.unwrap();

        let value = store.get("userStitches/u1").await.unwrap().unwrap();
        assert_eq!(value, json!({"fresh": true}));
    }

    #[test]
    fn test_cache_record_round_trip() {
        let cache = MemoryCache::new();
        cache.set_record("likedPatterns", &vec![100i64, 200]);
        let back: Vec<i64> = cache.get_record("likedPatterns").unwrap();
        assert_eq!(back, vec![100, 200]);
    }

    #[tokio::test]
    async fn test_failing_image_host() {
        let host = MemoryImageHost::new();
        assert!(host.upload(b"png").await.unwrap().starts_with("https://img.test/"));
        host.fail_uploads();
        assert!(host.upload(b"png").await.is_err());
    }
}
