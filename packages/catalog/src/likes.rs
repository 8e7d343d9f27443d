//! The liked-patterns set: an id list per user, mirrored on the device and
//! toggled optimistically with a toast message for the UI.

use crate::error::{CatalogError, CatalogResult};
use crate::filter::dedup_by_id;
use std::sync::Arc;
use yarnbook_store::paths::{self, cache_keys};
use yarnbook_store::{
    DeviceCache, DeviceCacheExt, Pattern, SessionProvider, StoreAdapter,
};

pub const TOAST_LIKED: &str = "Pattern added to Liked Patterns!";
pub const TOAST_UNLIKED: &str = "Pattern removed from Liked Patterns.";

pub struct LikedPatterns {
    store: Arc<dyn StoreAdapter>,
    cache: Arc<dyn DeviceCache>,
    session: Arc<dyn SessionProvider>,
    ids: Vec<i64>,
}

impl LikedPatterns {
    /// Starts from the device mirror; `refresh` replaces it with the remote
    /// set once that is reachable
    pub fn new(
        store: Arc<dyn StoreAdapter>,
        cache: Arc<dyn DeviceCache>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let ids = cache.get_record(cache_keys::LIKED_PATTERNS).unwrap_or_default();
        Self {
            store,
            cache,
            session,
            ids,
        }
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn is_liked(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    fn identity(&self) -> CatalogResult<yarnbook_store::Session> {
        self.session.current().ok_or(CatalogError::SignedOut)
    }

    /// Reload the set from the remote store; an unreachable remote keeps the
    /// device mirror
    pub async fn refresh(&mut self) -> CatalogResult<()> {
        let identity = self.identity()?;
        match self.store.get(&paths::liked_patterns(&identity.uid)).await {
            Ok(value) => {
                self.ids = value
                    .and_then(|v| serde_json::from_value(v).ok())
                    .unwrap_or_default();
                self.cache.set_record(cache_keys::LIKED_PATTERNS, &self.ids);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "liked-patterns refresh failed, keeping device mirror");
                Ok(())
            }
        }
    }

    /// Flip membership for one pattern. The device mirror is written first;
    /// a remote failure is surfaced afterwards with the local state kept.
    /// Returns the toast message for the new state.
    pub async fn toggle(&mut self, id: i64) -> CatalogResult<&'static str> {
        let identity = self.identity()?;

        let toast = if let Some(pos) = self.ids.iter().position(|&i| i == id) {
            self.ids.remove(pos);
            TOAST_UNLIKED
        } else {
            self.ids.push(id);
            TOAST_LIKED
        };
        self.cache.set_record(cache_keys::LIKED_PATTERNS, &self.ids);

        let value = serde_json::to_value(&self.ids).map_err(yarnbook_store::StoreError::from)?;
        if let Err(err) = self
            .store
            .set(&paths::liked_patterns(&identity.uid), value)
            .await
        {
            tracing::warn!(pattern_id = id, error = %err, "remote like toggle failed");
            return Err(err.into());
        }
        Ok(toast)
    }

    /// The liked patterns, in like order. Ids not present in `known` are
    /// looked up across the whole remote catalog (the like may point at a
    /// pattern whose owner's listing was never loaded here).
    pub async fn listing(&self, known: &[Pattern]) -> CatalogResult<Vec<Pattern>> {
        let mut found: Vec<Pattern> = Vec::new();
        let mut missing: Vec<i64> = Vec::new();
        for &id in &self.ids {
            match known.iter().find(|p| p.id == id) {
                Some(pattern) => found.push(pattern.clone()),
                None => missing.push(id),
            }
        }

        if !missing.is_empty() {
            if let Some(value) = self.store.get(paths::ALL_PATTERNS).await? {
                let everything = crate::listing::patterns_from_all_users(&value);
                for id in missing {
                    if let Some(pattern) = everything.iter().find(|p| p.id == id) {
                        found.push(pattern.clone());
                    }
                }
            }
        }

        let mut ordered = dedup_by_id(found);
        ordered.sort_by_key(|p| {
            self.ids
                .iter()
                .position(|&i| i == p.id)
                .unwrap_or(usize::MAX)
        });
        Ok(ordered)
    }
}
