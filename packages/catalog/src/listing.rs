//! The pattern listings: the user's own patterns (remote-first with a device
//! fallback) and the live public catalog fed by a store subscription.

use crate::error::{CatalogError, CatalogResult};
use crate::filter::{self, PATTERNS_PER_PAGE};
use serde_json::Value;
use std::sync::Arc;
use yarnbook_common::Pager;
use yarnbook_store::paths::{self, cache_keys};
use yarnbook_store::{
    Category, DeviceCache, DeviceCacheExt, Pattern, SessionProvider, StoreAdapter, Subscription,
};

/// Flatten a `{uid: {id: pattern}}` snapshot into records, dropping entries
/// that no longer deserialize
pub fn patterns_from_all_users(value: &Value) -> Vec<Pattern> {
    let Value::Object(users) = value else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for user_map in users.values() {
        out.extend(patterns_from_user_map(user_map));
    }
    filter::dedup_by_id(out)
}

/// The public catalog's view of a `{uid: {id: pattern}}` snapshot: only
/// public patterns, never the signed-in user's own, with the creator fields
/// denormalized from the snapshot key and the username directory.
pub fn public_patterns_from_snapshot(
    snapshot: &Value,
    exclude_uid: Option<&str>,
    users: &Value,
) -> Vec<Pattern> {
    let Value::Object(by_uid) = snapshot else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (uid, user_map) in by_uid {
        if exclude_uid == Some(uid.as_str()) {
            continue;
        }
        let username = users
            .get(uid)
            .and_then(|u| u.get("username"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown user");
        for mut pattern in patterns_from_user_map(user_map) {
            if !pattern.public {
                continue;
            }
            pattern.creator_uid = Some(uid.clone());
            pattern.creator_username = Some(username.to_string());
            out.push(pattern);
        }
    }
    filter::dedup_by_id(out)
}

/// Flatten one user's `{id: pattern}` map
pub fn patterns_from_user_map(value: &Value) -> Vec<Pattern> {
    let Value::Object(map) = value else {
        return Vec::new();
    };
    map.values()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect()
}

pub struct Catalog {
    store: Arc<dyn StoreAdapter>,
    cache: Arc<dyn DeviceCache>,
    session: Arc<dyn SessionProvider>,

    my_patterns: Vec<Pattern>,
    public_patterns: Vec<Pattern>,

    query: String,
    category: Option<Category>,
    pager: Pager,
}

impl Catalog {
    pub fn new(
        store: Arc<dyn StoreAdapter>,
        cache: Arc<dyn DeviceCache>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            store,
            cache,
            session,
            my_patterns: Vec::new(),
            public_patterns: Vec::new(),
            query: String::new(),
            category: None,
            pager: Pager::new(PATTERNS_PER_PAGE),
        }
    }

    fn identity(&self) -> CatalogResult<yarnbook_store::Session> {
        self.session.current().ok_or(CatalogError::SignedOut)
    }

    // ---- own patterns ----

    /// Load the user's own patterns. The remote listing wins and refreshes
    /// the device mirror; an unreachable remote falls back to the mirror.
    pub async fn load_my_patterns(&mut self) -> CatalogResult<()> {
        let identity = self.identity()?;
        match self.store.get(&paths::user_patterns(&identity.uid)).await {
            Ok(value) => {
                let mut mine = value
                    .as_ref()
                    .map(patterns_from_user_map)
                    .unwrap_or_default();
                mine.sort_by_key(|p| std::cmp::Reverse(p.id));
                self.cache.set_record(cache_keys::MY_PATTERNS, &mine);
                self.my_patterns = mine;
            }
            Err(err) => {
                tracing::warn!(error = %err, "own-pattern load failed, using device mirror");
                self.my_patterns = self
                    .cache
                    .get_record(cache_keys::MY_PATTERNS)
                    .unwrap_or_default();
            }
        }
        Ok(())
    }

    pub fn my_patterns(&self) -> &[Pattern] {
        &self.my_patterns
    }

    /// The user's own patterns, narrowed by the active search and category
    pub fn filtered_mine(&self) -> Vec<&Pattern> {
        filter::apply_filters(&self.my_patterns, &self.query, self.category)
    }

    /// The home-screen strip of the user's newest patterns. The active
    /// filters narrow it the same way they narrow the grids.
    pub fn recent_mine(&self) -> Vec<&Pattern> {
        filter::recent(self.filtered_mine())
    }

    /// Delete one of the user's patterns after the caller-supplied prompt
    /// confirms it. Returns `false` when the pattern is unknown or the
    /// prompt declines. On confirmation the pattern leaves the local
    /// listing at once, then the remote copy is removed; a remote failure
    /// is surfaced but does not resurrect the pattern locally.
    pub async fn delete_pattern<F>(&mut self, id: i64, confirm: F) -> CatalogResult<bool>
    where
        F: FnOnce(&Pattern) -> bool,
    {
        let identity = self.identity()?;
        let Some(pattern) = self.my_patterns.iter().find(|p| p.id == id) else {
            return Ok(false);
        };
        if !confirm(pattern) {
            return Ok(false);
        }

        self.my_patterns.retain(|p| p.id != id);
        self.cache.set_record(cache_keys::MY_PATTERNS, &self.my_patterns);

        if let Err(err) = self
            .store
            .remove(&paths::user_pattern(&identity.uid, id))
            .await
        {
            tracing::warn!(pattern_id = id, error = %err, "remote pattern delete failed");
            return Err(err.into());
        }
        Ok(true)
    }

    // ---- public catalog ----

    /// Open the live subscription on the whole pattern tree. Feed every
    /// yielded snapshot back through [`Catalog::apply_public_snapshot`].
    pub fn subscribe_public(&self) -> CatalogResult<Subscription> {
        Ok(self.store.subscribe(paths::ALL_PATTERNS)?)
    }

    /// Replace the public listing with a store snapshot. Only public
    /// patterns from other users are kept, with their creator fields filled
    /// from the username directory; the page cursor resets with the new
    /// contents.
    pub async fn apply_public_snapshot(&mut self, snapshot: &Value) {
        let users = match self.store.get(paths::USERS).await {
            Ok(value) => value.unwrap_or(Value::Null),
            Err(err) => {
                tracing::warn!(error = %err, "username directory load failed");
                Value::Null
            }
        };
        let own_uid = self.session.current().map(|s| s.uid);
        let mut public = public_patterns_from_snapshot(snapshot, own_uid.as_deref(), &users);
        public.sort_by_key(|p| std::cmp::Reverse(p.id));
        self.public_patterns = public;
        self.refilter();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
        self.refilter();
    }

    fn refilter(&mut self) {
        let count = self.filtered().len();
        self.pager.set_item_count(count);
    }

    fn filtered(&self) -> Vec<&Pattern> {
        filter::apply_filters(&self.public_patterns, &self.query, self.category)
    }

    /// The current page of the filtered public catalog
    pub fn visible_public(&self) -> Vec<&Pattern> {
        let filtered = self.filtered();
        filtered[self.pager.page_range()].to_vec()
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn next_page(&mut self) {
        self.pager.next();
    }

    pub fn prev_page(&mut self) {
        self.pager.prev();
    }
}
