//! Draft persistence over the device cache, so an interrupted editing
//! session survives a reload. Drafts are whole-form snapshots; an empty form
//! clears the draft instead of storing a blank one.

use serde_json::Value;
use std::sync::Arc;
use yarnbook_store::paths::cache_keys;
use yarnbook_store::{DeviceCache, DeviceCacheExt, PatternDraft, StitchDraft};

#[derive(Clone)]
pub struct DraftStore {
    cache: Arc<dyn DeviceCache>,
}

impl DraftStore {
    pub fn new(cache: Arc<dyn DeviceCache>) -> Self {
        Self { cache }
    }

    pub fn save_pattern(&self, draft: &PatternDraft) {
        if draft.is_empty() {
            self.cache.remove(cache_keys::PATTERN_DRAFT);
        } else {
            self.cache.set_record(cache_keys::PATTERN_DRAFT, draft);
        }
    }

    pub fn load_pattern(&self) -> Option<PatternDraft> {
        self.cache.get_record(cache_keys::PATTERN_DRAFT)
    }

    pub fn clear_pattern(&self) {
        self.cache.remove(cache_keys::PATTERN_DRAFT);
    }

    pub fn save_stitch(&self, draft: &StitchDraft) {
        if draft.is_empty() {
            self.cache.remove(cache_keys::STITCH_DRAFT);
        } else {
            self.cache.set_record(cache_keys::STITCH_DRAFT, draft);
        }
    }

    pub fn load_stitch(&self) -> Option<StitchDraft> {
        self.cache.get_record(cache_keys::STITCH_DRAFT)
    }

    /// Clears the form draft and the panel-open flag together
    pub fn clear_stitch(&self) {
        self.cache.remove(cache_keys::STITCH_DRAFT);
        self.cache.remove(cache_keys::STITCH_PANEL_OPEN);
    }

    pub fn set_stitch_panel_open(&self, open: bool) {
        if open {
            self.cache.set(cache_keys::STITCH_PANEL_OPEN, Value::Bool(true));
        } else {
            self.cache.remove(cache_keys::STITCH_PANEL_OPEN);
        }
    }

    pub fn stitch_panel_open(&self) -> bool {
        matches!(self.cache.get(cache_keys::STITCH_PANEL_OPEN), Some(Value::Bool(true)))
    }
}
