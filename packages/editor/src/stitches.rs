//! The stitch manager: the user's glossary of custom stitches, with its own
//! draft, search, and a small two-per-page list.

use crate::drafts::DraftStore;
use crate::error::{EditorError, EditorResult};
use chrono::Utc;
use std::sync::Arc;
use yarnbook_common::Pager;
use yarnbook_store::paths;
use yarnbook_store::{
    DeviceCache, ImageHost, SessionProvider, Stitch, StitchDraft, StoreAdapter,
};

pub const STITCHES_PER_PAGE: usize = 2;

pub struct StitchManager {
    store: Arc<dyn StoreAdapter>,
    image_host: Arc<dyn ImageHost>,
    session: Arc<dyn SessionProvider>,
    drafts: DraftStore,

    stitches: Vec<Stitch>,
    query: String,
    pager: Pager,

    pub draft: StitchDraft,
    /// Id of the stitch being edited, `None` while creating
    editing: Option<i64>,
    panel_open: bool,
}

impl StitchManager {
    /// Restores the saved draft and the panel-open flag
    pub fn new(
        store: Arc<dyn StoreAdapter>,
        cache: Arc<dyn DeviceCache>,
        image_host: Arc<dyn ImageHost>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let drafts = DraftStore::new(cache);
        let draft = drafts.load_stitch().unwrap_or_default();
        let panel_open = drafts.stitch_panel_open();
        Self {
            store,
            image_host,
            session,
            drafts,
            stitches: Vec::new(),
            query: String::new(),
            pager: Pager::new(STITCHES_PER_PAGE),
            draft,
            editing: None,
            panel_open,
        }
    }

    fn identity(&self) -> EditorResult<yarnbook_store::Session> {
        self.session.current().ok_or(EditorError::SignedOut)
    }

    /// Reload the glossary from the remote store
    pub async fn refresh(&mut self) -> EditorResult<()> {
        let identity = self.identity()?;
        let value = self
            .store
            .get(&paths::user_stitches(&identity.uid))
            .await?;
        let mut stitches: Vec<Stitch> = match value {
            Some(serde_json::Value::Object(map)) => map
                .into_values()
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
            _ => Vec::new(),
        };
        stitches.sort_by_key(|s| s.id);
        self.stitches = stitches;
        self.refilter();
        Ok(())
    }

    pub fn stitches(&self) -> &[Stitch] {
        &self.stitches
    }

    // ---- search and paging ----

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    fn refilter(&mut self) {
        let count = self.filtered().len();
        self.pager.set_item_count(count);
    }

    /// Case-insensitive name search
    fn filtered(&self) -> Vec<&Stitch> {
        let needle = self.query.trim().to_lowercase();
        self.stitches
            .iter()
            .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// The current page of search results
    pub fn visible(&self) -> Vec<&Stitch> {
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

    // ---- panel and draft ----

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn set_panel_open(&mut self, open: bool) {
        self.panel_open = open;
        self.drafts.set_stitch_panel_open(open);
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
        self.drafts.save_stitch(&self.draft);
    }

    pub fn set_draft_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
        self.drafts.save_stitch(&self.draft);
    }

    /// Upload the example photo for the stitch being drafted
    pub async fn upload_draft_image(
        &mut self,
        file_name: &str,
        bytes: &[u8],
    ) -> EditorResult<()> {
        let url = self.image_host.upload(bytes).await?;
        self.draft.image = Some(url);
        self.draft.selected_file_name = Some(file_name.to_string());
        self.drafts.save_stitch(&self.draft);
        Ok(())
    }

    /// Load an existing stitch into the form for editing
    pub fn begin_edit(&mut self, id: i64) {
        if let Some(stitch) = self.stitches.iter().find(|s| s.id == id) {
            self.draft = StitchDraft {
                name: stitch.name.clone(),
                description: stitch.description.clone(),
                image: stitch.image.clone(),
                selected_file_name: None,
            };
            self.editing = Some(id);
            self.panel_open = true;
            self.drafts.save_stitch(&self.draft);
            self.drafts.set_stitch_panel_open(true);
        }
    }

    /// Abandon the stitch form: draft and panel flag are cleared
    pub fn cancel(&mut self) {
        self.draft = StitchDraft::default();
        self.editing = None;
        self.panel_open = false;
        self.drafts.clear_stitch();
    }

    /// Validate and persist the drafted stitch. Editing preserves the
    /// original creation time; creation stamps a fresh id.
    pub async fn save(&mut self) -> EditorResult<Stitch> {
        if self.draft.name.trim().is_empty() {
            return Err(EditorError::MissingStitchName);
        }
        if self.draft.description.trim().is_empty() {
            return Err(EditorError::MissingStitchDescription);
        }
        let identity = self.identity()?;

        let (id, created_at) = match self.editing {
            Some(id) => {
                let created_at = self
                    .stitches
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.created_at)
                    .unwrap_or_else(Utc::now);
                (id, created_at)
            }
            None => (Utc::now().timestamp_millis(), Utc::now()),
        };

        let stitch = Stitch {
            id,
            name: self.draft.name.trim().to_string(),
            description: self.draft.description.trim().to_string(),
            image: self.draft.image.clone(),
            created_at,
        };

        let value = serde_json::to_value(&stitch).map_err(yarnbook_store::StoreError::from)?;
        self.store
            .set(&paths::user_stitch(&identity.uid, id), value)
            .await?;

        match self.stitches.iter_mut().find(|s| s.id == id) {
            Some(slot) => *slot = stitch.clone(),
            None => self.stitches.push(stitch.clone()),
        }
        self.stitches.sort_by_key(|s| s.id);
        self.refilter();

        self.draft = StitchDraft::default();
        self.editing = None;
        self.drafts.clear_stitch();
        Ok(stitch)
    }

    /// Delete a stitch from the glossary. Patterns that referenced it keep
    /// their frozen labels and their saved stitch snapshots.
    pub async fn delete(&mut self, id: i64) -> EditorResult<()> {
        let identity = self.identity()?;
        self.store
            .remove(&paths::user_stitch(&identity.uid, id))
            .await?;
        self.stitches.retain(|s| s.id != id);
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.refilter();
        Ok(())
    }
}
