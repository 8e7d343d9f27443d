//! The pattern-editor session: form state, the instructions fragment, caret
//! tracking, draft autosave, and the save workflow.

use crate::caret::{self, Caret};
use crate::drafts::DraftStore;
use crate::error::{EditorError, EditorResult};
use crate::surface::{FormatCommand, RichTextSurface};
use crate::toolbar::ToolbarState;
use chrono::Utc;
use std::sync::Arc;
use yarnbook_markup::{parse_with_key, serialize, Fragment, IdGenerator, Node, Span};
use yarnbook_store::paths::{self, cache_keys};
use yarnbook_store::{
    Category, DeviceCache, DeviceCacheExt, ImageHost, Pattern, PatternDraft, SessionProvider,
    Stitch, StoreAdapter, MAX_PROJECT_IMAGES,
};

/// Fragment key for editor sessions; node ids inside one session derive
/// from it
const EDITOR_KEY: &str = "pattern-editor";

/// Saved instructions that no longer parse are kept verbatim as one text
/// node, the same degradation the viewer applies. An empty fragment here
/// would overwrite the stored instructions on the next save.
fn parse_or_raw(source: &str) -> Fragment {
    parse_with_key(source, EDITOR_KEY).unwrap_or_else(|_| {
        let mut ids = IdGenerator::new(EDITOR_KEY);
        Fragment {
            nodes: vec![Node::text(source, Span::synthetic(ids.new_id()))],
        }
    })
}

pub struct PatternEditor {
    store: Arc<dyn StoreAdapter>,
    cache: Arc<dyn DeviceCache>,
    image_host: Arc<dyn ImageHost>,
    session: Arc<dyn SessionProvider>,
    drafts: DraftStore,

    /// The pattern being edited, when this session started from an existing
    /// record. Its id (and only its id) survives into the saved pattern.
    editing: Option<Pattern>,

    title: String,
    category: Option<Category>,
    project_images: Vec<String>,
    materials: String,
    public: bool,

    instructions: Fragment,
    caret: Option<Caret>,
    selection_active: bool,
    toolbar: ToolbarState,
    ids: IdGenerator,

    /// Glossary available to this session, snapshotted into the pattern on
    /// save
    available_stitches: Vec<Stitch>,
}

impl PatternEditor {
    /// Fresh session for a new pattern. Restores the saved draft, if any.
    pub fn new(
        store: Arc<dyn StoreAdapter>,
        cache: Arc<dyn DeviceCache>,
        image_host: Arc<dyn ImageHost>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let drafts = DraftStore::new(cache.clone());
        let mut editor = Self {
            store,
            cache,
            image_host,
            session,
            drafts,
            editing: None,
            title: String::new(),
            category: None,
            project_images: Vec::new(),
            materials: String::new(),
            public: false,
            instructions: Fragment::new(),
            caret: None,
            selection_active: false,
            toolbar: ToolbarState::new(),
            ids: IdGenerator::new(EDITOR_KEY),
            available_stitches: Vec::new(),
        };
        if let Some(draft) = editor.drafts.load_pattern() {
            editor.restore_draft(draft);
        }
        editor
    }

    /// Session editing an existing pattern. Any saved draft is left alone;
    /// it belongs to the in-progress new pattern.
    pub fn edit(
        pattern: Pattern,
        store: Arc<dyn StoreAdapter>,
        cache: Arc<dyn DeviceCache>,
        image_host: Arc<dyn ImageHost>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let drafts = DraftStore::new(cache.clone());
        let instructions = parse_or_raw(&pattern.instructions);
        Self {
            store,
            cache,
            image_host,
            session,
            drafts,
            title: pattern.title.clone(),
            category: Some(pattern.category),
            project_images: pattern.images.clone(),
            materials: pattern.materials.clone(),
            public: pattern.public,
            available_stitches: pattern.stitches.clone(),
            editing: Some(pattern),
            instructions,
            caret: None,
            selection_active: false,
            toolbar: ToolbarState::new(),
            ids: IdGenerator::new(EDITOR_KEY),
        }
    }

    fn restore_draft(&mut self, draft: PatternDraft) {
        self.title = draft.title;
        self.category = draft.category;
        self.project_images = draft.images;
        self.materials = draft.materials;
        self.public = draft.public;
        self.instructions = parse_or_raw(&draft.html);
    }

    fn persist_draft(&self) {
        if self.editing.is_some() {
            return;
        }
        self.drafts.save_pattern(&PatternDraft {
            title: self.title.clone(),
            category: self.category,
            images: self.project_images.clone(),
            materials: self.materials.clone(),
            html: serialize(&self.instructions),
            public: self.public,
        });
    }

    // ---- form fields ----

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.persist_draft();
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = Some(category);
        self.persist_draft();
    }

    pub fn public(&self) -> bool {
        self.public
    }

    pub fn set_public(&mut self, public: bool) {
        self.public = public;
        self.persist_draft();
    }

    pub fn set_available_stitches(&mut self, stitches: Vec<Stitch>) {
        self.available_stitches = stitches;
    }

    // ---- materials ----

    pub fn materials(&self) -> &str {
        &self.materials
    }

    pub fn set_materials(&mut self, materials: impl Into<String>) {
        self.materials = materials.into();
        self.persist_draft();
    }

    /// Focusing an empty materials field starts the numbered list
    pub fn focus_materials(&mut self) {
        if self.materials.trim().is_empty() {
            self.materials = "1. ".to_string();
            self.persist_draft();
        }
    }

    /// Enter in the materials field continues the numbering
    pub fn materials_newline(&mut self) {
        let next = self.materials.lines().count() + 1;
        self.materials.push_str(&format!("\n{next}. "));
        self.persist_draft();
    }

    // ---- project images ----

    pub fn project_images(&self) -> &[String] {
        &self.project_images
    }

    /// Upload a batch of project photos. The whole batch is rejected when it
    /// would push the pattern past the image cap; nothing is uploaded then.
    pub async fn upload_project_images(&mut self, files: &[Vec<u8>]) -> EditorResult<()> {
        if self.project_images.len() + files.len() > MAX_PROJECT_IMAGES {
            return Err(EditorError::TooManyImages);
        }
        let mut uploaded = Vec::with_capacity(files.len());
        for file in files {
            uploaded.push(self.image_host.upload(file).await?);
        }
        self.project_images.extend(uploaded);
        self.persist_draft();
        Ok(())
    }

    pub fn remove_project_image(&mut self, index: usize) {
        if index < self.project_images.len() {
            self.project_images.remove(index);
            self.persist_draft();
        }
    }

    // ---- instructions surface ----

    pub fn instructions(&self) -> &Fragment {
        &self.instructions
    }

    pub fn instructions_markup(&self) -> String {
        serialize(&self.instructions)
    }

    pub fn set_caret(&mut self, caret: Option<Caret>) {
        self.caret = caret;
    }

    pub fn set_selection_active(&mut self, active: bool) {
        self.selection_active = active;
        self.toolbar.on_selection_change(active);
    }

    pub fn on_editor_focus(&mut self) {
        self.toolbar.on_editor_focus();
    }

    pub fn on_editor_blur(&mut self) {
        self.toolbar.on_editor_blur();
    }

    pub fn on_toolbar_mouse_down(&mut self) {
        self.toolbar.on_toolbar_mouse_down();
    }

    pub fn on_toolbar_mouse_up(&mut self) {
        self.toolbar.on_toolbar_mouse_up();
    }

    pub fn toolbar_visible(&self) -> bool {
        self.toolbar.is_visible()
    }

    /// Dispatch a formatting command to the surface. Without an active
    /// selection this is a no-op and reports `false`.
    pub fn toggle_format(
        &mut self,
        command: FormatCommand,
        surface: &mut dyn RichTextSurface,
    ) -> bool {
        if !self.selection_active {
            return false;
        }
        surface.apply(command);
        true
    }

    /// Pasted content keeps its text and loses its formatting
    pub fn paste(&mut self, clipboard: &str) {
        let text = if clipboard.contains('<') {
            parse_with_key(clipboard, EDITOR_KEY)
                .map(|fragment| fragment.visible_text())
                .unwrap_or_else(|_| clipboard.to_string())
        } else {
            clipboard.to_string()
        };
        let at = self
            .caret
            .clone()
            .unwrap_or_else(|| Caret::at_end(&self.instructions));
        let mut after = caret::insert_text(&mut self.instructions, &at, &text, &mut self.ids);
        if after.is_none() {
            // stale caret: the tree changed under it, land at the end
            let end = Caret::at_end(&self.instructions);
            after = caret::insert_text(&mut self.instructions, &end, &text, &mut self.ids);
        }
        self.caret = after;
        self.persist_draft();
    }

    /// Insert an inline image at the caret. Without a caret nothing happens.
    pub fn insert_image_at_caret(&mut self, src: &str) -> bool {
        let Some(at) = self.caret.clone() else {
            return false;
        };
        let node = Node::image(src, Span::synthetic(self.ids.new_id()));
        match caret::insert_node(&mut self.instructions, &at, node, &mut self.ids) {
            Some(after) => {
                self.caret = Some(after);
                self.persist_draft();
                true
            }
            None => false,
        }
    }

    /// Insert a stitch reference (plus a trailing space, so typing continues
    /// outside the atom) at the caret. Like image insertion, without a caret
    /// nothing happens.
    pub fn insert_stitch(&mut self, stitch: &Stitch) -> bool {
        let Some(at) = self.caret.clone() else {
            return false;
        };
        let node = Node::stitch_ref(stitch.id, &stitch.name, Span::synthetic(self.ids.new_id()));
        let Some(after) = caret::insert_node(&mut self.instructions, &at, node, &mut self.ids)
        else {
            return false;
        };
        self.caret = caret::insert_text(&mut self.instructions, &after, " ", &mut self.ids);
        self.persist_draft();
        true
    }

    /// Abandon the in-progress form: the draft is cleared and the form
    /// resets to empty
    pub fn cancel(&mut self) {
        self.drafts.clear_pattern();
        self.title.clear();
        self.category = None;
        self.project_images.clear();
        self.materials.clear();
        self.public = false;
        self.instructions = Fragment::new();
        self.caret = None;
        self.selection_active = false;
        self.toolbar = ToolbarState::new();
    }

    // ---- save ----

    /// Validate and persist the pattern. The device cache is updated first,
    /// then the remote write; a remote failure is surfaced after the local
    /// copy is already safe. The draft is cleared only on full success.
    pub async fn save(&mut self) -> EditorResult<Pattern> {
        if self.title.trim().is_empty() {
            return Err(EditorError::MissingTitle);
        }
        let Some(category) = self.category else {
            return Err(EditorError::MissingCategory);
        };
        let Some(identity) = self.session.current() else {
            return Err(EditorError::SignedOut);
        };

        let id = self
            .editing
            .as_ref()
            .map(|p| p.id)
            .unwrap_or_else(|| Utc::now().timestamp_millis());

        let pattern = Pattern {
            id,
            title: self.title.trim().to_string(),
            category,
            images: self.project_images.clone(),
            materials: self.materials.clone(),
            instructions: serialize(&self.instructions),
            stitches: self.available_stitches.clone(),
            public: self.public,
            creator_uid: Some(identity.uid.clone()),
            creator_username: Some(identity.username.clone()),
        };

        let mut mine: Vec<Pattern> = self
            .cache
            .get_record(cache_keys::MY_PATTERNS)
            .unwrap_or_default();
        match mine.iter_mut().find(|p| p.id == pattern.id) {
            Some(slot) => *slot = pattern.clone(),
            None => mine.push(pattern.clone()),
        }
        self.cache.set_record(cache_keys::MY_PATTERNS, &mine);

        let value = serde_json::to_value(&pattern).map_err(yarnbook_store::StoreError::from)?;
        if let Err(err) = self
            .store
            .set(&paths::user_pattern(&identity.uid, id), value)
            .await
        {
            tracing::warn!(pattern_id = id, error = %err, "remote pattern save failed");
            return Err(err.into());
        }

        self.drafts.clear_pattern();
        self.editing = Some(pattern.clone());
        Ok(pattern)
    }
}
