//! Hierarchical key paths for the remote document store, scoped per user.
//! The layout mirrors the original deployment: per-user pattern and stitch
//! collections, a username directory, and a liked-set per user.

/// All patterns of one user
pub fn user_patterns(uid: &str) -> String {
    format!("userPatterns/{uid}")
}

/// One pattern of one user
pub fn user_pattern(uid: &str, id: i64) -> String {
    format!("userPatterns/{uid}/{id}")
}

/// Root of every user's pattern collection (for the public subscription)
pub const ALL_PATTERNS: &str = "userPatterns";

/// All stitches of one user
pub fn user_stitches(uid: &str) -> String {
    format!("userStitches/{uid}")
}

/// One stitch of one user
pub fn user_stitch(uid: &str, id: i64) -> String {
    format!("userStitches/{uid}/{id}")
}

/// Username directory: `{uid: {username, ...}}`
pub const USERS: &str = "users";

/// Liked pattern ids of one user
pub fn liked_patterns(uid: &str) -> String {
    format!("users/{uid}/likedPatterns")
}

/// Device-cache keys. These are flat [`crate::DeviceCache`] keys, not remote
/// paths; the names are kept from the original deployment so migrated devices
/// pick up their cached data.
pub mod cache_keys {
    /// Unsaved pattern-editor form state
    pub const PATTERN_DRAFT: &str = "patternEditorDraft";
    /// Unsaved stitch-manager form state
    pub const STITCH_DRAFT: &str = "stitchManagerDraftData";
    /// Whether the stitch-manager panel was left open
    pub const STITCH_PANEL_OPEN: &str = "stitchManagerDraftOpen";
    /// Mirror of the user's own patterns, the fallback when remote reads fail
    pub const MY_PATTERNS: &str = "myPatterns";
    /// Mirror of the user's liked pattern ids
    pub const LIKED_PATTERNS: &str = "likedPatterns";
}
