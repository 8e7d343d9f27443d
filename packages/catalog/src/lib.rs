//! Catalog and listing logic: the user's own patterns, the live public
//! catalog with search, category filter and paging, and the liked-patterns
//! set.

pub mod error;
pub mod filter;
pub mod likes;
pub mod listing;

pub use error::{CatalogError, CatalogResult};
pub use filter::{apply_filters, dedup_by_id, recent, PATTERNS_PER_PAGE, RECENT_COUNT};
pub use likes::{LikedPatterns, TOAST_LIKED, TOAST_UNLIKED};
pub use listing::{
    patterns_from_all_users, patterns_from_user_map, public_patterns_from_snapshot, Catalog,
};
