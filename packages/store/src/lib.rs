//! Storage layer for the pattern catalog: shared record types, the remote
//! store / device cache / image host contracts, and in-memory implementations
//! for tests and offline use.

pub mod adapter;
pub mod error;
pub mod memory;
pub mod paths;
pub mod records;

pub use adapter::{
    DeviceCache, DeviceCacheExt, ImageHost, SessionProvider, StoreAdapter, Subscription,
};
pub use error::{StoreError, StoreResult};
pub use memory::{FixedSession, MemoryCache, MemoryImageHost, MemoryStore};
pub use records::{
    Category, Pattern, PatternDraft, Session, Stitch, StitchDraft, MAX_PROJECT_IMAGES,
};
