//! Small shared pieces used by more than one yarnbook crate.

pub mod pager;

pub use pager::Pager;
