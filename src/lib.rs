//! lexmerge - duplicate detection and merge planning for collaborative lexicons
//!
//! The crate finds groups of likely-duplicate words, lets a caller refine an
//! in-memory merge tree for one group, compiles that tree into merge
//! instructions, and submits them to a storage collaborator.
//!
//! Data flows one way:
//! word snapshot -> [`duplicates`] -> [`tree`] (edited through its operations)
//! -> [`merge::compile_plan`] -> [`merge::submit_session`] -> [`store`].

pub mod config;
pub mod duplicates;
pub mod error;
pub mod exclusion;
pub mod goal;
pub mod merge;
pub mod progress;
pub mod store;
pub mod tree;
pub mod types;
