//! Storage collaborator for lexicon data
//!
//! The merge engine never persists anything itself. It reads duplicate groups
//! from, and submits finished plans to, a [`LexiconStore`].

mod file;

pub use file::FileStore;

use crate::error::Result;
use crate::merge::MergeInstruction;
use crate::types::{WordGroup, WordId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Ids needed to reverse a completed merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeUndoIds {
    /// Words created by the merge
    pub parent_ids: Vec<WordId>,
    /// Words consumed (or deleted) by the merge
    pub child_ids: Vec<WordId>,
}

/// Store trait for lexicon operations
///
/// Implementations decide how words and exclusion lists are kept; callers
/// await each call in sequence and never issue two at once for a session.
#[async_trait]
pub trait LexiconStore: Send + Sync {
    /// Find up to `max_groups` duplicate groups among the frontier words.
    ///
    /// `strictness` replaces the finder's loose threshold when given.
    async fn fetch_duplicate_groups(
        &self,
        max_groups: usize,
        strictness: Option<f64>,
    ) -> Result<Vec<WordGroup>>;

    /// Whether the exact id set is blacklisted or graylisted
    async fn check_excluded(&self, word_ids: &[WordId]) -> Result<bool>;

    /// Permanently exclude an id set from duplicate suggestions
    async fn add_excluded(&self, word_ids: &[WordId]) -> Result<()>;

    /// Defer an id set until it is reviewed again
    async fn add_deferred(&self, word_ids: &[WordId]) -> Result<()>;

    /// Apply a batch of merge instructions.
    ///
    /// Returns one new word id per instruction that is not delete-only, in
    /// instruction order.
    async fn submit_merges(&self, plan: &[MergeInstruction]) -> Result<Vec<WordId>>;

    /// Move a word's pronunciations onto another word
    async fn transfer_audio(&self, from_word: &str, to_word: &str) -> Result<()>;

    /// Remove a word's pronunciations
    async fn delete_audio(&self, word_id: &str) -> Result<()>;

    /// Reverse a completed merge. Returns `false` if it can no longer be undone.
    async fn undo_merge(&self, ids: &MergeUndoIds) -> Result<bool>;
}
