//! The "Merge Duplicates" cleanup goal
//!
//! A goal walks a list of duplicate groups one merge session at a time and
//! keeps a log of completed merges so they can be audited or undone.

use crate::error::{Error, Result};
use crate::store::{LexiconStore, MergeUndoIds};
use crate::types::{WordGroup, WordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Record of one submitted session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergesCompleted {
    /// Words created by the merge
    pub parent_ids: Vec<WordId>,
    /// Words consumed or deleted by the merge
    pub child_ids: Vec<WordId>,
    /// When the submission finished
    pub completed_at: DateTime<Utc>,
    /// Whether the merge was reversed later
    #[serde(default)]
    pub undone: bool,
}

impl MergesCompleted {
    /// Ids for reversing this merge
    pub fn undo_ids(&self) -> MergeUndoIds {
        MergeUndoIds {
            parent_ids: self.parent_ids.clone(),
            child_ids: self.child_ids.clone(),
        }
    }
}

/// Progress through a list of duplicate groups
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MergeDupsGoal {
    /// Groups to review, in suggestion order
    pub groups: Vec<WordGroup>,
    /// Index of the next group to hand out
    pub current: usize,
    /// Completed merges, oldest first
    pub completed: Vec<MergesCompleted>,
}

impl MergeDupsGoal {
    /// Start a goal over the given groups
    pub const fn new(groups: Vec<WordGroup>) -> Self {
        Self {
            groups,
            current: 0,
            completed: Vec::new(),
        }
    }

    /// Whether every group has been handed out
    pub fn is_finished(&self) -> bool {
        self.current >= self.groups.len()
    }

    /// Hand out the next group that is still eligible.
    ///
    /// Groups excluded since they were fetched (say, by another session) are
    /// skipped.
    pub async fn next_group(&mut self, store: &dyn LexiconStore) -> Result<Option<WordGroup>> {
        while let Some(group) = self.groups.get(self.current) {
            self.current += 1;
            if store.check_excluded(&group.ids()).await? {
                debug!(ids = ?group.ids(), "group excluded since fetch, skipping");
                continue;
            }
            return Ok(Some(group.clone()));
        }
        Ok(None)
    }

    /// Log a completed merge
    pub fn record(&mut self, parent_ids: Vec<WordId>, child_ids: Vec<WordId>) {
        self.completed.push(MergesCompleted {
            parent_ids,
            child_ids,
            completed_at: Utc::now(),
            undone: false,
        });
    }

    /// Look up a completed merge that can still be undone
    pub fn undoable(&self, index: usize) -> Result<&MergesCompleted> {
        match self.completed.get(index) {
            Some(entry) if !entry.undone => Ok(entry),
            Some(_) => Err(Error::InvalidReference(format!(
                "merge {index} was already undone"
            ))),
            None => Err(Error::InvalidReference(format!("no completed merge {index}"))),
        }
    }
}
