//! Permanent (blacklist) and temporary (graylist) exclusion of word groups
//!
//! A group of word ids is excluded when an entry holds exactly the same set
//! of ids. Adding or dropping a single word makes the group eligible again.

mod storage;

pub use storage::{exclusions_path, load_exclusions, save_exclusions};

use crate::types::WordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Current on-disk format version
pub const EXCLUSIONS_VERSION: u32 = 1;

/// One excluded set of word ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionEntry {
    /// Sorted, de-duplicated word ids
    pub word_ids: Vec<WordId>,
    /// When the entry was added
    pub added_at: DateTime<Utc>,
}

impl ExclusionEntry {
    /// Create an entry, normalizing the id set
    pub fn new(word_ids: &[WordId]) -> Self {
        Self {
            word_ids: normalize(word_ids),
            added_at: Utc::now(),
        }
    }

    /// Whether this entry holds exactly the given id set
    pub fn matches(&self, normalized: &[WordId]) -> bool {
        self.word_ids == normalized
    }
}

/// Both exclusion lists for one lexicon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionLists {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Groups rejected as non-duplicates for good
    #[serde(default)]
    pub blacklist: Vec<ExclusionEntry>,
    /// Groups deferred for later review
    #[serde(default)]
    pub graylist: Vec<ExclusionEntry>,
}

const fn default_version() -> u32 {
    EXCLUSIONS_VERSION
}

impl Default for ExclusionLists {
    fn default() -> Self {
        Self::new()
    }
}

impl ExclusionLists {
    /// Empty lists
    pub const fn new() -> Self {
        Self {
            version: EXCLUSIONS_VERSION,
            blacklist: Vec::new(),
            graylist: Vec::new(),
        }
    }

    /// Whether the exact set is on the blacklist
    pub fn is_blacklisted(&self, word_ids: &[WordId]) -> bool {
        let ids = normalize(word_ids);
        self.blacklist.iter().any(|e| e.matches(&ids))
    }

    /// Whether the exact set is on the graylist
    pub fn is_graylisted(&self, word_ids: &[WordId]) -> bool {
        let ids = normalize(word_ids);
        self.graylist.iter().any(|e| e.matches(&ids))
    }

    /// Whether the exact set is on either list
    pub fn is_excluded(&self, word_ids: &[WordId]) -> bool {
        self.is_blacklisted(word_ids) || self.is_graylisted(word_ids)
    }

    /// Blacklist a set. Returns `false` if nothing changed.
    ///
    /// Sets with fewer than two distinct ids are ignored. A matching graylist
    /// entry is removed since the decision is now permanent.
    pub fn add_blacklist(&mut self, word_ids: &[WordId]) -> bool {
        let ids = normalize(word_ids);
        if ids.len() < 2 {
            return false;
        }
        self.graylist.retain(|e| !e.matches(&ids));
        if self.blacklist.iter().any(|e| e.matches(&ids)) {
            return false;
        }
        debug!(ids = ?ids, "blacklisting word set");
        self.blacklist.push(ExclusionEntry::new(&ids));
        true
    }

    /// Graylist a set. Returns `false` if nothing changed.
    ///
    /// Sets already blacklisted are not graylisted.
    pub fn add_graylist(&mut self, word_ids: &[WordId]) -> bool {
        let ids = normalize(word_ids);
        if ids.len() < 2 || self.is_excluded(&ids) {
            return false;
        }
        debug!(ids = ?ids, "graylisting word set");
        self.graylist.push(ExclusionEntry::new(&ids));
        true
    }

    /// Remove a set from the graylist so it is suggested again
    pub fn remove_graylist(&mut self, word_ids: &[WordId]) -> bool {
        let ids = normalize(word_ids);
        let before = self.graylist.len();
        self.graylist.retain(|e| !e.matches(&ids));
        before != self.graylist.len()
    }

    /// Deferred groups, oldest first
    pub fn deferred_groups(&self) -> Vec<Vec<WordId>> {
        self.graylist.iter().map(|e| e.word_ids.clone()).collect()
    }

    /// Drop entries that mention a word no longer on the frontier.
    ///
    /// Returns the number of entries removed.
    pub fn prune<'a, I>(&mut self, frontier_ids: I) -> usize
    where
        I: IntoIterator<Item = &'a WordId>,
    {
        let frontier: HashSet<&WordId> = frontier_ids.into_iter().collect();
        let before = self.blacklist.len() + self.graylist.len();
        let live = |e: &ExclusionEntry| e.word_ids.iter().all(|id| frontier.contains(id));
        self.blacklist.retain(live);
        self.graylist.retain(live);
        let removed = before - (self.blacklist.len() + self.graylist.len());
        if removed > 0 {
            debug!(removed, "pruned stale exclusion entries");
        }
        removed
    }
}

fn normalize(word_ids: &[WordId]) -> Vec<WordId> {
    let mut ids = word_ids.to_vec();
    ids.sort();
    ids.dedup();
    ids
}
