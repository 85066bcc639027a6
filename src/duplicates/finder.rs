//! Duplicate clustering
//!
//! Every frontier word acts once as an anchor: the words scoring within the
//! threshold against it form a candidate group. Candidates are ranked by
//! mean score and handed out greedily so that no word lands in two groups.

use super::score::word_score;
use crate::exclusion::ExclusionLists;
use crate::types::{Word, WordGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Tuning for the duplicate finder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Default number of groups per invocation
    pub max_groups: usize,
    /// Largest group size, anchor included
    pub max_in_group: usize,
    /// Threshold of the first, precision-first pass
    pub tight_threshold: f64,
    /// Threshold of the fallback pass
    pub loose_threshold: f64,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            max_groups: 8,
            max_in_group: 5,
            tight_threshold: 0.0,
            loose_threshold: 3.0,
        }
    }
}

/// Candidate group before de-duplication across groups
struct Candidate<'a> {
    anchor: usize,
    score: f64,
    members: Vec<&'a Word>,
}

/// Clusters a word list into candidate duplicate groups
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a finder with the given tuning
    pub const fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// The finder's tuning
    pub const fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find up to `max_groups` duplicate groups, most likely first.
    ///
    /// Runs the tight pass first; only if it yields nothing does the loose
    /// pass run. `strictness`, when given, replaces the loose threshold.
    /// Groups whose exact id set is on either exclusion list are skipped.
    pub fn find(
        &self,
        words: &[Word],
        exclusions: &ExclusionLists,
        max_groups: usize,
        strictness: Option<f64>,
    ) -> Vec<WordGroup> {
        let tight = self.find_with_threshold(
            words,
            exclusions,
            max_groups,
            self.config.tight_threshold,
        );
        if !tight.is_empty() {
            debug!(groups = tight.len(), "tight pass found duplicates");
            return tight;
        }

        let loose_threshold = strictness.unwrap_or(self.config.loose_threshold);
        let loose = self.find_with_threshold(words, exclusions, max_groups, loose_threshold);
        debug!(
            groups = loose.len(),
            threshold = loose_threshold,
            "loose pass finished"
        );
        loose
    }

    /// Run a single clustering pass at a fixed threshold
    pub fn find_with_threshold(
        &self,
        words: &[Word],
        exclusions: &ExclusionLists,
        max_groups: usize,
        threshold: f64,
    ) -> Vec<WordGroup> {
        if max_groups == 0 {
            return Vec::new();
        }

        let frontier: Vec<&Word> = words.iter().filter(|w| w.is_frontier()).collect();
        let mut candidates = self.candidates(&frontier, threshold);
        candidates.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.anchor.cmp(&b.anchor)));

        let mut used: HashSet<&str> = HashSet::new();
        let mut groups = Vec::new();
        for candidate in candidates {
            let members: Vec<&Word> = candidate
                .members
                .into_iter()
                .filter(|w| !used.contains(w.id.as_str()))
                .collect();
            if members.len() < 2 {
                continue;
            }

            let ids: Vec<String> = members.iter().map(|w| w.id.clone()).collect();
            if exclusions.is_excluded(&ids) {
                debug!(ids = ?ids, "skipping excluded group");
                continue;
            }

            used.extend(members.iter().map(|w| w.id.as_str()));
            groups.push(WordGroup {
                words: members.into_iter().cloned().collect(),
                score: candidate.score,
            });
            if groups.len() >= max_groups {
                break;
            }
        }
        groups
    }

    fn candidates<'a>(&self, frontier: &[&'a Word], threshold: f64) -> Vec<Candidate<'a>> {
        let max_others = self.config.max_in_group.max(2) - 1;
        let mut candidates = Vec::new();

        for (i, word) in frontier.iter().enumerate() {
            let mut similar: Vec<(f64, usize)> = frontier
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .filter_map(|(j, other)| word_score(word, other, threshold).map(|s| (s, j)))
                .collect();
            if similar.is_empty() {
                continue;
            }
            similar.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            similar.truncate(max_others);

            #[allow(clippy::cast_precision_loss)]
            let score = similar.iter().map(|(s, _)| s).sum::<f64>() / similar.len() as f64;
            let mut members = vec![*word];
            members.extend(similar.iter().map(|(_, j)| frontier[*j]));
            candidates.push(Candidate {
                anchor: i,
                score,
                members,
            });
        }
        candidates
    }
}
