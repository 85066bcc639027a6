//! Merge planning - pure functions for compiling a merge tree
//!
//! This module turns the current state of a [`MergeTree`] into the merge and
//! delete instructions the store understands. No I/O happens here and the
//! tree is never modified, so a plan can be rebuilt at any time.

use crate::tree::{MergeTree, MergeTreeSense, MergeTreeWord};
use crate::types::{Definition, GramCatGroup, Sense, Status, Word, WordId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Separator between definition texts folded from duplicates
pub const DEFINITION_SEPARATOR: &str = ";";

/// A word feeding into a merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSourceWord {
    /// Source word id
    pub src_word_id: WordId,
    /// Whether the merged word takes this word's audio
    pub get_audio: bool,
}

impl MergeSourceWord {
    /// Create a source entry
    pub fn new(src_word_id: &str, get_audio: bool) -> Self {
        Self {
            src_word_id: src_word_id.to_string(),
            get_audio,
        }
    }
}

/// One instruction for the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeInstruction {
    /// The output word (or, for a delete, the word being removed)
    pub parent: Word,
    /// Words consumed by the merge
    pub children: Vec<MergeSourceWord>,
    /// Remove `parent` without creating anything
    pub delete_only: bool,
}

impl MergeInstruction {
    /// Ids of the children
    pub fn child_ids(&self) -> impl Iterator<Item = &WordId> {
        self.children.iter().map(|c| &c.src_word_id)
    }
}

impl std::fmt::Display for MergeInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.delete_only {
            return write!(f, "delete {} ({})", self.parent.vernacular, self.parent.id);
        }
        let target = if self.parent.id.is_empty() {
            "new word"
        } else {
            self.parent.id.as_str()
        };
        write!(
            f,
            "merge into {} ({target}): {} sense(s) from {}",
            self.parent.vernacular,
            self.parent.senses.len(),
            self.children
                .iter()
                .map(|c| c.src_word_id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// Compiled plan - the functional core output
///
/// Created by [`compile_plan`] (pure) and submitted by
/// [`execute_merge`](super::execute_merge) (effectful).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergePlan {
    /// Instructions in column order, deletions last
    pub instructions: Vec<MergeInstruction>,
}

impl MergePlan {
    /// Check if the plan changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Count content merges
    #[must_use]
    pub fn merge_count(&self) -> usize {
        self.instructions.iter().filter(|i| !i.delete_only).count()
    }

    /// Count delete-only instructions
    #[must_use]
    pub fn delete_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.delete_only).count()
    }

    /// Every word id the plan touches, in first-mention order
    pub fn involved_word_ids(&self) -> Vec<WordId> {
        let mut ids: Vec<WordId> = Vec::new();
        for instruction in &self.instructions {
            let parent = (!instruction.parent.id.is_empty()).then_some(&instruction.parent.id);
            for id in parent.into_iter().chain(instruction.child_ids()) {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        ids
    }
}

/// Compile a merge tree into a plan (PURE - no I/O, easily testable)
///
/// One merge per column that differs from its original word, followed by a
/// delete-only instruction for every snapshot word whose senses were all
/// deleted.
///
/// # Panics
/// If the tree references a sense missing from its own snapshot.
#[must_use]
pub fn compile_plan(tree: &MergeTree) -> MergePlan {
    let mut instructions: Vec<MergeInstruction> = tree
        .columns()
        .iter()
        .filter_map(|column| compile_column(tree, column))
        .collect();

    let consumed: Vec<WordId> = instructions
        .iter()
        .flat_map(MergeInstruction::child_ids)
        .cloned()
        .collect();
    for id in tree.data().word_ids() {
        if tree.column(id).is_some() || consumed.contains(id) {
            continue;
        }
        // A word that brought no senses never had a column to delete
        if !tree.data().has_senses_from(id) {
            continue;
        }
        if let Some(word) = tree.data().word(id) {
            instructions.push(MergeInstruction {
                parent: word.clone(),
                children: vec![MergeSourceWord::new(id, false)],
                delete_only: true,
            });
        }
    }

    MergePlan { instructions }
}

impl MergeTree {
    /// Compile the current state into a plan
    #[must_use]
    pub fn compile_plan(&self) -> MergePlan {
        compile_plan(self)
    }
}

fn snapshot_sense<'a>(tree: &'a MergeTree, guid: &str) -> &'a MergeTreeSense {
    tree.sense(guid)
        .unwrap_or_else(|| panic!("merge tree references sense {guid} missing from snapshot"))
}

/// Statuses of one source word's senses as seen from a single column
struct Contribution {
    word_id: WordId,
    statuses: Vec<Status>,
}

fn compile_column(tree: &MergeTree, column: &MergeTreeWord) -> Option<MergeInstruction> {
    let mut contributions: Vec<Contribution> = Vec::new();

    // Every sense of a contributing word starts out Separate (or Deleted);
    // the ones sitting in this column are overwritten below.
    for guid in column.guids() {
        let src = &snapshot_sense(tree, guid).src_word_id;
        if contributions.iter().any(|c| &c.word_id == src) {
            continue;
        }
        let word = tree
            .data()
            .word(src)
            .unwrap_or_else(|| panic!("sense {guid} belongs to unknown word {src}"));
        let statuses = word
            .senses
            .iter()
            .map(|s| {
                if tree.deleted_sense_guids().contains(&s.guid) {
                    Status::Deleted
                } else {
                    Status::Separate
                }
            })
            .collect();
        contributions.push(Contribution {
            word_id: src.clone(),
            statuses,
        });
    }
    let index: HashMap<WordId, usize> = contributions
        .iter()
        .enumerate()
        .map(|(i, c)| (c.word_id.clone(), i))
        .collect();

    let mut senses = Vec::with_capacity(column.slots.len());
    let mut mark = |data: &MergeTreeSense, status: Status| {
        let ci = index[&data.src_word_id];
        if let Some(s) = contributions[ci].statuses.get_mut(data.order) {
            *s = status;
        }
    };
    for slot in &column.slots {
        let mut slot_senses = slot.guids.iter().map(|g| snapshot_sense(tree, g));
        let Some(first) = slot_senses.next() else {
            continue;
        };
        let kept_status = if first.protected {
            Status::Protected
        } else {
            Status::Active
        };
        mark(first, kept_status);
        let mut kept = first.sense.clone();
        kept.accessibility = kept_status;
        for dup in slot_senses {
            mark(dup, Status::Duplicate);
            fold_duplicate(&mut kept, &dup.sense);
        }
        senses.push(kept);
    }

    let original = tree.data().word(&column.id);
    let moved_here: &[WordId] = tree
        .audio_moves()
        .get(&column.id)
        .map_or(&[], Vec::as_slice);

    if let Some(word) = original {
        if is_unchanged(word, column, &contributions, &senses, moved_here) {
            return None;
        }
    }

    let mut children: Vec<MergeSourceWord> = contributions
        .iter()
        .map(|c| MergeSourceWord {
            src_word_id: c.word_id.clone(),
            get_audio: gets_audio(tree, column, c),
        })
        .collect();
    for id in moved_here {
        if !children.iter().any(|c| &c.src_word_id == id) {
            children.push(MergeSourceWord::new(id, true));
        }
    }

    let mut parent = original.cloned().unwrap_or_default();
    parent.senses = senses;
    parent.vernacular.clone_from(&column.vern);
    parent.flag = column.flag.clone();

    Some(MergeInstruction {
        parent,
        children,
        delete_only: false,
    })
}

fn is_unchanged(
    word: &Word,
    column: &MergeTreeWord,
    contributions: &[Contribution],
    senses: &[Sense],
    moved_here: &[WordId],
) -> bool {
    let sole_self = matches!(contributions, [only] if only.word_id == word.id);
    sole_self
        && moved_here.is_empty()
        && column.vern == word.vernacular
        && column.flag.same_as(&word.flag)
        && senses.len() == word.senses.len()
        && senses.iter().zip(&word.senses).all(|(a, b)| a.guid == b.guid)
}

/// Whether a contributing word's audio goes to this column
fn gets_audio(tree: &MergeTree, column: &MergeTreeWord, c: &Contribution) -> bool {
    let moves = tree.audio_moves();
    if moves
        .get(&column.id)
        .is_some_and(|ids| ids.contains(&c.word_id))
    {
        return true;
    }
    if moves.values().any(|ids| ids.contains(&c.word_id)) {
        return false;
    }
    if c.word_id == column.id {
        return true;
    }
    !c.statuses.contains(&Status::Separate)
}

/// Fold a duplicate sense into the kept one
///
/// Definitions and domains are unioned; an unspecified part of speech is
/// taken from the duplicate.
pub fn fold_duplicate(kept: &mut Sense, dup: &Sense) {
    for def in &dup.definitions {
        merge_definition_into_sense(kept, def);
    }
    if kept.grammatical_info.cat_group == GramCatGroup::Unspecified {
        kept.grammatical_info = dup.grammatical_info.clone();
    }
    for domain in &dup.semantic_domains {
        if !kept.semantic_domains.iter().any(|d| d.id == domain.id) {
            kept.semantic_domains.push(domain.clone());
        }
    }
}

/// Merge one definition into a sense.
///
/// A new language is appended. For a known language the text is joined with
/// [`DEFINITION_SEPARATOR`] unless it is already one of the joined parts.
pub fn merge_definition_into_sense(sense: &mut Sense, def: &Definition) {
    if def.text.is_empty() {
        return;
    }
    let Some(existing) = sense
        .definitions
        .iter_mut()
        .find(|d| d.language == def.language)
    else {
        sense.definitions.push(def.clone());
        return;
    };
    if existing.text.is_empty() {
        existing.text.clone_from(&def.text);
    } else if !existing
        .text
        .split(DEFINITION_SEPARATOR)
        .any(|part| part == def.text)
    {
        existing.text = format!("{}{DEFINITION_SEPARATOR}{}", existing.text, def.text);
    }
}
