//! Merge execution - effectful operations
//!
//! This module contains the effectful code that submits a session. It takes a
//! `MergePlan` (created by the pure compiler) and drives the store through
//! the calls below, one at a time:
//! 1. exclude the session's word set from future suggestions
//! 2. submit the merge and delete instructions as one batch
//! 3. record the completed merge against the goal
//!
//! Audio transfers follow once the merge is on record.

use crate::error::{Error, Result};
use crate::goal::MergeDupsGoal;
use crate::merge::plan::MergePlan;
use crate::progress::ProgressCallback;
use crate::store::LexiconStore;
use crate::tree::MergeTree;
use crate::types::WordId;
use tracing::info;

/// Result of merge execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeExecutionResult {
    /// Word set added to the blacklist
    pub excluded_ids: Vec<WordId>,
    /// New words created by the store, one per content merge
    pub parent_ids: Vec<WordId>,
    /// Words consumed or deleted
    pub child_ids: Vec<WordId>,
    /// Number of audio transfers requested
    pub audio_transfers: usize,
    /// Number of audio deletions requested
    pub audio_deletions: usize,
}

impl MergeExecutionResult {
    /// Check if the store changed any words
    #[must_use]
    pub fn has_merges(&self) -> bool {
        !self.parent_ids.is_empty() || !self.child_ids.is_empty()
    }
}

/// Exclude the session's words and submit the plan (EFFECTFUL)
///
/// Stops at the first failing call. Nothing is recorded here, so a failure
/// can be retried with the same plan.
///
/// # Arguments
/// * `plan` - The compiled plan
/// * `session_ids` - Every word id the session was opened with
/// * `store` - Store for exclusion and merge calls
/// * `progress` - Progress callback for status updates
pub async fn execute_merge(
    plan: &MergePlan,
    session_ids: &[WordId],
    store: &dyn LexiconStore,
    progress: &dyn ProgressCallback,
) -> Result<MergeExecutionResult> {
    let mut result = MergeExecutionResult::default();

    if session_ids.len() > 1 {
        progress
            .on_message(&format!("Excluding {} word(s) from future suggestions", session_ids.len()))
            .await;
        store.add_excluded(session_ids).await?;
        result.excluded_ids = session_ids.to_vec();
    }

    if plan.is_empty() {
        progress.on_message("Nothing to merge").await;
        return Ok(result);
    }

    progress
        .on_message(&format!(
            "Submitting {} merge(s) and {} deletion(s)",
            plan.merge_count(),
            plan.delete_count()
        ))
        .await;
    let parent_ids = store.submit_merges(&plan.instructions).await?;
    if parent_ids.len() != plan.merge_count() {
        return Err(Error::Store(format!(
            "expected {} new word id(s), store returned {}",
            plan.merge_count(),
            parent_ids.len()
        )));
    }

    for id in plan.instructions.iter().flat_map(|i| i.child_ids()) {
        if !result.child_ids.contains(id) {
            result.child_ids.push(id.clone());
        }
    }
    result.parent_ids = parent_ids;
    info!(
        merged = result.parent_ids.len(),
        consumed = result.child_ids.len(),
        "merge submitted"
    );
    Ok(result)
}

/// Move or drop audio for a submitted plan (EFFECTFUL)
///
/// Children flagged `get_audio` (other than the parent's own word) hand their
/// recordings to the new word; deleted words with recordings lose them.
pub async fn transfer_merged_audio(
    plan: &MergePlan,
    result: &mut MergeExecutionResult,
    store: &dyn LexiconStore,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let merges = plan.instructions.iter().filter(|i| !i.delete_only);
    for (instruction, new_id) in merges.zip(&result.parent_ids) {
        for child in &instruction.children {
            if !child.get_audio || child.src_word_id == instruction.parent.id {
                continue;
            }
            store.transfer_audio(&child.src_word_id, new_id).await?;
            result.audio_transfers += 1;
        }
    }

    for instruction in plan.instructions.iter().filter(|i| i.delete_only) {
        if instruction.parent.audio.is_empty() {
            continue;
        }
        store.delete_audio(&instruction.parent.id).await?;
        result.audio_deletions += 1;
    }

    if result.audio_transfers + result.audio_deletions > 0 {
        progress
            .on_message(&format!(
                "Moved audio from {} word(s), removed audio of {} word(s)",
                result.audio_transfers, result.audio_deletions
            ))
            .await;
    }
    Ok(())
}

/// Submit a merge session end to end (EFFECTFUL)
///
/// On success the merge is recorded against `goal` and the tree is reset. If
/// exclusion or submission fails, neither the tree nor the goal is touched
/// and the caller may retry.
pub async fn submit_session(
    tree: &mut MergeTree,
    goal: &mut MergeDupsGoal,
    store: &dyn LexiconStore,
    progress: &dyn ProgressCallback,
) -> Result<MergeExecutionResult> {
    let plan = tree.compile_plan();
    let session_ids = tree.data().word_ids().to_vec();

    let mut result = execute_merge(&plan, &session_ids, store, progress).await?;
    if result.has_merges() {
        goal.record(result.parent_ids.clone(), result.child_ids.clone());
    }
    tree.reset();

    transfer_merged_audio(&plan, &mut result, store, progress).await?;
    Ok(result)
}

/// Put the session's group aside for later review and discard the tree
pub async fn defer_session(
    tree: &mut MergeTree,
    store: &dyn LexiconStore,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    let session_ids = tree.data().word_ids().to_vec();
    if session_ids.len() > 1 {
        store.add_deferred(&session_ids).await?;
        progress
            .on_message(&format!("Deferred {} word(s) for later review", session_ids.len()))
            .await;
    }
    tree.reset();
    Ok(())
}

/// Reverse a completed merge from the goal's log
///
/// Returns `false` when the store reports the merge can no longer be undone.
pub async fn undo_merge(
    goal: &mut MergeDupsGoal,
    index: usize,
    store: &dyn LexiconStore,
) -> Result<bool> {
    let ids = goal.undoable(index)?.undo_ids();
    if !store.undo_merge(&ids).await? {
        return Ok(false);
    }
    goal.completed[index].undone = true;
    info!(index, parents = ?ids.parent_ids, "merge undone");
    Ok(true)
}
