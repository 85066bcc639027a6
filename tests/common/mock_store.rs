//! Mock lexicon store for testing

use async_trait::async_trait;
use lexmerge::error::{Error, Result};
use lexmerge::merge::MergeInstruction;
use lexmerge::store::{LexiconStore, MergeUndoIds};
use lexmerge::types::{WordGroup, WordId};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Simple mock store for testing
///
/// Features:
/// - Auto-incrementing ids for merged words ("new-1", "new-2", ...)
/// - Call tracking, including the order of calls across methods
/// - Configurable duplicate groups and exclusion answers
/// - Error injection for failure path testing
pub struct MockStore {
    next_id: AtomicU64,
    groups: Mutex<Vec<WordGroup>>,
    excluded_sets: Mutex<Vec<Vec<WordId>>>,
    undo_response: Mutex<bool>,
    id_override: Mutex<Option<Vec<WordId>>>,
    // Call tracking
    call_log: Mutex<Vec<&'static str>>,
    fetch_calls: Mutex<Vec<(usize, Option<f64>)>>,
    add_excluded_calls: Mutex<Vec<Vec<WordId>>>,
    add_deferred_calls: Mutex<Vec<Vec<WordId>>>,
    submit_calls: Mutex<Vec<Vec<MergeInstruction>>>,
    transfer_audio_calls: Mutex<Vec<(WordId, WordId)>>,
    delete_audio_calls: Mutex<Vec<WordId>>,
    undo_calls: Mutex<Vec<MergeUndoIds>>,
    // Error injection
    error_on_fetch: Mutex<Option<String>>,
    error_on_add_excluded: Mutex<Option<String>>,
    error_on_submit: Mutex<Option<String>>,
    error_on_transfer_audio: Mutex<Option<String>>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted(ids: &[WordId]) -> Vec<WordId> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    ids
}

fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
    match slot.lock().unwrap().as_ref() {
        Some(msg) => Err(Error::Store(msg.clone())),
        None => Ok(()),
    }
}

impl MockStore {
    /// Create an empty mock
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            groups: Mutex::new(Vec::new()),
            excluded_sets: Mutex::new(Vec::new()),
            undo_response: Mutex::new(true),
            id_override: Mutex::new(None),
            call_log: Mutex::new(Vec::new()),
            fetch_calls: Mutex::new(Vec::new()),
            add_excluded_calls: Mutex::new(Vec::new()),
            add_deferred_calls: Mutex::new(Vec::new()),
            submit_calls: Mutex::new(Vec::new()),
            transfer_audio_calls: Mutex::new(Vec::new()),
            delete_audio_calls: Mutex::new(Vec::new()),
            undo_calls: Mutex::new(Vec::new()),
            error_on_fetch: Mutex::new(None),
            error_on_add_excluded: Mutex::new(None),
            error_on_submit: Mutex::new(None),
            error_on_transfer_audio: Mutex::new(None),
        }
    }

    // === Response configuration ===

    /// Groups returned by `fetch_duplicate_groups`
    pub fn set_groups(&self, groups: Vec<WordGroup>) {
        *self.groups.lock().unwrap() = groups;
    }

    /// Make `check_excluded` report this set as excluded
    pub fn exclude(&self, ids: &[WordId]) {
        self.excluded_sets.lock().unwrap().push(sorted(ids));
    }

    /// Answer for `undo_merge`
    pub fn set_undo_response(&self, ok: bool) {
        *self.undo_response.lock().unwrap() = ok;
    }

    /// Make `submit_merges` return exactly these ids
    pub fn return_ids(&self, ids: Vec<WordId>) {
        *self.id_override.lock().unwrap() = Some(ids);
    }

    // === Error injection methods ===

    /// Make `fetch_duplicate_groups` return an error
    pub fn fail_fetch(&self, msg: &str) {
        *self.error_on_fetch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_excluded` return an error
    pub fn fail_add_excluded(&self, msg: &str) {
        *self.error_on_add_excluded.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `submit_merges` return an error
    pub fn fail_submit(&self, msg: &str) {
        *self.error_on_submit.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `transfer_audio` return an error
    pub fn fail_transfer_audio(&self, msg: &str) {
        *self.error_on_transfer_audio.lock().unwrap() = Some(msg.to_string());
    }

    // === Call accessors ===

    /// Method names in call order
    pub fn call_log(&self) -> Vec<&'static str> {
        self.call_log.lock().unwrap().clone()
    }

    /// Arguments of every `fetch_duplicate_groups` call
    pub fn fetch_calls(&self) -> Vec<(usize, Option<f64>)> {
        self.fetch_calls.lock().unwrap().clone()
    }

    /// Arguments of every `add_excluded` call
    pub fn add_excluded_calls(&self) -> Vec<Vec<WordId>> {
        self.add_excluded_calls.lock().unwrap().clone()
    }

    /// Arguments of every `add_deferred` call
    pub fn add_deferred_calls(&self) -> Vec<Vec<WordId>> {
        self.add_deferred_calls.lock().unwrap().clone()
    }

    /// Batches passed to `submit_merges`
    pub fn submit_calls(&self) -> Vec<Vec<MergeInstruction>> {
        self.submit_calls.lock().unwrap().clone()
    }

    /// (from, to) pairs passed to `transfer_audio`
    pub fn transfer_audio_calls(&self) -> Vec<(WordId, WordId)> {
        self.transfer_audio_calls.lock().unwrap().clone()
    }

    /// Words passed to `delete_audio`
    pub fn delete_audio_calls(&self) -> Vec<WordId> {
        self.delete_audio_calls.lock().unwrap().clone()
    }

    /// Arguments of every `undo_merge` call
    pub fn undo_calls(&self) -> Vec<MergeUndoIds> {
        self.undo_calls.lock().unwrap().clone()
    }

    // === Assertion helpers ===

    /// Assert `submit_merges` was never called
    pub fn assert_submit_not_called(&self) {
        let calls = self.submit_calls();
        assert!(
            calls.is_empty(),
            "expected no submit_merges calls, got {}",
            calls.len()
        );
    }

    /// Assert `add_excluded` was called with exactly this set
    pub fn assert_excluded_called(&self, ids: &[WordId]) {
        let expected = sorted(ids);
        let calls = self.add_excluded_calls();
        assert!(
            calls.iter().any(|c| sorted(c) == expected),
            "expected add_excluded({expected:?}), got {calls:?}"
        );
    }

    fn log(&self, name: &'static str) {
        self.call_log.lock().unwrap().push(name);
    }
}

#[async_trait]
impl LexiconStore for MockStore {
    async fn fetch_duplicate_groups(
        &self,
        max_groups: usize,
        strictness: Option<f64>,
    ) -> Result<Vec<WordGroup>> {
        self.log("fetch_duplicate_groups");
        self.fetch_calls
            .lock()
            .unwrap()
            .push((max_groups, strictness));
        injected(&self.error_on_fetch)?;
        let groups = self.groups.lock().unwrap();
        Ok(groups.iter().take(max_groups).cloned().collect())
    }

    async fn check_excluded(&self, word_ids: &[WordId]) -> Result<bool> {
        self.log("check_excluded");
        let ids = sorted(word_ids);
        Ok(self.excluded_sets.lock().unwrap().contains(&ids))
    }

    async fn add_excluded(&self, word_ids: &[WordId]) -> Result<()> {
        self.log("add_excluded");
        self.add_excluded_calls
            .lock()
            .unwrap()
            .push(word_ids.to_vec());
        injected(&self.error_on_add_excluded)?;
        self.excluded_sets.lock().unwrap().push(sorted(word_ids));
        Ok(())
    }

    async fn add_deferred(&self, word_ids: &[WordId]) -> Result<()> {
        self.log("add_deferred");
        self.add_deferred_calls
            .lock()
            .unwrap()
            .push(word_ids.to_vec());
        Ok(())
    }

    async fn submit_merges(&self, plan: &[MergeInstruction]) -> Result<Vec<WordId>> {
        self.log("submit_merges");
        self.submit_calls.lock().unwrap().push(plan.to_vec());
        injected(&self.error_on_submit)?;
        if let Some(ids) = self.id_override.lock().unwrap().clone() {
            return Ok(ids);
        }
        Ok(plan
            .iter()
            .filter(|i| !i.delete_only)
            .map(|_| format!("new-{}", self.next_id.fetch_add(1, Ordering::SeqCst)))
            .collect())
    }

    async fn transfer_audio(&self, from_word: &str, to_word: &str) -> Result<()> {
        self.log("transfer_audio");
        self.transfer_audio_calls
            .lock()
            .unwrap()
            .push((from_word.to_string(), to_word.to_string()));
        injected(&self.error_on_transfer_audio)
    }

    async fn delete_audio(&self, word_id: &str) -> Result<()> {
        self.log("delete_audio");
        self.delete_audio_calls
            .lock()
            .unwrap()
            .push(word_id.to_string());
        Ok(())
    }

    async fn undo_merge(&self, ids: &MergeUndoIds) -> Result<bool> {
        self.log("undo_merge");
        self.undo_calls.lock().unwrap().push(ids.clone());
        Ok(*self.undo_response.lock().unwrap())
    }
}
