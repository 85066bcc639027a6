//! JSON-file lexicon store
//!
//! Words live in a JSON array on disk; the exclusion lists live in a TOML
//! file next to it. Every mutating call rewrites the affected file.

use super::{LexiconStore, MergeUndoIds};
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::{Error, Result};
use crate::exclusion::{ExclusionLists, exclusions_path, load_exclusions, save_exclusions};
use crate::merge::MergeInstruction;
use crate::types::{Status, Word, WordGroup, WordId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone)]
struct StoreState {
    words: Vec<Word>,
    exclusions: ExclusionLists,
    /// Status each merged-away word had before it left the frontier
    retired: HashMap<WordId, Status>,
}

impl StoreState {
    fn word(&self, id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    fn word_mut(&mut self, id: &str) -> Result<&mut Word> {
        self.words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::Store(format!("word {id} not found")))
    }

    fn frontier_word(&self, id: &str) -> Result<&Word> {
        match self.word(id) {
            Some(word) if word.is_frontier() => Ok(word),
            Some(_) => Err(Error::Store(format!("word {id} is no longer on the frontier"))),
            None => Err(Error::Store(format!("word {id} not found"))),
        }
    }

    fn retire(&mut self, id: &str) -> Result<()> {
        let word = self.word_mut(id)?;
        if !word.is_frontier() {
            return Ok(());
        }
        let previous = word.accessibility;
        word.accessibility = Status::Deleted;
        self.retired.insert(id.to_string(), previous);
        Ok(())
    }
}

/// Lexicon store backed by local files
pub struct FileStore {
    words_path: PathBuf,
    exclusions_path: PathBuf,
    finder: DuplicateFinder,
    state: Mutex<StoreState>,
}

impl FileStore {
    /// Open the words file at `words_path` and its exclusion lists
    pub fn open(words_path: &Path, config: FinderConfig) -> Result<Self> {
        let content = fs::read_to_string(words_path).map_err(|e| {
            Error::Store(format!("failed to read {}: {e}", words_path.display()))
        })?;
        let words: Vec<Word> = serde_json::from_str(&content).map_err(|e| {
            Error::Store(format!("failed to parse {}: {e}", words_path.display()))
        })?;

        let exclusions_path = exclusions_path(words_path);
        let exclusions = load_exclusions(&exclusions_path)?;
        debug!(
            words = words.len(),
            blacklisted = exclusions.blacklist.len(),
            deferred = exclusions.graylist.len(),
            "opened lexicon"
        );

        Ok(Self {
            words_path: words_path.to_path_buf(),
            exclusions_path,
            finder: DuplicateFinder::new(config),
            state: Mutex::new(StoreState {
                words,
                exclusions,
                retired: HashMap::new(),
            }),
        })
    }

    /// Path of the exclusion list file
    pub fn exclusions_file(&self) -> &Path {
        &self.exclusions_path
    }

    /// Copy of every stored word, including retired ones
    pub async fn words(&self) -> Vec<Word> {
        self.state.lock().await.words.clone()
    }

    /// Copy of the current exclusion lists
    pub async fn exclusions(&self) -> ExclusionLists {
        self.state.lock().await.exclusions.clone()
    }

    /// Look up words by id, in the order given
    pub async fn words_by_id(&self, ids: &[WordId]) -> Result<Vec<Word>> {
        let state = self.state.lock().await;
        ids.iter()
            .map(|id| {
                state
                    .word(id)
                    .cloned()
                    .ok_or_else(|| Error::Store(format!("word {id} not found")))
            })
            .collect()
    }

    fn save_words(&self, words: &[Word]) -> Result<()> {
        let content = serde_json::to_string_pretty(words)?;
        fs::write(&self.words_path, content).map_err(|e| {
            Error::Store(format!("failed to write {}: {e}", self.words_path.display()))
        })
    }
}

#[async_trait]
impl LexiconStore for FileStore {
    async fn fetch_duplicate_groups(
        &self,
        max_groups: usize,
        strictness: Option<f64>,
    ) -> Result<Vec<WordGroup>> {
        let mut state = self.state.lock().await;
        let state = &mut *state;

        let frontier = state
            .words
            .iter()
            .filter(|w| w.is_frontier())
            .map(|w| &w.id);
        let pruned = state.exclusions.prune(frontier);
        if pruned > 0 {
            debug!(pruned, "dropped stale exclusion entries");
            save_exclusions(&self.exclusions_path, &state.exclusions)?;
        }

        Ok(self
            .finder
            .find(&state.words, &state.exclusions, max_groups, strictness))
    }

    async fn check_excluded(&self, word_ids: &[WordId]) -> Result<bool> {
        Ok(self.state.lock().await.exclusions.is_excluded(word_ids))
    }

    async fn add_excluded(&self, word_ids: &[WordId]) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.exclusions.add_blacklist(word_ids) {
            save_exclusions(&self.exclusions_path, &state.exclusions)?;
        }
        Ok(())
    }

    async fn add_deferred(&self, word_ids: &[WordId]) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.exclusions.add_graylist(word_ids) {
            save_exclusions(&self.exclusions_path, &state.exclusions)?;
        }
        Ok(())
    }

    async fn submit_merges(&self, plan: &[MergeInstruction]) -> Result<Vec<WordId>> {
        let mut guard = self.state.lock().await;

        // Validate the whole batch before touching anything
        for instruction in plan {
            for id in instruction.child_ids() {
                guard.frontier_word(id)?;
            }
            if !instruction.parent.id.is_empty() {
                guard.frontier_word(&instruction.parent.id)?;
            }
        }

        // Committed only once the words file is written
        let mut state = guard.clone();
        let mut new_ids = Vec::new();
        for instruction in plan {
            if instruction.delete_only {
                state.retire(&instruction.parent.id)?;
                debug!(word = %instruction.parent.id, "deleted word");
                continue;
            }

            let mut word = instruction.parent.clone();
            word.id = Uuid::new_v4().to_string();
            word.history = instruction.child_ids().cloned().collect();
            if !instruction.parent.id.is_empty() && !word.history.contains(&instruction.parent.id)
            {
                word.history.push(instruction.parent.id.clone());
            }
            for id in word.history.clone() {
                state.retire(&id)?;
            }
            debug!(word = %word.id, from = ?word.history, "created merged word");
            new_ids.push(word.id.clone());
            state.words.push(word);
        }

        self.save_words(&state.words)?;
        *guard = state;
        info!(created = new_ids.len(), "applied merge batch");
        Ok(new_ids)
    }

    async fn transfer_audio(&self, from_word: &str, to_word: &str) -> Result<()> {
        let mut guard = self.state.lock().await;
        let mut state = guard.clone();
        state.word_mut(to_word)?;
        let audio = std::mem::take(&mut state.word_mut(from_word)?.audio);
        if audio.is_empty() {
            return Ok(());
        }
        let target = state.word_mut(to_word)?;
        for pronunciation in audio {
            if !target
                .audio
                .iter()
                .any(|p| p.file_name == pronunciation.file_name)
            {
                target.audio.push(pronunciation);
            }
        }
        self.save_words(&state.words)?;
        *guard = state;
        Ok(())
    }

    async fn delete_audio(&self, word_id: &str) -> Result<()> {
        let mut guard = self.state.lock().await;
        let mut state = guard.clone();
        let word = state.word_mut(word_id)?;
        let before = word.audio.len();
        word.audio.retain(|p| p.protected);
        if word.audio.len() != before {
            self.save_words(&state.words)?;
            *guard = state;
        }
        Ok(())
    }

    async fn undo_merge(&self, ids: &MergeUndoIds) -> Result<bool> {
        let mut guard = self.state.lock().await;
        let mut state = guard.clone();

        let parents_live = ids
            .parent_ids
            .iter()
            .all(|id| state.word(id).is_some_and(Word::is_frontier));
        let children_retired = ids
            .child_ids
            .iter()
            .all(|id| state.word(id).is_some_and(|w| !w.is_frontier()));
        if !parents_live || !children_retired {
            debug!(?ids, "merge can no longer be undone");
            return Ok(false);
        }

        for id in &ids.parent_ids {
            state.word_mut(id)?.accessibility = Status::Deleted;
        }
        for id in &ids.child_ids {
            let status = state.retired.remove(id).unwrap_or_default();
            state.word_mut(id)?.accessibility = status;
        }
        self.save_words(&state.words)?;
        *guard = state;
        info!(restored = ids.child_ids.len(), "merge undone");
        Ok(true)
    }
}
