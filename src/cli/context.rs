//! Shared command context for CLI commands
//!
//! Extracts the setup shared by the find and merge commands.

use lexmerge::config::Config;
use lexmerge::error::Result;
use lexmerge::store::FileStore;
use std::path::{Path, PathBuf};

/// Shared context for commands that read a lexicon
///
/// Opening the store loads the words file and the exclusion lists that sit
/// next to it.
pub struct CommandContext {
    /// Words file
    pub words_path: PathBuf,
    /// Loaded configuration
    pub config: Config,
    /// Store over the words file
    pub store: FileStore,
}

impl CommandContext {
    /// Open the lexicon at `words_path`
    pub fn new(words_path: &Path, config: Config) -> Result<Self> {
        let store = FileStore::open(words_path, config.duplicates.clone())?;
        Ok(Self {
            words_path: words_path.to_path_buf(),
            config,
            store,
        })
    }

    /// Group limit, falling back to the configured default
    pub const fn max_groups(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(n) => n,
            None => self.config.duplicates.max_groups,
        }
    }
}
