//! Persistence for exclusion lists next to the lexicon file.

use super::{EXCLUSIONS_VERSION, ExclusionLists};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the lexicon file stem.
const EXCLUSIONS_SUFFIX: &str = "exclusions.toml";

/// Get the exclusion file path that belongs to a lexicon file.
///
/// `words/lexicon.json` maps to `words/lexicon.exclusions.toml`.
pub fn exclusions_path(words_path: &Path) -> PathBuf {
    let stem = words_path
        .file_stem()
        .map_or_else(|| "lexicon".into(), |s| s.to_string_lossy());
    words_path.with_file_name(format!("{stem}.{EXCLUSIONS_SUFFIX}"))
}

/// Load exclusion lists from disk.
///
/// Returns empty lists if the file doesn't exist.
pub fn load_exclusions(path: &Path) -> Result<ExclusionLists> {
    if !path.exists() {
        return Ok(ExclusionLists::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Exclusions(format!("failed to read {}: {e}", path.display())))?;

    let lists: ExclusionLists = toml::from_str(&content)
        .map_err(|e| Error::Exclusions(format!("failed to parse {}: {e}", path.display())))?;

    Ok(lists)
}

/// Save exclusion lists to disk.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_exclusions(path: &Path, lists: &ExclusionLists) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                Error::Exclusions(format!("failed to create {}: {e}", dir.display()))
            })?;
        }
    }

    let mut to_save = lists.clone();
    to_save.version = EXCLUSIONS_VERSION;

    let content = toml::to_string_pretty(&to_save)
        .map_err(|e| Error::Exclusions(format!("failed to serialize exclusion lists: {e}")))?;

    let content_with_header = format!(
        "# lexmerge exclusion lists\n# Auto-generated - manual edits may be overwritten\n\n{content}"
    );

    fs::write(path, content_with_header)
        .map_err(|e| Error::Exclusions(format!("failed to write {}: {e}", path.display())))?;

    Ok(())
}
