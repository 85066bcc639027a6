//! Word similarity scoring
//!
//! Scores are distances: 0 means "surely the same word", larger means less
//! alike. Nothing here holds state.

use crate::types::Word;
use strsim::levenshtein;

/// Normalize a vernacular form for comparison
fn normalize_form(form: &str) -> String {
    form.trim().to_lowercase()
}

/// Edit distance between two vernacular forms, ignoring case and outer whitespace
pub fn vernacular_distance(a: &str, b: &str) -> usize {
    levenshtein(&normalize_form(a), &normalize_form(b))
}

/// Whether the two words share a non-empty gloss in the same language
fn share_gloss(a: &Word, b: &Word) -> bool {
    a.senses.iter().flat_map(|s| &s.glosses).any(|ga| {
        let text = ga.def.trim();
        !text.is_empty()
            && b.senses.iter().flat_map(|s| &s.glosses).any(|gb| {
                gb.language == ga.language && gb.def.trim().eq_ignore_ascii_case(text)
            })
    })
}

/// Score a pair of words against a threshold.
///
/// Returns `None` when the pair is further apart than `threshold`. Pairs
/// within the threshold that also share a gloss score `0.0` so they rank
/// ahead of pairs related only by spelling.
pub fn word_score(a: &Word, b: &Word, threshold: f64) -> Option<f64> {
    let form_a = normalize_form(&a.vernacular);
    let form_b = normalize_form(&b.vernacular);
    if form_a.is_empty() || form_b.is_empty() {
        return None;
    }

    // Length gap is a lower bound on edit distance.
    #[allow(clippy::cast_precision_loss)]
    let gap = form_a.chars().count().abs_diff(form_b.chars().count()) as f64;
    if gap > threshold {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let distance = levenshtein(&form_a, &form_b) as f64;
    if distance > threshold {
        return None;
    }
    if share_gloss(a, b) {
        return Some(0.0);
    }
    Some(distance)
}
