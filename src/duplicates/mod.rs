//! Duplicate detection over a word list
//!
//! [`score`] compares two words; [`DuplicateFinder`] clusters a whole list
//! into candidate groups, precision first: an exact-form pass runs before a
//! fuzzy one.

mod finder;
pub mod score;

pub use finder::{DuplicateFinder, FinderConfig};
pub use score::{vernacular_distance, word_score};
