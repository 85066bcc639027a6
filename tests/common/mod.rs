//! Shared test utilities

#![allow(dead_code)]

pub mod mock_store;

pub use mock_store::MockStore;

use lexmerge::tree::{MergeTree, MergeTreeReference};
use lexmerge::types::{
    Definition, Gloss, Pronunciation, SemanticDomain, Sense, Status, Word, WordId,
};

/// Sense with one English gloss
pub fn sense(guid: &str, gloss: &str) -> Sense {
    let mut sense = Sense::new(guid);
    sense.glosses.push(Gloss::new("en", gloss));
    sense
}

/// Sense carrying a definition and one semantic domain
pub fn rich_sense(guid: &str, def: &str, domain: &str) -> Sense {
    let mut sense = Sense::new(guid);
    sense.definitions.push(Definition::new("en", def));
    sense
        .semantic_domains
        .push(SemanticDomain::new(domain, &format!("Domain {domain}")));
    sense
}

/// Word whose senses are glossed with their own guid
pub fn make_word(id: &str, vern: &str, guids: &[&str]) -> Word {
    Word {
        id: id.to_string(),
        senses: guids.iter().map(|g| sense(g, &format!("gloss {g}"))).collect(),
        ..Word::new(vern)
    }
}

/// Word with one audio file named after it
pub fn with_audio(mut word: Word) -> Word {
    word.audio.push(Pronunciation {
        file_name: format!("{}.webm", word.id),
        protected: false,
    });
    word
}

/// Mark a whole word protected
pub fn protect_word(mut word: Word) -> Word {
    word.accessibility = Status::Protected;
    word
}

/// Mark one sense of a word protected
pub fn protect_sense(mut word: Word, guid: &str) -> Word {
    if let Some(sense) = word.senses.iter_mut().find(|s| s.guid == guid) {
        sense.accessibility = Status::Protected;
    }
    word
}

/// Owned id list
pub fn ids(list: &[&str]) -> Vec<WordId> {
    list.iter().map(ToString::to_string).collect()
}

/// Two words A=[S1,S2] and B=[S3,S4]
pub fn two_word_tree() -> MergeTree {
    MergeTree::new(&[
        make_word("A", "kuta", &["S1", "S2"]),
        make_word("B", "kuta", &["S3", "S4"]),
    ])
}

/// Reference to the whole slot holding `guid`
pub fn slot_of(tree: &MergeTree, guid: &str) -> MergeTreeReference {
    tree.locate(guid)
        .unwrap_or_else(|| panic!("{guid} not in tree"))
        .whole_slot()
}

/// Reference to `guid` as a sidebar item
pub fn item_of(tree: &MergeTree, guid: &str) -> MergeTreeReference {
    tree.locate(guid)
        .unwrap_or_else(|| panic!("{guid} not in tree"))
}

/// Guids of a column, slot by slot
pub fn column_guids(tree: &MergeTree, column: &str) -> Vec<Vec<String>> {
    tree.column(column)
        .unwrap_or_else(|| panic!("column {column} missing"))
        .slots
        .iter()
        .map(|s| s.guids.clone())
        .collect()
}
