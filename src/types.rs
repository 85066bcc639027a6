//! Core lexicon types

use serde::{Deserialize, Serialize};

/// Word identifier assigned by the backing store
pub type WordId = String;

/// Globally unique sense identifier
pub type Guid = String;

/// Accessibility status of a word or sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    /// Ordinary, editable
    #[default]
    Active,
    /// Carries data the merge tool cannot represent; moves and deletes are restricted
    Protected,
    /// Removed
    Deleted,
    /// Folded into another sense
    Duplicate,
    /// Left behind in its source word while other senses merged elsewhere
    Separate,
}

impl Status {
    /// Whether this status marks a live sense or word
    pub const fn is_live(self) -> bool {
        match self {
            Self::Active | Self::Protected => true,
            Self::Deleted | Self::Duplicate | Self::Separate => false,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Protected => write!(f, "protected"),
            Self::Deleted => write!(f, "deleted"),
            Self::Duplicate => write!(f, "duplicate"),
            Self::Separate => write!(f, "separate"),
        }
    }
}

/// A gloss in one analysis language
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Gloss {
    /// Analysis language tag
    pub language: String,
    /// Gloss text
    pub def: String,
}

impl Gloss {
    /// Create a gloss
    pub fn new(language: &str, def: &str) -> Self {
        Self {
            language: language.to_string(),
            def: def.to_string(),
        }
    }
}

/// A definition in one language
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Definition {
    /// Language tag
    pub language: String,
    /// Definition text
    pub text: String,
}

impl Definition {
    /// Create a definition
    pub fn new(language: &str, text: &str) -> Self {
        Self {
            language: language.to_string(),
            text: text.to_string(),
        }
    }
}

/// A semantic domain tag
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SemanticDomain {
    /// Domain id (e.g. "2.1.1")
    pub id: String,
    /// Display name
    pub name: String,
    /// Language of the display name
    #[serde(default)]
    pub lang: String,
}

impl SemanticDomain {
    /// Create a domain with an English name
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            lang: "en".to_string(),
        }
    }
}

/// Coarse part-of-speech group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum GramCatGroup {
    #[default]
    Unspecified,
    Other,
    Adjective,
    Adposition,
    Adverb,
    Classifier,
    Connective,
    Determiner,
    ExistentialMarker,
    Expletive,
    Interjection,
    Noun,
    Numeral,
    Participle,
    Preverb,
    Prenoun,
    Pronoun,
    Verb,
}

/// Grammatical category of a sense
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrammaticalInfo {
    /// Coarse group
    pub cat_group: GramCatGroup,
    /// Free-form category label
    #[serde(default)]
    pub grammatical_category: String,
}

/// One sense of a word
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sense {
    /// Globally unique id
    pub guid: Guid,
    /// Accessibility status
    #[serde(default)]
    pub accessibility: Status,
    /// Glosses, one per analysis language
    #[serde(default)]
    pub glosses: Vec<Gloss>,
    /// Definitions, one per language
    #[serde(default)]
    pub definitions: Vec<Definition>,
    /// Semantic domains, unique by id
    #[serde(default)]
    pub semantic_domains: Vec<SemanticDomain>,
    /// Part of speech
    #[serde(default)]
    pub grammatical_info: GrammaticalInfo,
}

impl Sense {
    /// Create an active sense with no content
    pub fn new(guid: &str) -> Self {
        Self {
            guid: guid.to_string(),
            ..Self::default()
        }
    }
}

/// An audio pronunciation attached to a word
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pronunciation {
    /// Stored file name
    pub file_name: String,
    /// Whether the recording is protected from deletion
    #[serde(default)]
    pub protected: bool,
}

/// A review flag on a word
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flag {
    /// Whether the flag is raised
    pub active: bool,
    /// Note attached to the flag
    #[serde(default)]
    pub text: String,
}

impl Flag {
    /// A raised flag with a note
    pub fn raised(text: &str) -> Self {
        Self {
            active: true,
            text: text.to_string(),
        }
    }

    /// Compare flags the way a reviewer would: lowered flags are all the same,
    /// raised flags must carry the same note.
    pub fn same_as(&self, other: &Self) -> bool {
        match (self.active, other.active) {
            (false, false) => true,
            (true, true) => self.text == other.text,
            _ => false,
        }
    }
}

/// A lexicon entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Word {
    /// Store-assigned id (empty for a word not yet stored)
    pub id: WordId,
    /// Vernacular form
    pub vernacular: String,
    /// Ordered senses
    #[serde(default)]
    pub senses: Vec<Sense>,
    /// Audio pronunciations
    #[serde(default)]
    pub audio: Vec<Pronunciation>,
    /// Review flag
    #[serde(default)]
    pub flag: Flag,
    /// Ids of the words this one superseded
    #[serde(default)]
    pub history: Vec<WordId>,
    /// Word-level accessibility
    #[serde(default)]
    pub accessibility: Status,
}

impl Word {
    /// Create an unsaved word with no senses
    pub fn new(vernacular: &str) -> Self {
        Self {
            vernacular: vernacular.to_string(),
            ..Self::default()
        }
    }

    /// Whether the word is on the frontier (not merged away or deleted)
    pub const fn is_frontier(&self) -> bool {
        self.accessibility.is_live()
    }

    /// Whether the word is protected as a whole
    pub fn is_protected(&self) -> bool {
        self.accessibility == Status::Protected
    }
}

/// A group of candidate duplicate words, most similar first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WordGroup {
    /// Member words; the first is the anchor the others were matched against
    pub words: Vec<Word>,
    /// Mean similarity score of the members against the anchor (lower is closer)
    #[serde(default)]
    pub score: f64,
}

impl WordGroup {
    /// Member word ids in group order
    pub fn ids(&self) -> Vec<WordId> {
        self.words.iter().map(|w| w.id.clone()).collect()
    }

    /// Number of member words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the group has no members
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
