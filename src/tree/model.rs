use crate::error::{Error, Result};
use crate::types::{Flag, Guid, Sense, Status, Word, WordId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::warn;
use uuid::Uuid;

/// Identifier of a slot within the tree
pub type SlotId = String;

/// Mint a fresh slot id
pub(super) fn new_slot_id() -> SlotId {
    Uuid::new_v4().to_string()
}

/// Snapshot sense plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTreeSense {
    /// The sense as loaded
    pub sense: Sense,
    /// Word the sense belongs to in the snapshot
    pub src_word_id: WordId,
    /// Position of the sense within its source word
    pub order: usize,
    /// Whether the sense was loaded with `Protected` status
    pub protected: bool,
}

/// Read-only snapshot of the words in a session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeData {
    words: HashMap<WordId, Word>,
    senses: HashMap<Guid, MergeTreeSense>,
    word_order: Vec<WordId>,
}

impl MergeData {
    /// Look up a snapshot word
    pub fn word(&self, id: &str) -> Option<&Word> {
        self.words.get(id)
    }

    /// Look up a snapshot sense
    pub fn sense(&self, guid: &str) -> Option<&MergeTreeSense> {
        self.senses.get(guid)
    }

    /// Snapshot word ids in load order
    pub fn word_ids(&self) -> &[WordId] {
        &self.word_order
    }

    /// All snapshot sense guids
    pub fn sense_guids(&self) -> impl Iterator<Item = &Guid> {
        self.senses.keys()
    }

    /// Whether any snapshot sense came from word `id`
    pub fn has_senses_from(&self, id: &str) -> bool {
        self.senses.values().any(|s| s.src_word_id == id)
    }
}

/// One merge-sense placeholder: the guids that fold into one output sense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Slot id, unique across the tree
    pub id: SlotId,
    /// Sense guids; the first one is kept, the rest become duplicates
    pub guids: Vec<Guid>,
}

/// A column: one output word being assembled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTreeWord {
    /// Column id (the snapshot word id, or a fresh id for a new word)
    pub id: WordId,
    /// Slots in output sense order
    pub slots: Vec<Slot>,
    /// Vernacular form of the output word
    pub vern: String,
    /// Flag of the output word
    pub flag: Flag,
    /// Whether the underlying word is protected
    pub protected: bool,
}

impl MergeTreeWord {
    /// Look up a slot by id
    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// All guids in the column, slot by slot
    pub fn guids(&self) -> impl Iterator<Item = &Guid> {
        self.slots.iter().flat_map(|s| &s.guids)
    }
}

/// Points at a whole slot, or at one item of a slot when `order` is set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeTreeReference {
    /// Column id
    pub column: WordId,
    /// Slot id
    pub slot: SlotId,
    /// Index into the slot's guids (sidebar item)
    pub order: Option<usize>,
}

impl MergeTreeReference {
    /// Reference to a whole slot
    pub fn slot(column: &str, slot: &str) -> Self {
        Self {
            column: column.to_string(),
            slot: slot.to_string(),
            order: None,
        }
    }

    /// Reference to one item of a slot
    pub fn item(column: &str, slot: &str, order: usize) -> Self {
        Self {
            column: column.to_string(),
            slot: slot.to_string(),
            order: Some(order),
        }
    }

    /// The same reference without the item index
    pub fn whole_slot(&self) -> Self {
        Self {
            order: None,
            ..self.clone()
        }
    }
}

/// The slot last opened in the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRef {
    /// Column id
    pub column: WordId,
    /// Slot id
    pub slot: SlotId,
}

/// The visible sidebar: one slot's guids, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    /// Column id
    pub column: WordId,
    /// Slot id
    pub slot: SlotId,
    /// Guids in the slot
    pub guids: Vec<Guid>,
}

/// State of one merge session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeTree {
    pub(super) data: MergeData,
    pub(super) columns: Vec<MergeTreeWord>,
    pub(super) sidebar: Option<SidebarRef>,
    pub(super) deleted_sense_guids: BTreeSet<Guid>,
    pub(super) audio_moves: BTreeMap<WordId, Vec<WordId>>,
    pub(super) override_protection: bool,
}

impl MergeTree {
    /// Start a session from a word snapshot.
    ///
    /// Each word becomes a column and each of its senses a single-guid slot.
    /// Repeated word ids or sense guids are skipped.
    pub fn new(words: &[Word]) -> Self {
        let mut tree = Self::default();

        for word in words {
            if tree.data.words.contains_key(&word.id) {
                warn!(word = %word.id, "skipping repeated word in snapshot");
                continue;
            }

            let mut slots = Vec::new();
            for (order, sense) in word.senses.iter().enumerate() {
                if tree.data.senses.contains_key(&sense.guid) {
                    warn!(guid = %sense.guid, "skipping repeated sense guid in snapshot");
                    continue;
                }
                tree.data.senses.insert(
                    sense.guid.clone(),
                    MergeTreeSense {
                        sense: sense.clone(),
                        src_word_id: word.id.clone(),
                        order,
                        protected: sense.accessibility == Status::Protected,
                    },
                );
                slots.push(Slot {
                    id: new_slot_id(),
                    guids: vec![sense.guid.clone()],
                });
            }

            tree.data.word_order.push(word.id.clone());
            tree.data.words.insert(word.id.clone(), word.clone());
            if !slots.is_empty() {
                tree.columns.push(MergeTreeWord {
                    id: word.id.clone(),
                    slots,
                    vern: word.vernacular.clone(),
                    flag: word.flag.clone(),
                    protected: word.is_protected(),
                });
            }
        }
        tree
    }

    /// Discard the session
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the session holds nothing
    pub fn is_empty(&self) -> bool {
        self.data.word_order.is_empty()
    }

    /// Snapshot data
    pub const fn data(&self) -> &MergeData {
        &self.data
    }

    /// Columns in display order
    pub fn columns(&self) -> &[MergeTreeWord] {
        &self.columns
    }

    /// Look up a column
    pub fn column(&self, id: &str) -> Option<&MergeTreeWord> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Snapshot data for a sense
    pub fn sense(&self, guid: &str) -> Option<&MergeTreeSense> {
        self.data.sense(guid)
    }

    /// Guids removed during the session
    pub const fn deleted_sense_guids(&self) -> &BTreeSet<Guid> {
        &self.deleted_sense_guids
    }

    /// Pending audio transfers: surviving column -> removed source words
    pub const fn audio_moves(&self) -> &BTreeMap<WordId, Vec<WordId>> {
        &self.audio_moves
    }

    /// Whether protection checks are currently bypassed
    pub const fn override_protection(&self) -> bool {
        self.override_protection
    }

    /// Bypass (or restore) protection checks for later operations
    pub fn set_override_protection(&mut self, enabled: bool) {
        self.override_protection = enabled;
    }

    /// Find where a sense currently sits.
    ///
    /// The reference names the item within its slot; call
    /// [`MergeTreeReference::whole_slot`] to address the slot itself.
    pub fn locate(&self, guid: &str) -> Option<MergeTreeReference> {
        self.columns.iter().find_map(|column| {
            column.slots.iter().find_map(|slot| {
                slot.guids
                    .iter()
                    .position(|g| g == guid)
                    .map(|i| MergeTreeReference::item(&column.id, &slot.id, i))
            })
        })
    }

    /// The visible sidebar, if the slot last opened still shows duplicates
    pub fn sidebar(&self) -> Option<Sidebar> {
        self.sidebar.as_ref().and_then(|r| self.sidebar_view(r))
    }

    pub(super) fn sidebar_view(&self, r: &SidebarRef) -> Option<Sidebar> {
        let slot = self.column(&r.column)?.slot(&r.slot)?;
        (slot.guids.len() > 1).then(|| Sidebar {
            column: r.column.clone(),
            slot: r.slot.clone(),
            guids: slot.guids.clone(),
        })
    }

    /// Close a sidebar whose slot no longer shows duplicates
    pub(super) fn normalize_sidebar(&mut self) {
        let stale = self
            .sidebar
            .as_ref()
            .is_some_and(|r| self.sidebar_view(r).is_none());
        if stale {
            self.sidebar = None;
        }
    }

    /// Verify the structural invariants of the session.
    ///
    /// Live senses appear exactly once; no column or slot is empty; audio
    /// transfers form a forest rooted at live columns; an open sidebar
    /// points at a slot holding duplicates.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen: HashSet<&Guid> = HashSet::new();
        let mut column_ids: HashSet<&WordId> = HashSet::new();
        let mut slot_ids: HashSet<&SlotId> = HashSet::new();

        for column in &self.columns {
            if !column_ids.insert(&column.id) {
                return Err(Error::Invariant(format!("column {} appears twice", column.id)));
            }
            if column.slots.is_empty() {
                return Err(Error::Invariant(format!("column {} has no slots", column.id)));
            }
            for slot in &column.slots {
                if !slot_ids.insert(&slot.id) {
                    return Err(Error::Invariant(format!("slot {} appears twice", slot.id)));
                }
                if slot.guids.is_empty() {
                    return Err(Error::Invariant(format!(
                        "slot {} in column {} is empty",
                        slot.id, column.id
                    )));
                }
                for guid in &slot.guids {
                    if !self.data.senses.contains_key(guid) {
                        return Err(Error::Invariant(format!("unknown sense {guid} in tree")));
                    }
                    if self.deleted_sense_guids.contains(guid) {
                        return Err(Error::Invariant(format!("deleted sense {guid} in tree")));
                    }
                    if !seen.insert(guid) {
                        return Err(Error::Invariant(format!("sense {guid} appears twice")));
                    }
                }
            }
        }

        for guid in self.data.senses.keys() {
            if !seen.contains(guid) && !self.deleted_sense_guids.contains(guid) {
                return Err(Error::Invariant(format!("sense {guid} was lost")));
            }
        }
        if let Some(guid) = self
            .deleted_sense_guids
            .iter()
            .find(|g| !self.data.senses.contains_key(*g))
        {
            return Err(Error::Invariant(format!("unknown deleted sense {guid}")));
        }

        let mut sources: HashSet<&WordId> = HashSet::new();
        for (target, moved) in &self.audio_moves {
            if !column_ids.contains(target) {
                return Err(Error::Invariant(format!(
                    "audio moves target {target} is not a column"
                )));
            }
            for source in moved {
                if column_ids.contains(source) {
                    return Err(Error::Invariant(format!(
                        "audio source {source} is still a column"
                    )));
                }
                if !sources.insert(source) {
                    return Err(Error::Invariant(format!(
                        "audio source {source} moves to two columns"
                    )));
                }
            }
        }

        if let Some(r) = &self.sidebar {
            if self.sidebar_view(r).is_none() {
                return Err(Error::Invariant(format!(
                    "sidebar points at {}/{} which shows no duplicates",
                    r.column, r.slot
                )));
            }
        }

        Ok(())
    }
}
