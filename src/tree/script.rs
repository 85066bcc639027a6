//! Replayable operation scripts
//!
//! Slot ids are minted per session, so scripts address senses by guid and
//! resolve them against the tree just before each step.

use super::model::{MergeTree, MergeTreeReference};
use crate::error::{Error, Result};
use crate::types::{Flag, Guid, WordId};
use serde::{Deserialize, Serialize};

/// A sense-addressed reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRef {
    /// A guid in the slot
    pub sense: Guid,
    /// Address just this guid (a sidebar item) rather than its whole slot
    #[serde(default)]
    pub item: bool,
}

impl ScriptRef {
    /// The whole slot holding `guid`
    pub fn slot(guid: &str) -> Self {
        Self {
            sense: guid.to_string(),
            item: false,
        }
    }

    /// Just `guid` within its slot
    pub fn item(guid: &str) -> Self {
        Self {
            sense: guid.to_string(),
            item: true,
        }
    }

    fn resolve(&self, tree: &MergeTree) -> Result<MergeTreeReference> {
        let found = tree
            .locate(&self.sense)
            .ok_or_else(|| Error::SenseNotFound(self.sense.clone()))?;
        Ok(if self.item { found } else { found.whole_slot() })
    }
}

/// One step of a merge session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TreeOp {
    /// Fold `src` into the slot holding `dest`
    Combine {
        /// What to fold
        src: ScriptRef,
        /// Any guid of the receiving slot
        dest: Guid,
    },
    /// Move `src` into `column` at `order`
    Move {
        /// What to move
        src: ScriptRef,
        /// Destination column (created if missing)
        column: WordId,
        /// Destination slot position
        #[serde(default)]
        order: usize,
    },
    /// Reorder `src` to `order` within its column or slot
    Order {
        /// What to reorder
        src: ScriptRef,
        /// New position
        order: usize,
    },
    /// Delete `src`
    Delete {
        /// What to delete
        src: ScriptRef,
    },
    /// Set a column's flag
    Flag {
        /// Column id
        column: WordId,
        /// New flag
        flag: Flag,
    },
    /// Set a column's vernacular form
    SetVernacular {
        /// Column id
        column: WordId,
        /// New form
        vernacular: String,
    },
    /// Open the sidebar on the slot holding `sense`
    OpenSidebar {
        /// Any guid of the slot
        sense: Guid,
    },
    /// Close the sidebar
    CloseSidebar,
    /// Toggle protection override
    OverrideProtection {
        /// New setting
        enabled: bool,
    },
}

impl TreeOp {
    /// Apply this step to a tree
    pub fn apply(&self, tree: &mut MergeTree) -> Result<()> {
        match self {
            Self::Combine { src, dest } => {
                let src = src.resolve(tree)?;
                let dest = ScriptRef::slot(dest).resolve(tree)?;
                tree.combine_sense(&src, &dest)
            }
            Self::Move { src, column, order } => {
                let src = src.resolve(tree)?;
                tree.move_sense(&src, column, *order)
            }
            Self::Order { src, order } => {
                let src = src.resolve(tree)?;
                tree.order_sense(&src, *order)
            }
            Self::Delete { src } => {
                let src = src.resolve(tree)?;
                tree.delete_sense(&src)
            }
            Self::Flag { column, flag } => tree.flag_word(column, flag.clone()),
            Self::SetVernacular { column, vernacular } => tree.set_vernacular(column, vernacular),
            Self::OpenSidebar { sense } => {
                let r = ScriptRef::slot(sense).resolve(tree)?;
                tree.open_sidebar(&r.column, &r.slot)
            }
            Self::CloseSidebar => {
                tree.close_sidebar();
                Ok(())
            }
            Self::OverrideProtection { enabled } => {
                tree.set_override_protection(*enabled);
                Ok(())
            }
        }
    }
}

/// Apply steps in order, stopping at the first failure.
///
/// The error names the zero-based index of the failing step; steps before it
/// stay applied.
pub fn apply_script(tree: &mut MergeTree, ops: &[TreeOp]) -> Result<()> {
    for (index, op) in ops.iter().enumerate() {
        op.apply(tree).map_err(|e| Error::Script {
            index,
            source: Box::new(e),
        })?;
    }
    Ok(())
}
