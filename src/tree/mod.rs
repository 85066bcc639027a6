//! In-memory merge session for one duplicate group
//!
//! A [`MergeTree`] holds one column per output word. Each column holds ordered
//! slots, and each slot holds the guids of the senses that will fold into one
//! output sense (the first guid is the one kept). All mutation goes through
//! the operations in [`ops`]; [`MergeTree::check_invariants`] verifies the
//! structure after any of them.

mod model;
pub mod ops;
pub mod script;

pub use model::{
    MergeData, MergeTree, MergeTreeReference, MergeTreeSense, MergeTreeWord, Sidebar, SidebarRef,
    Slot, SlotId,
};
pub use script::{ScriptRef, TreeOp, apply_script};
