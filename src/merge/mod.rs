//! Merge engine for duplicate words
//!
//! Three-phase pattern:
//! 1. Edit - refine a [`MergeTree`](crate::tree::MergeTree) (pure, in memory)
//! 2. Plan - compile it into a `MergePlan` (pure, testable)
//! 3. Execute - exclude, submit and record (effectful)

mod execute;
mod plan;

pub use execute::{
    MergeExecutionResult, defer_session, execute_merge, submit_session, transfer_merged_audio,
    undo_merge,
};
pub use plan::{
    DEFINITION_SEPARATOR, MergeInstruction, MergePlan, MergeSourceWord, compile_plan,
    fold_duplicate, merge_definition_into_sense,
};
