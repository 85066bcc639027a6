//! Merge command - review the next duplicate group and submit the result

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::find::print_group;
use crate::cli::style::{Stylize, check};
use anstream::println;
use dialoguer::Confirm;
use lexmerge::error::{Error, Result};
use lexmerge::goal::MergeDupsGoal;
use lexmerge::merge::{MergeExecutionResult, MergePlan, defer_session, submit_session};
use lexmerge::store::LexiconStore;
use lexmerge::tree::{MergeTree, TreeOp, apply_script};
use std::fs;
use std::path::PathBuf;

/// Options for the merge command
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// JSON file with the operations to apply to the group's merge tree
    pub ops: Option<PathBuf>,
    /// Replaces the loose-pass threshold
    pub strictness: Option<f64>,
    /// Dry run - show the compiled plan without submitting
    pub dry_run: bool,
    /// Preview plan and prompt for confirmation before submitting
    pub confirm: bool,
    /// Put the group aside for later instead of merging
    pub defer: bool,
}

/// Run the merge command
pub async fn run_merge(ctx: &CommandContext, options: MergeOptions) -> Result<()> {
    // =========================================================================
    // Phase 1: GATHER - Pick the next eligible group
    // =========================================================================

    let groups = ctx
        .store
        .fetch_duplicate_groups(ctx.max_groups(None), options.strictness)
        .await?;
    let mut goal = MergeDupsGoal::new(groups);
    let Some(group) = goal.next_group(&ctx.store).await? else {
        println!("{}", "No duplicates found.".muted());
        return Ok(());
    };

    println!("{}:", "Reviewing group".emphasis());
    print_group(1, &group);
    println!();

    let mut tree = MergeTree::new(&group.words);

    if options.defer {
        if options.dry_run {
            println!("{}", "Would defer this group".muted());
            return Ok(());
        }
        defer_session(&mut tree, &ctx.store, &CliProgress::compact()).await?;
        println!("{} Deferred", check());
        return Ok(());
    }

    // =========================================================================
    // Phase 2: PLAN - Replay edits and compile (pure)
    // =========================================================================

    if let Some(path) = &options.ops {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Internal(format!("failed to read {}: {e}", path.display())))?;
        let ops: Vec<TreeOp> = serde_json::from_str(&content)?;
        apply_script(&mut tree, &ops)?;
        tree.check_invariants()?;
    }
    let plan = tree.compile_plan();

    // =========================================================================
    // Phase 3: EXECUTE - Effectful operations
    // =========================================================================

    if options.dry_run {
        report_plan(&plan);
        return Ok(());
    }

    if options.confirm {
        report_plan(&plan);
        if !Confirm::new()
            .with_prompt("Submit this merge?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
        println!();
    }

    println!(
        "{} {}",
        "Submitting".emphasis(),
        format!("{} word(s)...", tree.data().word_ids().len()).accent()
    );
    let progress = CliProgress::compact();
    let result = submit_session(&mut tree, &mut goal, &ctx.store, &progress).await?;
    print_summary(&result);

    Ok(())
}

/// Report what would be submitted
fn report_plan(plan: &MergePlan) {
    println!("{}:", "Merge plan".emphasis());
    println!();

    if plan.is_empty() {
        println!(
            "  {}",
            "No changes; the group will be marked as not duplicates".muted()
        );
        println!();
        return;
    }

    for instruction in &plan.instructions {
        if instruction.delete_only {
            println!("  {} {}", "✗ Would delete".warn(), instruction.parent.vernacular);
            println!("    Word: {}", instruction.parent.id.accent());
            continue;
        }
        println!("  {} {}", "✓ Would merge".success(), instruction);
        for sense in &instruction.parent.senses {
            let gloss = sense
                .glosses
                .first()
                .map_or_else(String::new, |g| g.def.clone());
            println!("    {} {}", sense.guid.muted(), gloss);
        }
    }
    println!();
}

/// Print submission summary
fn print_summary(result: &MergeExecutionResult) {
    println!();
    println!("{} Merge complete!", check());
    if !result.parent_ids.is_empty() {
        println!("   Created: {}", result.parent_ids.join(", ").accent());
    }
    if !result.child_ids.is_empty() {
        println!("   Replaced: {}", result.child_ids.join(", ").muted());
    }
    if !result.has_merges() {
        println!("   {}", "Group marked as not duplicates".muted());
    }
}
