//! Find command - list likely duplicate groups

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use lexmerge::error::Result;
use lexmerge::store::LexiconStore;
use lexmerge::types::WordGroup;
use std::time::Duration;

/// Options for the find command
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Number of groups to list (config default if unset)
    pub max_groups: Option<usize>,
    /// Replaces the loose-pass threshold
    pub strictness: Option<f64>,
    /// Print groups as JSON instead of a table
    pub json: bool,
}

/// Run the find command
pub async fn run_find(ctx: &CommandContext, options: FindOptions) -> Result<()> {
    let max_groups = ctx.max_groups(options.max_groups);

    let groups = if options.json {
        ctx.store
            .fetch_duplicate_groups(max_groups, options.strictness)
            .await?
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(format!(
            "Scanning {}...",
            ctx.words_path.display().emphasis()
        ));
        spinner.enable_steady_tick(Duration::from_millis(80));
        let groups = ctx
            .store
            .fetch_duplicate_groups(max_groups, options.strictness)
            .await;
        spinner.finish_and_clear();
        groups?
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("{}", "No duplicates found.".muted());
    } else {
        println!(
            "{} {}",
            "Found".emphasis(),
            format!("{} duplicate group(s)", groups.len()).accent()
        );
        for (i, group) in groups.iter().enumerate() {
            print_group(i + 1, group);
        }
    }

    let deferred = ctx.store.exclusions().await.graylist.len();
    if deferred > 0 {
        println!();
        println!(
            "{}",
            format!("{deferred} group(s) deferred for later review").muted()
        );
    }
    Ok(())
}

/// Print one group with its members' senses
pub fn print_group(number: usize, group: &WordGroup) {
    println!();
    println!(
        "  {} {}",
        format!("#{number}").emphasis(),
        format!("(score {:.1})", group.score).muted()
    );
    for word in &group.words {
        let glosses: Vec<&str> = word
            .senses
            .iter()
            .flat_map(|s| s.glosses.iter().map(|g| g.def.as_str()))
            .filter(|g| !g.is_empty())
            .collect();
        println!(
            "    {} {} {}",
            word.vernacular.emphasis(),
            word.id.accent(),
            glosses.join("; ").muted()
        );
    }
}
