//! CLI command implementations

pub mod context;
pub mod find;
pub mod merge;
pub mod style;

pub use find::{FindOptions, run_find};
pub use merge::{MergeOptions, run_merge};

use anstream::println;
use async_trait::async_trait;
use lexmerge::progress::ProgressCallback;
use style::{Stylize, arrow};

/// Progress reporter that prints one line per store call
#[derive(Debug, Default)]
pub struct CliProgress {
    indent: &'static str,
}

impl CliProgress {
    /// Indented single-line messages, for use under a heading
    pub const fn compact() -> Self {
        Self { indent: "  " }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        println!("{}{} {}", self.indent, arrow(), message.muted());
    }
}
