//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escapes when stdout is
//! not a color terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Success mark
pub const CHECK: &str = "✓";
/// Step marker
pub const ARROW: &str = "→";

/// Semantic colors for CLI output
pub trait Stylize {
    /// Secondary information
    fn muted(&self) -> String;
    /// Headings and names
    fn emphasis(&self) -> String;
    /// Ids and counts
    fn accent(&self) -> String;
    /// Completed actions
    fn success(&self) -> String;
    /// Problems the user should look at
    fn warn(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Dimmed arrow
pub fn arrow() -> String {
    ARROW.muted()
}

/// Spinner used while waiting on the store
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
