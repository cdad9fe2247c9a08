//! Formatting utilities for CLI output.
//!
//! Provides consistent styling for values, section listings and error
//! messages printed by CLI commands.

use crate::ops::ChildEntry;

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow color
    pub const YELLOW: &'static str = "\x1b[33m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats an error label for stderr output.
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats a section header line.
pub fn format_header(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::CYAN, text, Colors::RESET)
}

/// Formats one child entry of a section listing.
///
/// Sections get a trailing `/`, buildable units an extra marker, and
/// flat entries show their value.
pub fn format_child(entry: &ChildEntry) -> String {
    match (&entry.value, entry.buildable) {
        (Some(value), _) => format!("{} = {}", entry.name, value),
        (None, true) => format!(
            "{}/ {}{}(buildable){}",
            entry.name,
            Colors::DIM,
            Colors::GREEN,
            Colors::RESET
        ),
        (None, false) => format!("{}/", entry.name),
    }
}
