//! Output formatting utilities

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use staffdesk_core::Outcome;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Report a dispatched command.
///
/// A store warning means the change was applied but not saved; it is
/// printed loudly because the next invocation will not see the change.
pub fn outcome(outcome: &Outcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    success(&outcome.message);
    if let Some(warning) = &outcome.store_warning {
        eprintln!(
            "{} {}",
            "Warning:".yellow().bold(),
            format!("changes were not saved ({})", warning).yellow()
        );
    }
    if let Some(route) = outcome.navigate_to {
        info(&format!("Next: sd open {}", route.fragment()));
    }
    Ok(())
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
