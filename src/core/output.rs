//! Compact output rendering helpers for CLI surfaces.
//!
//! Keeps command result output bounded and readable while preserving signal.

use crate::core::migration::UpgradeOutcome;
use crate::core::record::ToolRecord;
use crate::core::time;
use colored::Colorize;
use std::path::Path;

/// Collapse newlines/extra whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Two-line summary of a record for `list`.
pub fn render_record(record: &ToolRecord) -> String {
    let serial = record
        .serial_number
        .map(|n| format!("#{}", n))
        .unwrap_or_else(|| "#?".to_string());
    let when = record
        .date_time
        .as_ref()
        .map(time::format_date_time)
        .unwrap_or_else(|| "unknown time".to_string());

    let mut head = format!(
        "{} {} [{}] by {} at {}",
        serial.bright_cyan().bold(),
        record.name.bright_white().bold(),
        record.category.bright_magenta(),
        record.uploaded_by,
        when.dimmed()
    );
    if !record.tool_link.is_empty() {
        head.push_str(&format!(" {}", record.tool_link.underline()));
    }
    format!("{}\n    {}", head, compact_line(&record.purpose, 100))
}

pub fn render_upgrade(outcome: &UpgradeOutcome, path: &Path) -> String {
    match outcome {
        UpgradeOutcome::Created => format!(
            "{} Created catalog at {}",
            "✨".bright_green(),
            path.display()
        ),
        UpgradeOutcome::Upgraded(applied) => {
            let mut out = format!("{} Upgraded catalog at {}", "🔄".bright_yellow(), path.display());
            for m in applied {
                out.push_str(&format!("\n    {} {}", "●".bright_cyan(), m));
            }
            out
        }
        UpgradeOutcome::UpToDate => format!(
            "{} Catalog at {} is up to date",
            "➖".dimmed(),
            path.display()
        ),
    }
}

/// One line per validation message, ready for stderr.
pub fn render_messages(messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| format!("{} {}", "❌".red(), m))
        .collect::<Vec<_>>()
        .join("\n")
}
