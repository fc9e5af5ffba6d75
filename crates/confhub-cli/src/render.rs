//! Terminal rendering of records and previews.

use chrono::Utc;
use colored::{ColoredString, Colorize};
use confhub_core::config::{ConfigSummary, Environment, Preview, Timestamp};
use confhub_core::format::{env_badge_class, format_date, format_relative_time};

/// Environment label colored like its badge.
pub fn env_badge(environment: Environment) -> ColoredString {
    let label = format!("{:<4}", environment.as_str());
    match env_badge_class(environment.as_str()) {
        "badge-prod" => label.red(),
        "badge-test" => label.yellow(),
        _ => label.green(),
    }
}

pub fn relative(at: &Timestamp) -> String {
    format_relative_time(at.as_datetime(), Utc::now())
}

pub fn date(at: &Timestamp) -> String {
    format_date(at.as_datetime())
}

pub fn active_marker(is_active: bool) -> ColoredString {
    if is_active {
        "active".green().bold()
    } else {
        "inactive".dimmed()
    }
}

/// One line per version: id, version, state, author and age.
pub fn version_line(config: &ConfigSummary) -> String {
    format!(
        "{:>6}  v{:<4} {:<9} {:<28} {}",
        config.id.to_string(),
        config.version,
        active_marker(config.is_active),
        config.created_by,
        relative(&config.created_at)
    )
}

/// Prints a preview followed by its truncation note.
pub fn print_preview(preview: &Preview) {
    println!("{}", preview.text());
    if let Some(note) = preview.truncation_note() {
        println!("{}", note.dimmed());
    }
}
