//! Display helpers for timestamps and environments.

use chrono::{DateTime, Utc};

use crate::config::Environment;

/// Absolute date, e.g. `Jan 5, 2025, 09:30 AM` (UTC).
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Coarse age of `at` relative to `now`; older than a week falls back to [`format_date`].
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds();

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3_600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{} hours ago", seconds / 3_600)
    } else if seconds < 604_800 {
        format!("{} days ago", seconds / 86_400)
    } else {
        format_date(at)
    }
}

/// CSS-style badge class for an environment name; unknown names use the dev badge.
pub fn env_badge_class(environment: &str) -> &'static str {
    match environment.parse::<Environment>() {
        Ok(Environment::Test) => "badge-test",
        Ok(Environment::Prod) => "badge-prod",
        _ => "badge-dev",
    }
}
