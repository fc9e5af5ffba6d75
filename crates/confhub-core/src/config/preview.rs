//! Pretty-printed previews of parsed configs.

use super::value::ConfigValue;

/// Number of lines shown by default when a preview is truncated for display.
pub const DEFAULT_PREVIEW_LINES: usize = 50;

/// Pretty-prints a value as JSON with 2-space indentation.
pub fn pretty_print(value: &ConfigValue) -> String {
    // A ConfigValue only holds finite numbers and string keys, which always serialize.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Rendered preview text, optionally cut to its first lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    text: String,
    total_lines: usize,
    shown_lines: usize,
}

impl Preview {
    /// Renders the full preview.
    pub fn render(value: &ConfigValue) -> Self {
        let text = pretty_print(value);
        let total_lines = text.lines().count();
        Self {
            text,
            total_lines,
            shown_lines: total_lines,
        }
    }

    /// Renders the preview keeping at most `max_lines` lines.
    pub fn render_truncated(value: &ConfigValue, max_lines: usize) -> Self {
        let full = Self::render(value);
        if full.total_lines <= max_lines {
            return full;
        }

        let text = full
            .text
            .lines()
            .take(max_lines)
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            text,
            total_lines: full.total_lines,
            shown_lines: max_lines,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_truncated(&self) -> bool {
        self.shown_lines < self.total_lines
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Footer shown under a truncated preview.
    pub fn truncation_note(&self) -> Option<String> {
        self.is_truncated().then(|| {
            format!(
                "... showing {} of {} lines",
                self.shown_lines, self.total_lines
            )
        })
    }
}
