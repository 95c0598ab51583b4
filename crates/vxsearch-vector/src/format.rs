//! Output rendering for ranked results.
//!
//! Each entry renders as `<prefix>:<id> (score <s>): <text>` with the score
//! at two decimals; entries are joined by [`ENTRY_SEPARATOR`].

use crate::types::ResultEntry;

/// Tag placed before every chunk id.
pub const DEFAULT_PREFIX: &str = "EU";

/// Placed between entries, never after the last one.
pub const ENTRY_SEPARATOR: &str = "\n---\n";

/// Renders result entries in rank order.
#[derive(Debug, Clone)]
pub struct ResultFormatter {
    prefix: String,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl ResultFormatter {
    /// Formatter using `prefix` as the entry tag.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Render one entry.
    pub fn format_entry(&self, entry: &ResultEntry) -> String {
        format!(
            "{}:{} (score {:.2}): {}",
            self.prefix, entry.id, entry.score, entry.text
        )
    }

    /// Render all entries, preserving their order. Empty input renders as "".
    pub fn format_results(&self, entries: &[ResultEntry]) -> String {
        entries
            .iter()
            .map(|e| self.format_entry(e))
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR)
    }
}
