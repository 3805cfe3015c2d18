//! Output formatter trait

use forum_domain::SessionSnapshot;

/// Trait for formatting a stored or finished session
pub trait OutputFormatter {
    /// Format the full transcript
    fn format_transcript(&self, snapshot: &SessionSnapshot, show_thinking: bool) -> String;

    /// Format as JSON
    fn format_json(&self, snapshot: &SessionSnapshot) -> String;
}
