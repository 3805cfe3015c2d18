//! Lightweight text signals used by activation scoring.

use std::collections::HashSet;

/// Words signalling that a speaker is rejecting a claim
pub const CONTRADICTION_MARKERS: &[&str] = &[
    "disagree", "wrong", "false", "mistaken", "nonsense", "contrary", "deny", "denies",
    "reject", "refute", "absurd", "illusion", "cannot", "fallacy",
];

/// Words signalling that speakers are converging
pub const AGREEMENT_MARKERS: &[&str] = &[
    "agree", "agreed", "common", "share", "shared", "both", "together", "indeed", "likewise",
    "consensus", "align", "reconcile",
];

/// Lowercased word set of `text`, ignoring words of two characters or fewer.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2)
        .map(str::to_lowercase)
        .collect()
}

pub fn is_open_question(text: &str) -> bool {
    text.contains('?')
}

pub fn contains_any(tokens: &HashSet<String>, markers: &[&str]) -> bool {
    markers.iter().any(|m| tokens.contains(*m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_normalizes() {
        let tokens = tokenize("Justice, TRUTH and the Good-life!");
        assert!(tokens.contains("justice"));
        assert!(tokens.contains("truth"));
        assert!(tokens.contains("good"));
        assert!(tokens.contains("life"));
        assert!(tokens.contains("and"));
        assert!(!tokens.contains("to"));
        assert_eq!(tokenize("a to of").len(), 0);
    }

    #[test]
    fn test_markers() {
        let tokens = tokenize("I disagree entirely.");
        assert!(contains_any(&tokens, CONTRADICTION_MARKERS));
        assert!(!contains_any(&tokens, AGREEMENT_MARKERS));
    }

    #[test]
    fn test_open_question() {
        assert!(is_open_question("What is virtue?"));
        assert!(!is_open_question("Virtue is knowledge."));
    }
}
