//! Presentation-level configuration
//!
//! Configuration for transcript output and REPL behavior.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Print each persona's private reasoning
    pub show_thinking: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            show_thinking: false,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// Configured history file, or `<data dir>/philosopher-forum/history.txt`
    pub fn history_path(&self) -> Option<PathBuf> {
        match &self.history_file {
            Some(path) => Some(expand_home(path)),
            None => dirs::data_dir().map(|p| p.join("philosopher-forum").join("history.txt")),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_history_file() {
        let config = ReplConfig {
            history_file: Some("/tmp/forum_history".to_string()),
            ..Default::default()
        };
        assert_eq!(config.history_path(), Some(PathBuf::from("/tmp/forum_history")));
    }

    #[test]
    fn test_home_is_expanded() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.forum_history"), home.join(".forum_history"));
        }
        assert_eq!(expand_home("relative/path"), PathBuf::from("relative/path"));
    }
}
