//! Log file settings from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write a JSONL event log per session
    pub conversation_log: bool,
    /// Also write diagnostics to a daily rolling file
    pub file: bool,
    /// Directory for both kinds of log
    pub dir: Option<String>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            conversation_log: true,
            file: false,
            dir: None,
        }
    }
}

impl FileLoggingConfig {
    /// Configured directory, or `<data dir>/philosopher-forum/logs`
    pub fn log_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("philosopher-forum")
                .join("logs"),
        }
    }
}
