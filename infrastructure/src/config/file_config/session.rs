//! Session persistence and pacing from TOML (`[session]` section)

use forum_application::ExecutionParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw session configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Seconds to wait for the human before the personas carry on
    pub input_timeout_seconds: Option<u64>,
    /// Where session snapshots are stored
    pub sessions_dir: Option<String>,
    /// Persist a snapshot after every round, not only at the end
    pub save_every_round: bool,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            input_timeout_seconds: None,
            sessions_dir: None,
            save_every_round: true,
        }
    }
}

impl FileSessionConfig {
    /// Configured directory, or `<data dir>/philosopher-forum/sessions`
    pub fn sessions_dir(&self) -> PathBuf {
        match &self.sessions_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("philosopher-forum")
                .join("sessions"),
        }
    }

    pub fn to_execution_params(&self, generation_timeout: Duration) -> ExecutionParams {
        ExecutionParams::default()
            .with_generation_timeout(Some(generation_timeout))
            .with_input_timeout(self.input_timeout_seconds.map(Duration::from_secs))
            .with_save_every_round(self.save_every_round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_params() {
        let config = FileSessionConfig {
            input_timeout_seconds: Some(30),
            save_every_round: false,
            ..Default::default()
        };
        let params = config.to_execution_params(Duration::from_secs(10));
        assert_eq!(params.generation_timeout, Some(Duration::from_secs(10)));
        assert_eq!(params.input_timeout, Some(Duration::from_secs(30)));
        assert!(!params.save_every_round);
    }

    #[test]
    fn test_explicit_sessions_dir() {
        let config = FileSessionConfig {
            sessions_dir: Some("/tmp/forum".to_string()),
            ..Default::default()
        };
        assert_eq!(config.sessions_dir(), PathBuf::from("/tmp/forum"));
        assert!(
            FileSessionConfig::default()
                .sessions_dir()
                .ends_with("philosopher-forum/sessions")
        );
    }
}
