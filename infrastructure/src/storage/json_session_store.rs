//! JSON file-based session store
//!
//! Each session is one pretty-printed JSON file named after its id.
//! Writes go to a temp file first and are renamed into place, so a crash
//! mid-save leaves the previous snapshot intact.

use async_trait::async_trait;
use forum_application::{SessionStore, StoreError};
use forum_domain::{SessionId, SessionSnapshot, SessionSummary};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const EXTENSION: &str = "json";

fn io_error(e: std::io::Error) -> StoreError {
    StoreError::Io(e.to_string())
}

/// File-based session store
pub struct JsonFileSessionStore {
    dir: PathBuf,
}

impl JsonFileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensure storage directory exists
    pub async fn init(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await.map_err(io_error)
    }

    fn session_path(&self, id: &SessionId) -> PathBuf {
        self.dir.join(format!("{}.{}", id, EXTENSION))
    }

    fn parse(contents: &str) -> Result<SessionSnapshot, StoreError> {
        serde_json::from_str(contents).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        self.init().await?;

        let path = self.session_path(&snapshot.id);
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).await.map_err(io_error)?;
        file.write_all(json.as_bytes()).await.map_err(io_error)?;
        file.flush().await.map_err(io_error)?;
        file.sync_all().await.map_err(io_error)?;
        drop(file);

        fs::rename(&temp_path, &path).await.map_err(io_error)?;
        debug!(session = %snapshot.id, round = snapshot.round, "Saved session snapshot");
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> Result<SessionSnapshot, StoreError> {
        let contents = match fs::read_to_string(self.session_path(id)).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound(*id)),
            Err(e) => return Err(io_error(e)),
        };
        Self::parse(&contents)
    }

    async fn list(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(e)),
        };

        let mut sessions = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let parsed = match fs::read_to_string(&path).await {
                Ok(contents) => Self::parse(&contents),
                Err(e) => Err(io_error(e)),
            };
            match parsed {
                Ok(snapshot) => sessions.push(snapshot.summary()),
                Err(e) => warn!("Skipping unreadable session file {}: {}", path.display(), e),
            }
        }

        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        match fs::remove_file(self.session_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(*id)),
            Err(e) => Err(io_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_domain::{ForumConfig, ForumMode, ForumSession, PersonaPreset};

    fn snapshot(title: &str) -> SessionSnapshot {
        let mut session = ForumSession::new(
            title,
            ForumConfig::new(ForumMode::Debate),
            [PersonaPreset::Socrates.profile(), PersonaPreset::Kant.profile()],
        )
        .unwrap();
        session.submit_human_turn("Is lying ever permissible?").unwrap();
        session.export()
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path().join("sessions"));
        let snapshot = snapshot("lying");

        store.save(&snapshot).await.unwrap();
        let loaded = store.load(&snapshot.id).await.unwrap();

        assert_eq!(loaded.id, snapshot.id);
        assert_eq!(loaded.title, "lying");
        assert_eq!(loaded.turns, snapshot.turns);
        assert_eq!(loaded.participants.len(), 2);
        assert_eq!(loaded.state, snapshot.state);
        assert!(!store.dir().join(format!("{}.json.tmp", snapshot.id)).exists());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path());
        let mut snapshot = snapshot("lying");

        store.save(&snapshot).await.unwrap();
        snapshot.title = "lying, revisited".to_string();
        store.save(&snapshot).await.unwrap();

        let loaded = store.load(&snapshot.id).await.unwrap();
        assert_eq!(loaded.title, "lying, revisited");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path());
        let id = SessionId::new();
        assert!(matches!(
            store.load(&id).await,
            Err(StoreError::NotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_list_sorted_and_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path());

        let mut older = snapshot("older");
        older.updated_at = older.updated_at - chrono::Duration::hours(1);
        let newer = snapshot("newer");
        store.save(&older).await.unwrap();
        store.save(&newer).await.unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let list = store.list().await.unwrap();
        let titles: Vec<_> = list.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "older"]);
        assert_eq!(list[0].participants, vec!["Socrates", "Kant"]);
        assert_eq!(list[0].mode, ForumMode::Debate);
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path().join("absent"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path());
        let snapshot = snapshot("doomed");

        store.save(&snapshot).await.unwrap();
        store.delete(&snapshot.id).await.unwrap();

        assert!(matches!(
            store.load(&snapshot.id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(&snapshot.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSessionStore::new(dir.path());
        let id = SessionId::new();
        std::fs::write(dir.path().join(format!("{}.json", id)), "[]").unwrap();
        assert!(matches!(
            store.load(&id).await,
            Err(StoreError::Serialization(_))
        ));
    }
}
