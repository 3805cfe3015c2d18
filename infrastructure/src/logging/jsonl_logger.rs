//! JSONL file writer for forum events.
//!
//! Every [`ConversationEvent`] becomes one [`LogLine`]: the event type, a
//! UTC timestamp, the session id when the log belongs to a session, and the
//! payload fields flattened alongside. Resuming a session appends to the
//! same file.

use chrono::{DateTime, Utc};
use forum_application::{ConversationEvent, ConversationLogger};
use forum_domain::SessionId;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// One line of the log
#[derive(Debug, Serialize)]
struct LogLine<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a SessionId>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// JSONL conversation logger, one JSON object per line.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    session: Option<SessionId>,
}

impl JsonlConversationLogger {
    /// Open (or create) a log at `path` in append mode, creating parent
    /// directories. Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let opened = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| OpenOptions::new().create(true).append(true).open(path));
        match opened {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                path: path.to_path_buf(),
                session: None,
            }),
            Err(e) => {
                warn!("Could not open conversation log {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Log for one session at `<dir>/<session id>.conversation.jsonl`;
    /// every line carries the session id.
    pub fn for_session(dir: impl AsRef<Path>, id: &SessionId) -> Option<Self> {
        Self::new(Self::session_log_path(dir, id)).map(|logger| Self {
            session: Some(*id),
            ..logger
        })
    }

    pub fn session_log_path(dir: impl AsRef<Path>, id: &SessionId) -> PathBuf {
        dir.as_ref().join(format!("{}.conversation.jsonl", id))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    /// Payload fields to flatten; stamped keys win over payload keys
    fn fields(&self, payload: Value) -> Map<String, Value> {
        let mut fields = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => Map::from_iter([("data".to_string(), other)]),
        };
        fields.remove("type");
        fields.remove("timestamp");
        if self.session.is_some() {
            fields.remove("session_id");
        }
        fields
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let line = LogLine {
            event_type: event.event_type,
            timestamp: Utc::now(),
            session_id: self.session.as_ref(),
            fields: self.fields(event.payload),
        };
        let json = match serde_json::to_string(&line) {
            Ok(json) => json,
            Err(e) => {
                warn!("Dropping unserializable {} event: {}", event.event_type, e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", json).and_then(|()| writer.flush());
        }
    }
}
