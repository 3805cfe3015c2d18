//! Line editing on a dedicated thread
//!
//! rustyline blocks while it waits for a line, so the editor lives on its
//! own thread and hands lines back to async callers over oneshot channels.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use std::sync::mpsc;
use tokio::sync::oneshot;
use tracing::warn;

/// Result of reading one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl-C at the prompt
    Interrupted,
    /// Ctrl-D or closed stdin
    Eof,
    Failed(String),
}

struct ReadRequest {
    prompt: String,
    reply: oneshot::Sender<ReadOutcome>,
}

/// Async handle to the editor thread
pub struct LineReader {
    requests: mpsc::Sender<ReadRequest>,
}

impl LineReader {
    /// Start the editor thread, loading history from `history` if given
    pub fn spawn(history: Option<PathBuf>) -> std::io::Result<Self> {
        let (requests, receiver) = mpsc::channel::<ReadRequest>();
        std::thread::Builder::new()
            .name("forum-repl".to_string())
            .spawn(move || Self::run(receiver, history))?;
        Ok(Self { requests })
    }

    fn run(receiver: mpsc::Receiver<ReadRequest>, history: Option<PathBuf>) {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                for request in receiver {
                    let _ = request.reply.send(ReadOutcome::Failed(e.to_string()));
                }
                return;
            }
        };

        if let Some(path) = &history {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = editor.load_history(path);
        }

        for request in receiver {
            let outcome = match editor.readline(&request.prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                        if let Some(path) = &history
                            && let Err(e) = editor.save_history(path)
                        {
                            warn!("Could not save REPL history: {}", e);
                        }
                    }
                    ReadOutcome::Line(line)
                }
                Err(ReadlineError::Interrupted) => ReadOutcome::Interrupted,
                Err(ReadlineError::Eof) => ReadOutcome::Eof,
                Err(e) => ReadOutcome::Failed(e.to_string()),
            };
            let _ = request.reply.send(outcome);
        }
    }

    pub async fn read_line(&self, prompt: &str) -> ReadOutcome {
        let (reply, response) = oneshot::channel();
        let request = ReadRequest {
            prompt: prompt.to_string(),
            reply,
        };
        if self.requests.send(request).is_err() {
            return ReadOutcome::Failed("line editor thread has stopped".to_string());
        }
        response
            .await
            .unwrap_or_else(|_| ReadOutcome::Failed("line editor thread has stopped".to_string()))
    }
}
