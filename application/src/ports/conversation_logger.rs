//! Port for structured forum event logging.
//!
//! Records what happens in a session (turns, selections, failures,
//! termination) as machine-readable events, typically one JSONL line each.
//! `tracing` covers human-readable diagnostics; this port covers the
//! transcript-level record.
//!
//! Event types emitted by the scheduler:
//!
//! | Event                | When                                        |
//! |----------------------|---------------------------------------------|
//! | `session_started`    | a session is created or resumed             |
//! | `human_turn`         | a human turn is submitted                   |
//! | `round_started`      | scoring begins                              |
//! | `speakers_selected`  | selection is done, with every score         |
//! | `turn_appended`      | a persona turn is written to the log        |
//! | `generation_failed`  | a generator call failed or timed out        |
//! | `persona_dormant`    | a persona crossed the failure threshold     |
//! | `session_terminated` | the session reached `Terminated`            |

use serde_json::Value;

/// A structured forum event.
pub struct ConversationEvent {
    /// Event type identifier, see the table above
    pub event_type: &'static str,
    /// Event-specific fields
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging forum events.
///
/// `log` is synchronous and infallible; adapters swallow their own write errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
