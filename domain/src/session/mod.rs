//! Forum session domain.
//!
//! - [`forum_session::ForumSession`] - the aggregate owning log, registry and scheduler state
//! - [`state::SchedulerState`] - turn scheduler states
//! - [`snapshot::SessionSnapshot`] - serializable state for `export` / `restore`

pub mod forum_session;
pub mod snapshot;
pub mod state;

pub use forum_session::ForumSession;
pub use snapshot::{SNAPSHOT_VERSION, SessionId, SessionSnapshot, SessionSummary};
pub use state::{SchedulerState, TerminationReason};
