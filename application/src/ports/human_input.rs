//! Human input port
//!
//! The scheduler's `AwaitingInput` state blocks on this port in interactive
//! sessions. Adapters decide where the input comes from (a terminal REPL, a
//! queue, a script).

use async_trait::async_trait;
use thiserror::Error;

/// What the human did while the forum was waiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanInput {
    /// A turn to append to the conversation
    Message(String),
    /// Let the philosophers carry on without a new turn
    Continue,
    /// End the session
    EndSession,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HumanInputError {
    #[error("Input cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(String),
}

#[async_trait]
pub trait HumanInputPort: Send + Sync {
    /// Wait for the next input
    async fn next_input(&self) -> Result<HumanInput, HumanInputError>;
}

/// Never provides a turn; every wait asks the forum to carry on.
pub struct AlwaysContinue;

#[async_trait]
impl HumanInputPort for AlwaysContinue {
    async fn next_input(&self) -> Result<HumanInput, HumanInputError> {
        Ok(HumanInput::Continue)
    }
}
