//! Run Forum use case
//!
//! Drives a [`TurnScheduler`] until its session terminates. Interactive
//! sessions wait for human input before each round (with an optional
//! timeout that lets the philosophers carry on); autonomous sessions go
//! straight from one round to the next.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::human_input::{HumanInput, HumanInputError, HumanInputPort};
use crate::ports::response_generator::ResponseGenerator;
use crate::ports::session_store::{NoSessionStore, SessionStore, StoreError};
use crate::use_cases::turn_scheduler::{SchedulerError, TurnScheduler};
use forum_domain::{SessionId, TerminationReason};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum RunForumError {
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),

    #[error("Input error: {0}")]
    Input(#[from] HumanInputError),
}

/// Result of a finished forum run
#[derive(Debug, Clone, PartialEq)]
pub struct RunForumOutput {
    pub session_id: SessionId,
    /// Completed rounds over the session's lifetime
    pub rounds: u32,
    /// Rounds played by this run
    pub rounds_this_run: u32,
    pub turns: usize,
    pub termination: Option<TerminationReason>,
}

pub struct RunForumUseCase<G: ResponseGenerator + 'static> {
    scheduler: Arc<TurnScheduler<G>>,
    input: Arc<dyn HumanInputPort>,
    store: Arc<dyn SessionStore>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: ResponseGenerator + 'static> RunForumUseCase<G> {
    pub fn new(scheduler: Arc<TurnScheduler<G>>, input: Arc<dyn HumanInputPort>) -> Self {
        Self {
            scheduler,
            input,
            store: Arc::new(NoSessionStore),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn scheduler(&self) -> &Arc<TurnScheduler<G>> {
        &self.scheduler
    }

    pub async fn execute(&self) -> Result<RunForumOutput, RunForumError> {
        let summary = self.scheduler.summary().await;
        info!(
            "Forum {} ({} mode, {} participants) starting at round {}",
            summary.id,
            summary.mode,
            summary.participants.len(),
            summary.round + 1
        );
        self.logger.log(ConversationEvent::new(
            "session_started",
            json!({
                "session_id": summary.id.to_string(),
                "title": summary.title,
                "mode": summary.mode.as_str(),
                "participants": summary.participants,
                "generator": self.scheduler.generator_name(),
                "resumed": summary.turn_count > 0,
            }),
        ));

        let autonomous = self.scheduler.is_autonomous().await;
        let mut rounds_this_run = 0;

        while !self.scheduler.is_terminated().await {
            if !autonomous && !self.await_human().await? {
                break;
            }
            if self.scheduler.is_terminated().await {
                break;
            }

            let outcome = self.scheduler.start_round().await?;
            rounds_this_run += 1;
            debug!("Round {} outcome: {:?}", outcome.round, outcome.termination);

            if self.scheduler.params().save_every_round
                && let Err(e) = self.save().await
            {
                warn!("Failed to save session after round {}: {}", outcome.round, e);
            }
            if outcome.termination.is_some() {
                break;
            }
        }

        self.save().await?;
        let summary = self.scheduler.summary().await;
        Ok(RunForumOutput {
            session_id: summary.id,
            rounds: summary.round,
            rounds_this_run,
            turns: summary.turn_count,
            termination: summary.termination,
        })
    }

    /// Wait in `AwaitingInput`. Returns `false` when the session ended while waiting.
    async fn await_human(&self) -> Result<bool, RunForumError> {
        let token = self.scheduler.cancellation_token().clone();
        let timeout = self.scheduler.params().input_timeout;
        let wait = async {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, self.input.next_input())
                    .await
                    .ok(),
                None => Some(self.input.next_input().await),
            }
        };

        let received = tokio::select! {
            biased;
            _ = token.cancelled() => {
                self.scheduler.cancel().await;
                return Ok(false);
            }
            received = wait => received,
        };

        match received {
            None => {
                debug!("No human input before timeout; advancing");
                Ok(true)
            }
            Some(Ok(HumanInput::Message(text))) => {
                self.scheduler.submit_human_turn(&text).await?;
                Ok(true)
            }
            Some(Ok(HumanInput::Continue)) => Ok(true),
            Some(Ok(HumanInput::EndSession)) => {
                self.scheduler.request_termination().await?;
                Ok(false)
            }
            Some(Err(HumanInputError::Cancelled)) => {
                self.scheduler.cancel().await;
                Ok(false)
            }
            Some(Err(e)) => Err(e.into()),
        }
    }

    async fn save(&self) -> Result<(), StoreError> {
        let snapshot = self.scheduler.export().await;
        self.store.save(&snapshot).await
    }
}
