//! Turn scheduler
//!
//! Drives one [`ForumSession`] through its rounds:
//!
//! ```text
//! AwaitingInput → Scoring → Selecting → Generating → Appending → Evaluating
//! ```
//!
//! The session sits behind a single `RwLock`. The write lock is held while
//! scoring and selecting, and again while appending and evaluating; it is
//! released during generation so readers (`tail`, `all`) and human turns are
//! never blocked by a slow generator. Readers therefore always see either
//! none or all of a round's turns.
//!
//! Generation fans out over a `JoinSet` and joins every call before anything
//! is written. Results are appended in selection order, not completion order.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::persona_memory::{NoPersonaMemory, PersonaMemoryPort};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::response_generator::{
    ContextWindow, GeneratedResponse, GenerationError, GenerationRequest, ResponseGenerator,
};
use forum_domain::{
    ActivationScorer, DomainError, ForumSession, ParticipantRecord, PersonaId, SchedulerState,
    SessionSnapshot, SessionSummary, TerminationReason, TraitAffinityScorer, Turn,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors returned synchronously by scheduler operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl SchedulerError {
    /// The operation was rejected because of the session's state
    pub fn is_invalid_transition(&self) -> bool {
        match self {
            SchedulerError::Domain(e) => e.is_invalid_transition(),
        }
    }
}

/// What happened in one round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    pub round: u32,
    /// Speakers in selection order
    pub selected: Vec<PersonaId>,
    /// Sequence numbers of appended persona turns
    pub appended: Vec<u64>,
    pub failures: Vec<(PersonaId, GenerationError)>,
    pub newly_dormant: Vec<PersonaId>,
    pub termination: Option<TerminationReason>,
}

impl RoundOutcome {
    fn new(round: u32, selected: Vec<PersonaId>) -> Self {
        Self {
            round,
            selected,
            appended: Vec::new(),
            failures: Vec::new(),
            newly_dormant: Vec::new(),
            termination: None,
        }
    }
}

/// Read-only view of a session for front ends
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<RwLock<ForumSession>>,
}

impl SessionHandle {
    pub async fn tail(&self, n: usize) -> Vec<Turn> {
        self.session.read().await.tail(n).to_vec()
    }

    pub async fn all(&self) -> Vec<Turn> {
        self.session.read().await.log().all().to_vec()
    }

    pub async fn state(&self) -> SchedulerState {
        self.session.read().await.state()
    }

    pub async fn summary(&self) -> SessionSummary {
        self.session.read().await.summary()
    }

    pub async fn participants(&self) -> Vec<ParticipantRecord> {
        self.session.read().await.registry().records().to_vec()
    }
}

pub struct TurnScheduler<G: ResponseGenerator + 'static> {
    generator: Arc<G>,
    session: Arc<RwLock<ForumSession>>,
    scorer: Arc<dyn ActivationScorer>,
    memory: Arc<dyn PersonaMemoryPort>,
    progress: Arc<dyn ProgressNotifier>,
    logger: Arc<dyn ConversationLogger>,
    cancellation: CancellationToken,
    params: ExecutionParams,
}

impl<G: ResponseGenerator + 'static> TurnScheduler<G> {
    pub fn new(generator: Arc<G>, session: ForumSession) -> Self {
        Self {
            generator,
            session: Arc::new(RwLock::new(session)),
            scorer: Arc::new(TraitAffinityScorer::new()),
            memory: Arc::new(NoPersonaMemory),
            progress: Arc::new(NoProgress),
            logger: Arc::new(NoConversationLogger),
            cancellation: CancellationToken::new(),
            params: ExecutionParams::default(),
        }
    }

    /// Resume a persisted session
    pub fn restore(generator: Arc<G>, snapshot: SessionSnapshot) -> Result<Self, SchedulerError> {
        Ok(Self::new(generator, ForumSession::restore(snapshot)?))
    }

    // ==================== Builder Methods ====================

    pub fn with_scorer(mut self, scorer: Arc<dyn ActivationScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_memory(mut self, memory: Arc<dyn PersonaMemoryPort>) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    // ==================== Accessors ====================

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            session: Arc::clone(&self.session),
        }
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub async fn tail(&self, n: usize) -> Vec<Turn> {
        self.session.read().await.tail(n).to_vec()
    }

    pub async fn all(&self) -> Vec<Turn> {
        self.session.read().await.log().all().to_vec()
    }

    pub async fn state(&self) -> SchedulerState {
        self.session.read().await.state()
    }

    pub async fn termination(&self) -> Option<TerminationReason> {
        self.session.read().await.termination()
    }

    pub async fn is_terminated(&self) -> bool {
        self.session.read().await.is_terminated()
    }

    pub async fn is_autonomous(&self) -> bool {
        self.session.read().await.config().autonomous
    }

    pub async fn summary(&self) -> SessionSummary {
        self.session.read().await.summary()
    }

    pub async fn export(&self) -> SessionSnapshot {
        self.session.read().await.export()
    }

    // ==================== Session Control ====================

    /// Submit a human turn.
    ///
    /// Returns the sequence number when appended right away, `None` when
    /// queued behind the round in progress.
    pub async fn submit_human_turn(&self, text: &str) -> Result<Option<u64>, SchedulerError> {
        let mut session = self.session.write().await;
        let sequence = session.submit_human_turn(text)?;
        match sequence {
            Some(seq) => {
                if let Some(turn) = session.log().last() {
                    self.progress.on_turn_appended(turn);
                }
                self.logger.log(ConversationEvent::new(
                    "human_turn",
                    json!({ "sequence": seq, "content": text.trim(), "queued": false }),
                ));
            }
            None => {
                debug!("Human turn queued until round {} completes", session.current_round());
                self.logger.log(ConversationEvent::new(
                    "human_turn",
                    json!({ "content": text.trim(), "queued": true }),
                ));
            }
        }
        Ok(sequence)
    }

    /// End the session: immediately when idle, after the current round otherwise.
    pub async fn request_termination(&self) -> Result<(), SchedulerError> {
        let mut session = self.session.write().await;
        session.request_end()?;
        if let Some(reason) = session.termination() {
            self.notify_terminated(&session, reason);
        }
        Ok(())
    }

    /// Fire the cancellation token.
    ///
    /// An idle session terminates right away; a round in progress stops at
    /// its next state boundary and discards in-flight results.
    pub async fn cancel(&self) {
        self.cancellation.cancel();
        let mut session = self.session.write().await;
        if session.state() == SchedulerState::AwaitingInput {
            session.terminate(TerminationReason::Cancelled);
            self.notify_terminated(&session, TerminationReason::Cancelled);
        }
    }

    // ==================== Round ====================

    /// Play one round: score, select, generate, append, evaluate.
    ///
    /// Fails with an invalid transition if the session has terminated or a
    /// round is already in progress.
    pub async fn start_round(&self) -> Result<RoundOutcome, SchedulerError> {
        // Scoring → Selecting → Generating under the write lock
        let (round, selected, requests) = {
            let mut session = self.session.write().await;
            let round = session.begin_round()?;
            if self.cancellation.is_cancelled() {
                return Ok(self.finish_cancelled(&mut session, round, Vec::new()));
            }
            info!("Round {} started", round);
            self.logger
                .log(ConversationEvent::new("round_started", json!({ "round": round })));

            let candidates = session.score_participants(self.scorer.as_ref());
            session.transition(SchedulerState::Selecting)?;
            let selected = session.select_speakers(&candidates);
            debug!(
                "Round {} scores: {:?}",
                round,
                candidates
                    .iter()
                    .map(|c| (c.persona.as_str(), c.score))
                    .collect::<Vec<_>>()
            );
            self.logger.log(ConversationEvent::new(
                "speakers_selected",
                json!({
                    "round": round,
                    "scores": candidates
                        .iter()
                        .map(|c| json!({ "persona": c.persona.as_str(), "score": c.score }))
                        .collect::<Vec<_>>(),
                    "selected": selected.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
                }),
            ));

            if self.cancellation.is_cancelled() {
                return Ok(self.finish_cancelled(&mut session, round, selected));
            }
            session.transition(SchedulerState::Generating)?;
            let requests = self.build_requests(&session, &selected, round)?;
            (round, selected, requests)
        };

        self.progress.on_round_start(round, &selected);

        let results = match self.generate_all(requests).await {
            Some(results) => results,
            None => {
                let mut session = self.session.write().await;
                return Ok(self.finish_cancelled(&mut session, round, selected));
            }
        };

        // Appending → Evaluating under the write lock
        let mut session = self.session.write().await;
        if self.cancellation.is_cancelled() {
            return Ok(self.finish_cancelled(&mut session, round, selected));
        }
        session.transition(SchedulerState::Appending)?;
        session.tick_cooldowns();

        let mut outcome = RoundOutcome::new(round, selected.clone());
        for (persona, result) in selected.iter().zip(results) {
            match result.and_then(non_empty) {
                Ok(response) => {
                    let sequence =
                        session.append_persona_turn(persona, response.content, response.thinking)?;
                    if let Some(turn) = session.log().last() {
                        self.progress.on_turn_appended(turn);
                        self.logger.log(ConversationEvent::new(
                            "turn_appended",
                            json!({
                                "round": round,
                                "sequence": sequence,
                                "persona": persona.as_str(),
                                "content": turn.content,
                                "thinking": turn.thinking,
                            }),
                        ));
                    }
                    outcome.appended.push(sequence);
                }
                Err(error) => {
                    warn!("Persona {} failed in round {}: {}", persona, round, error);
                    self.progress.on_generation_failed(persona, &error);
                    self.logger.log(ConversationEvent::new(
                        "generation_failed",
                        json!({
                            "round": round,
                            "persona": persona.as_str(),
                            "error": error.to_string(),
                        }),
                    ));
                    if session.record_generation_failure(persona)? {
                        warn!("Persona {} is now dormant", persona);
                        self.progress.on_persona_dormant(persona);
                        self.logger.log(ConversationEvent::new(
                            "persona_dormant",
                            json!({ "round": round, "persona": persona.as_str() }),
                        ));
                        outcome.newly_dormant.push(persona.clone());
                    }
                    outcome.failures.push((persona.clone(), error));
                }
            }
        }

        let queued = session.flush_pending_human_turns()?;
        let appended_turns = session.log().all();
        for sequence in &queued {
            if let Some(turn) = appended_turns.iter().rev().find(|t| t.sequence == *sequence) {
                self.progress.on_turn_appended(turn);
                self.logger.log(ConversationEvent::new(
                    "human_turn",
                    json!({ "sequence": sequence, "content": turn.content, "queued": false }),
                ));
            }
        }

        session.transition(SchedulerState::Evaluating)?;
        outcome.termination = session.evaluate(selected.len())?;
        info!(
            "Round {} complete: {} appended, {} failed",
            round,
            outcome.appended.len(),
            outcome.failures.len()
        );
        self.progress.on_round_complete(round, outcome.appended.len());
        if let Some(reason) = outcome.termination {
            self.notify_terminated(&session, reason);
        }
        Ok(outcome)
    }

    fn build_requests(
        &self,
        session: &ForumSession,
        selected: &[PersonaId],
        round: u32,
    ) -> Result<Vec<GenerationRequest>, SchedulerError> {
        let turns = session.context_window();
        let mode = session.config().mode;
        selected
            .iter()
            .map(|id| {
                let profile = session.registry().get(id)?.profile.clone();
                let visible = turns.iter().map(|turn| turn.visible_to(id)).collect();
                Ok(GenerationRequest {
                    context: ContextWindow::new(visible)
                        .with_memory(self.memory.memory_for(id)),
                    persona: profile,
                    mode,
                    round,
                })
            })
            .collect()
    }

    /// Fan out one generation call per request and join them all.
    ///
    /// Results come back in request order. Returns `None` if cancelled
    /// before every call finished; outstanding calls are aborted.
    async fn generate_all(
        &self,
        requests: Vec<GenerationRequest>,
    ) -> Option<Vec<Result<GeneratedResponse, GenerationError>>> {
        let mut results: Vec<Option<Result<GeneratedResponse, GenerationError>>> =
            (0..requests.len()).map(|_| None).collect();
        let mut join_set = JoinSet::new();

        for (index, request) in requests.into_iter().enumerate() {
            let generator = Arc::clone(&self.generator);
            let timeout = self.params.generation_timeout;
            join_set.spawn(async move {
                let persona = request.persona.id.clone();
                let result = match timeout {
                    Some(limit) => tokio::time::timeout(limit, generator.generate(request))
                        .await
                        .unwrap_or(Err(GenerationError::Timeout)),
                    None => generator.generate(request).await,
                };
                (index, persona, result)
            });
        }

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => {
                    join_set.abort_all();
                    return None;
                }
                next = join_set.join_next() => next,
            };
            match next {
                Some(Ok((index, persona, result))) => {
                    self.progress
                        .on_generation_complete(&persona, result.is_ok());
                    results[index] = Some(result);
                }
                Some(Err(e)) => {
                    warn!("Generation task join error: {}", e);
                }
                None => break,
            }
        }

        Some(
            results
                .into_iter()
                .map(|r| {
                    r.unwrap_or_else(|| Err(GenerationError::Other("generation task aborted".into())))
                })
                .collect(),
        )
    }

    fn finish_cancelled(
        &self,
        session: &mut ForumSession,
        round: u32,
        selected: Vec<PersonaId>,
    ) -> RoundOutcome {
        info!("Round {} cancelled", round);
        session.terminate(TerminationReason::Cancelled);
        let reason = session.termination().unwrap_or(TerminationReason::Cancelled);
        self.notify_terminated(session, reason);
        let mut outcome = RoundOutcome::new(round, selected);
        outcome.termination = Some(reason);
        outcome
    }

    fn notify_terminated(&self, session: &ForumSession, reason: TerminationReason) {
        info!(
            "Session {} terminated after {} rounds: {}",
            session.id(),
            session.round(),
            reason.description()
        );
        self.progress.on_session_terminated(reason);
        self.logger.log(ConversationEvent::new(
            "session_terminated",
            json!({
                "session_id": session.id().to_string(),
                "reason": reason.as_str(),
                "rounds": session.round(),
                "turns": session.log().len(),
            }),
        ));
    }
}

fn non_empty(response: GeneratedResponse) -> Result<GeneratedResponse, GenerationError> {
    if response.content.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(response)
    }
}
