//! Forum session aggregate
//!
//! Owns the conversation log, the participant registry and the scheduler
//! state of one conversation. Every mutation goes through a method that
//! checks the current [`SchedulerState`] first, so an operation on a
//! terminated session is rejected instead of silently ignored.

use super::snapshot::{SNAPSHOT_VERSION, SessionId, SessionSnapshot, SessionSummary};
use super::state::{SchedulerState, TerminationReason};
use crate::conversation::{ConversationLog, NewTurn, Turn};
use crate::core::error::DomainError;
use crate::forum::ForumConfig;
use crate::participant::ParticipantRegistry;
use crate::persona::{PersonaId, PersonaProfile};
use crate::scoring::{ActivationScorer, ScoredCandidate, select_speakers};
use chrono::{DateTime, Utc};
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone)]
pub struct ForumSession {
    id: SessionId,
    title: String,
    config: ForumConfig,
    log: ConversationLog,
    registry: ParticipantRegistry,
    state: SchedulerState,
    /// Completed rounds; never exceeds the hard ceiling
    round: u32,
    termination: Option<TerminationReason>,
    end_requested: bool,
    /// Human turns submitted while a round was in progress
    pending_human_turns: VecDeque<String>,
    /// A human spoke since the last evaluation
    human_input_this_round: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ForumSession {
    /// Create a session with the given participants.
    ///
    /// Fails on an invalid configuration, an empty line-up or a duplicate
    /// persona id.
    pub fn new(
        title: impl Into<String>,
        config: ForumConfig,
        participants: impl IntoIterator<Item = PersonaProfile>,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        let mut registry = ParticipantRegistry::new();
        for profile in participants {
            registry.register_profile(profile)?;
        }
        if registry.is_empty() {
            return Err(DomainError::InvalidConfig(
                "a forum needs at least one participant".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: SessionId::new(),
            title: title.into(),
            config,
            log: ConversationLog::new(),
            registry,
            state: SchedulerState::AwaitingInput,
            round: 0,
            termination: None,
            end_requested: false,
            pending_human_turns: VecDeque::new(),
            human_input_this_round: false,
            created_at: now,
            updated_at: now,
        })
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn config(&self) -> &ForumConfig {
        &self.config
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of completed rounds
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The round that is in progress, or that the next `start_round` will play
    pub fn current_round(&self) -> u32 {
        self.round + 1
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        self.termination
    }

    pub fn is_terminated(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn end_requested(&self) -> bool {
        self.end_requested
    }

    pub fn pending_human_turns(&self) -> usize {
        self.pending_human_turns.len()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn tail(&self, n: usize) -> &[Turn] {
        self.log.tail(n)
    }

    // ==================== State Machine ====================

    /// Reject `operation` if the session has terminated.
    pub fn ensure_active(&self, operation: &'static str) -> Result<(), DomainError> {
        if self.state.is_terminal() {
            return Err(DomainError::InvalidTransition {
                operation,
                state: self.state.as_str(),
            });
        }
        Ok(())
    }

    pub fn transition(&mut self, next: SchedulerState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                operation: next.entry_operation(),
                state: self.state.as_str(),
            });
        }
        self.state = next;
        Ok(())
    }

    /// Move to `Terminated`. The first recorded reason wins.
    pub fn terminate(&mut self, reason: TerminationReason) {
        if self.termination.is_none() {
            self.termination = Some(reason);
        }
        self.state = SchedulerState::Terminated;
        self.updated_at = Utc::now();
    }

    /// Enter `Scoring` for the next round and return its number.
    pub fn begin_round(&mut self) -> Result<u32, DomainError> {
        self.ensure_active("start a round")?;
        if self.state != SchedulerState::AwaitingInput {
            return Err(DomainError::InvalidTransition {
                operation: "start a round",
                state: self.state.as_str(),
            });
        }
        self.transition(SchedulerState::Scoring)?;
        Ok(self.current_round())
    }

    // ==================== Round Steps ====================

    /// Score every non-dormant participant against the scoring window.
    pub fn score_participants(&self, scorer: &dyn ActivationScorer) -> Vec<ScoredCandidate> {
        let tail = self.log.tail(self.config.scoring_window);
        self.registry
            .active()
            .map(|record| {
                ScoredCandidate::new(
                    record.id().clone(),
                    scorer.score(record, tail, self.config.mode),
                )
            })
            .collect()
    }

    /// Apply the selection policy to this round's candidates
    pub fn select_speakers(&self, candidates: &[ScoredCandidate]) -> Vec<PersonaId> {
        select_speakers(
            candidates,
            &self.registry,
            &self.config,
            self.current_round(),
        )
    }

    /// Context handed to generators: the most recent turns
    pub fn context_window(&self) -> &[Turn] {
        self.log.tail(self.config.context_window)
    }

    /// Decrement cooldowns for the current round; a no-op if already applied.
    pub fn tick_cooldowns(&mut self) -> bool {
        let round = self.current_round();
        self.registry.reset_cooldowns(round)
    }

    /// Append a generated turn and update the speaker's record.
    ///
    /// Only valid while `Appending`.
    pub fn append_persona_turn(
        &mut self,
        persona: &PersonaId,
        content: impl Into<String>,
        thinking: Option<String>,
    ) -> Result<u64, DomainError> {
        self.require_state(SchedulerState::Appending, "append a persona turn")?;
        self.registry.get(persona)?;
        let round = self.current_round();
        let sequence = self
            .log
            .append(NewTurn::persona(persona.clone(), content, round).with_thinking(thinking))?;
        self.registry
            .apply_post_turn_update(persona, round, self.config.cooldown_rounds)?;
        self.updated_at = Utc::now();
        Ok(sequence)
    }

    /// Count a failed generation; returns `true` if the persona just went dormant.
    pub fn record_generation_failure(&mut self, persona: &PersonaId) -> Result<bool, DomainError> {
        self.registry
            .record_failure(persona, self.config.failure_dormancy_threshold)
    }

    /// Submit a human turn.
    ///
    /// Appended immediately while awaiting input (returns its sequence number);
    /// queued until the current round's `Appending` step otherwise.
    pub fn submit_human_turn(&mut self, text: &str) -> Result<Option<u64>, DomainError> {
        self.ensure_active("submit a human turn")?;
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::EmptyTurn);
        }
        self.human_input_this_round = true;
        if self.state == SchedulerState::AwaitingInput {
            let sequence = self.append_human(text.to_string())?;
            return Ok(Some(sequence));
        }
        self.pending_human_turns.push_back(text.to_string());
        Ok(None)
    }

    /// Append human turns queued during the round, in submission order.
    pub fn flush_pending_human_turns(&mut self) -> Result<Vec<u64>, DomainError> {
        let mut sequences = Vec::with_capacity(self.pending_human_turns.len());
        while let Some(text) = self.pending_human_turns.pop_front() {
            sequences.push(self.append_human(text)?);
        }
        Ok(sequences)
    }

    fn append_human(&mut self, text: String) -> Result<u64, DomainError> {
        let sequence = self.log.append(NewTurn::human(text, self.current_round()))?;
        self.registry.reset_consecutive_counts();
        self.updated_at = Utc::now();
        Ok(sequence)
    }

    /// Ask the session to end.
    ///
    /// Takes effect immediately while idle, otherwise at the end of the
    /// current round.
    pub fn request_end(&mut self) -> Result<(), DomainError> {
        self.ensure_active("request termination")?;
        self.end_requested = true;
        if self.state == SchedulerState::AwaitingInput {
            self.terminate(TerminationReason::EndRequested);
        }
        Ok(())
    }

    /// Close the round: increment the counter and decide whether to stop.
    ///
    /// The ceiling is checked first so it always takes precedence. A round
    /// with no speakers stalls an autonomous session unless a human spoke
    /// during it.
    pub fn evaluate(&mut self, speakers: usize) -> Result<Option<TerminationReason>, DomainError> {
        self.require_state(SchedulerState::Evaluating, "evaluate the round")?;
        self.round += 1;
        self.updated_at = Utc::now();

        let reason = if self.round >= self.config.hard_round_ceiling {
            Some(TerminationReason::CeilingReached)
        } else if self.end_requested {
            Some(TerminationReason::EndRequested)
        } else if speakers == 0 && self.config.autonomous && !self.human_input_this_round {
            Some(TerminationReason::Stalled)
        } else {
            None
        };

        match reason {
            Some(reason) => self.terminate(reason),
            None => self.transition(SchedulerState::AwaitingInput)?,
        }
        self.human_input_this_round = false;
        Ok(reason)
    }

    fn require_state(
        &self,
        expected: SchedulerState,
        operation: &'static str,
    ) -> Result<(), DomainError> {
        if self.state != expected {
            return Err(DomainError::InvalidTransition {
                operation,
                state: self.state.as_str(),
            });
        }
        Ok(())
    }

    // ==================== Persistence ====================

    pub fn export(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            id: self.id,
            title: self.title.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            config: self.config.clone(),
            round: self.round,
            state: self.state,
            termination: self.termination,
            end_requested: self.end_requested,
            turns: self.log.all().to_vec(),
            participants: self.registry.records().to_vec(),
            last_cooldown_round: self.registry.last_cooldown_round(),
            pending_human_turns: self.pending_human_turns.iter().cloned().collect(),
        }
    }

    /// Rebuild a session from a snapshot.
    ///
    /// A session exported mid-round resumes in `AwaitingInput`: the
    /// interrupted round never committed, and queued human turns are
    /// appended.
    pub fn restore(snapshot: SessionSnapshot) -> Result<Self, DomainError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DomainError::CorruptSnapshot(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        snapshot.config.validate()?;
        let ceiling = snapshot.config.hard_round_ceiling;
        if snapshot.round > ceiling {
            return Err(DomainError::CorruptSnapshot(format!(
                "round {} exceeds ceiling {}",
                snapshot.round, ceiling
            )));
        }
        // Reaching the ceiling always terminates, so a live session never sits on it
        if snapshot.round == ceiling && !snapshot.state.is_terminal() {
            return Err(DomainError::CorruptSnapshot(format!(
                "round {} reached ceiling {} without terminating",
                snapshot.round, ceiling
            )));
        }

        let log = ConversationLog::from_turns(snapshot.turns)?;
        let registry =
            ParticipantRegistry::from_records(snapshot.participants, snapshot.last_cooldown_round)
                .map_err(|e| DomainError::CorruptSnapshot(e.to_string()))?;

        let known: HashSet<&PersonaId> = registry.iter().map(|r| r.id()).collect();
        if let Some(stranger) = log
            .all()
            .iter()
            .filter_map(|t| t.speaker.persona())
            .find(|id| !known.contains(id))
        {
            return Err(DomainError::CorruptSnapshot(format!(
                "turn spoken by unregistered persona {}",
                stranger
            )));
        }

        let state = if snapshot.state.is_terminal() {
            SchedulerState::Terminated
        } else {
            SchedulerState::AwaitingInput
        };

        let mut session = Self {
            id: snapshot.id,
            title: snapshot.title,
            config: snapshot.config,
            log,
            registry,
            state,
            round: snapshot.round,
            termination: snapshot.termination,
            end_requested: snapshot.end_requested,
            pending_human_turns: snapshot.pending_human_turns.into(),
            human_input_this_round: false,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        };
        if state.is_terminal() {
            session.pending_human_turns.clear();
        } else {
            session.flush_pending_human_turns()?;
        }
        Ok(session)
    }

    pub fn summary(&self) -> SessionSummary {
        self.export().summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Speaker;
    use crate::forum::ForumMode;
    use crate::persona::PersonaPreset;

    fn session(config: ForumConfig) -> ForumSession {
        ForumSession::new(
            "What is justice?",
            config,
            [PersonaPreset::Socrates.profile(), PersonaPreset::Kant.profile()],
        )
        .unwrap()
    }

    /// Drive one round by hand with the given speakers
    fn play_round(session: &mut ForumSession, speakers: &[PersonaPreset]) -> Option<TerminationReason> {
        session.begin_round().unwrap();
        session.transition(SchedulerState::Selecting).unwrap();
        session.transition(SchedulerState::Generating).unwrap();
        session.transition(SchedulerState::Appending).unwrap();
        session.tick_cooldowns();
        for speaker in speakers {
            session
                .append_persona_turn(&speaker.id(), format!("{} speaks", speaker), None)
                .unwrap();
        }
        session.flush_pending_human_turns().unwrap();
        session.transition(SchedulerState::Evaluating).unwrap();
        session.evaluate(speakers.len()).unwrap()
    }

    #[test]
    fn test_new_session_rejects_duplicates_and_empty_lineup() {
        let duplicate = ForumSession::new(
            "t",
            ForumConfig::default(),
            [PersonaPreset::Kant.profile(), PersonaPreset::Kant.profile()],
        );
        assert!(matches!(duplicate, Err(DomainError::DuplicateParticipant(_))));

        let empty = ForumSession::new("t", ForumConfig::default(), Vec::new());
        assert!(matches!(empty, Err(DomainError::InvalidConfig(_))));
    }

    #[test]
    fn test_human_turn_appends_when_idle_and_queues_mid_round() {
        let mut session = session(ForumConfig::default());
        assert_eq!(session.submit_human_turn("  Is justice virtue? ").unwrap(), Some(1));
        assert_eq!(session.log().all()[0].content, "Is justice virtue?");

        session.begin_round().unwrap();
        assert_eq!(session.submit_human_turn("And courage?").unwrap(), None);
        assert_eq!(session.pending_human_turns(), 1);
        assert_eq!(session.log().len(), 1);

        assert_eq!(session.submit_human_turn("   "), Err(DomainError::EmptyTurn));
    }

    #[test]
    fn test_queued_human_turns_follow_persona_turns() {
        let mut session = session(ForumConfig::default());
        session.begin_round().unwrap();
        session.submit_human_turn("Wait, what about Kant?").unwrap();
        session.transition(SchedulerState::Selecting).unwrap();
        session.transition(SchedulerState::Generating).unwrap();
        session.transition(SchedulerState::Appending).unwrap();
        session
            .append_persona_turn(&PersonaPreset::Socrates.id(), "I know nothing.", None)
            .unwrap();
        session.flush_pending_human_turns().unwrap();

        let speakers: Vec<&Speaker> = session.log().all().iter().map(|t| &t.speaker).collect();
        assert_eq!(
            speakers,
            vec![&Speaker::Persona(PersonaPreset::Socrates.id()), &Speaker::Human]
        );
        // Human turn ends the streak
        let socrates = session.registry().get(&PersonaPreset::Socrates.id()).unwrap();
        assert_eq!(socrates.consecutive_speaking_count, 0);
    }

    #[test]
    fn test_append_outside_appending_is_rejected() {
        let mut session = session(ForumConfig::default());
        let err = session
            .append_persona_turn(&PersonaPreset::Kant.id(), "Duty.", None)
            .unwrap_err();
        assert!(err.is_invalid_transition());
    }

    #[test]
    fn test_ceiling_terminates_at_exactly_n_rounds() {
        let mut session = session(ForumConfig::default().with_hard_round_ceiling(3));
        assert_eq!(play_round(&mut session, &[PersonaPreset::Socrates]), None);
        assert_eq!(play_round(&mut session, &[PersonaPreset::Kant]), None);
        assert_eq!(
            play_round(&mut session, &[PersonaPreset::Socrates]),
            Some(TerminationReason::CeilingReached)
        );
        assert_eq!(session.round(), 3);
        assert!(session.is_terminated());
        assert!(session.begin_round().unwrap_err().is_invalid_transition());
    }

    #[test]
    fn test_ceiling_takes_precedence_over_end_request() {
        let mut session = session(ForumConfig::default().with_hard_round_ceiling(1));
        session.begin_round().unwrap();
        session.request_end().unwrap();
        assert!(!session.is_terminated());
        session.transition(SchedulerState::Selecting).unwrap();
        session.transition(SchedulerState::Generating).unwrap();
        session.transition(SchedulerState::Appending).unwrap();
        session.transition(SchedulerState::Evaluating).unwrap();
        assert_eq!(
            session.evaluate(0).unwrap(),
            Some(TerminationReason::CeilingReached)
        );
    }

    #[test]
    fn test_stall_only_in_autonomous_sessions() {
        let mut interactive = session(ForumConfig::default());
        assert_eq!(play_round(&mut interactive, &[]), None);
        assert_eq!(interactive.state(), SchedulerState::AwaitingInput);

        let mut autonomous = session(ForumConfig::default().with_autonomous(true));
        assert_eq!(play_round(&mut autonomous, &[]), Some(TerminationReason::Stalled));
    }

    #[test]
    fn test_human_input_during_round_prevents_stall() {
        let mut session = session(ForumConfig::default().with_autonomous(true));
        session.begin_round().unwrap();
        session.submit_human_turn("Anyone?").unwrap();
        session.transition(SchedulerState::Selecting).unwrap();
        session.transition(SchedulerState::Generating).unwrap();
        session.transition(SchedulerState::Appending).unwrap();
        session.flush_pending_human_turns().unwrap();
        session.transition(SchedulerState::Evaluating).unwrap();
        assert_eq!(session.evaluate(0).unwrap(), None);
    }

    #[test]
    fn test_request_end_while_idle_terminates_immediately() {
        let mut session = session(ForumConfig::default());
        session.request_end().unwrap();
        assert_eq!(session.termination(), Some(TerminationReason::EndRequested));
        assert!(session.submit_human_turn("hello").unwrap_err().is_invalid_transition());
        assert!(session.request_end().unwrap_err().is_invalid_transition());
    }

    #[test]
    fn test_first_termination_reason_wins() {
        let mut session = session(ForumConfig::default());
        session.terminate(TerminationReason::Cancelled);
        session.terminate(TerminationReason::Stalled);
        assert_eq!(session.termination(), Some(TerminationReason::Cancelled));
    }

    #[test]
    fn test_cooldown_blocks_following_round() {
        let mut session = session(ForumConfig::new(ForumMode::Debate).with_cooldown_rounds(1));
        play_round(&mut session, &[PersonaPreset::Socrates]);
        let socrates = session.registry().get(&PersonaPreset::Socrates.id()).unwrap();
        assert_eq!(socrates.cooldown_remaining, 1);

        session.begin_round().unwrap();
        let ids = session.select_speakers(&[ScoredCandidate::new(PersonaPreset::Socrates.id(), 0.9)]);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_export_restore_round_trip() {
        let mut session = session(ForumConfig::new(ForumMode::Consensus));
        session.submit_human_turn("Is virtue teachable?").unwrap();
        play_round(&mut session, &[PersonaPreset::Socrates, PersonaPreset::Kant]);

        let snapshot = session.export();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored = ForumSession::restore(serde_json::from_str(&json).unwrap()).unwrap();

        assert_eq!(restored.id(), session.id());
        assert_eq!(restored.round(), 1);
        assert_eq!(restored.log().all(), session.log().all());
        assert_eq!(restored.registry().records(), session.registry().records());
        assert_eq!(restored.state(), SchedulerState::AwaitingInput);
        assert_eq!(restored.log().next_sequence(), 4);
    }

    #[test]
    fn test_restore_mid_round_resumes_idle_with_queued_turns() {
        let mut session = session(ForumConfig::default());
        session.begin_round().unwrap();
        session.submit_human_turn("Still there?").unwrap();
        let snapshot = session.export();
        assert_eq!(snapshot.state, SchedulerState::Scoring);

        let restored = ForumSession::restore(snapshot).unwrap();
        assert_eq!(restored.state(), SchedulerState::AwaitingInput);
        assert_eq!(restored.round(), 0);
        assert_eq!(restored.log().len(), 1);
        assert_eq!(restored.pending_human_turns(), 0);
    }

    #[test]
    fn test_restore_rejects_corrupt_snapshots() {
        let mut session = session(ForumConfig::default().with_hard_round_ceiling(5));
        play_round(&mut session, &[PersonaPreset::Kant]);

        let mut gap = session.export();
        gap.turns[0].sequence = 7;
        assert!(matches!(ForumSession::restore(gap), Err(DomainError::CorruptSnapshot(_))));

        let mut over = session.export();
        over.round = 6;
        assert!(matches!(ForumSession::restore(over), Err(DomainError::CorruptSnapshot(_))));

        let mut at_ceiling = session.export();
        at_ceiling.round = 5;
        assert!(matches!(
            ForumSession::restore(at_ceiling),
            Err(DomainError::CorruptSnapshot(_))
        ));

        let mut stranger = session.export();
        stranger.participants.retain(|r| r.id() != &PersonaPreset::Kant.id());
        assert!(matches!(
            ForumSession::restore(stranger),
            Err(DomainError::CorruptSnapshot(_))
        ));

        let mut version = session.export();
        version.version = 99;
        assert!(ForumSession::restore(version).is_err());
    }

    #[test]
    fn test_terminated_snapshot_stays_terminated() {
        let mut session = session(ForumConfig::default());
        session.request_end().unwrap();
        let restored = ForumSession::restore(session.export()).unwrap();
        assert!(restored.is_terminated());
        assert_eq!(restored.termination(), Some(TerminationReason::EndRequested));
    }
}
