//! Append-only conversation log

use super::turn::{NewTurn, Turn};
use crate::core::error::DomainError;
use chrono::Utc;

/// Ordered record of every turn in a forum session.
///
/// `append` is the only mutator. Sequence numbers start at 1 and increase by
/// exactly one per appended turn; they are never reused.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<Turn>,
    next_sequence: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Rebuild a log from persisted turns, checking sequence integrity.
    pub fn from_turns(turns: Vec<Turn>) -> Result<Self, DomainError> {
        for (expected, turn) in (1u64..).zip(&turns) {
            if turn.sequence != expected {
                return Err(DomainError::CorruptSnapshot(format!(
                    "expected turn sequence {}, found {}",
                    expected, turn.sequence
                )));
            }
        }
        let next_sequence = turns.len() as u64 + 1;
        Ok(Self {
            turns,
            next_sequence,
        })
    }

    /// Append a turn and return its assigned sequence number
    pub fn append(&mut self, draft: NewTurn) -> Result<u64, DomainError> {
        if draft.content.trim().is_empty() {
            return Err(DomainError::EmptyTurn);
        }
        let sequence = self.next_sequence.max(1);
        self.turns.push(Turn {
            sequence,
            speaker: draft.speaker,
            content: draft.content,
            thinking: draft.thinking,
            round: draft.round,
            timestamp: Utc::now(),
        });
        self.next_sequence = sequence + 1;
        Ok(sequence)
    }

    /// The last `n` turns, oldest first
    pub fn tail(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Sequence number the next append will receive
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaId;

    fn filled(n: usize) -> ConversationLog {
        let mut log = ConversationLog::new();
        for i in 0..n {
            log.append(NewTurn::human(format!("turn {}", i), 1)).unwrap();
        }
        log
    }

    #[test]
    fn test_sequences_are_contiguous_from_one() {
        let log = filled(5);
        let sequences: Vec<u64> = log.all().iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
        assert_eq!(log.next_sequence(), 6);
    }

    #[test]
    fn test_default_log_also_starts_at_one() {
        let mut log = ConversationLog::default();
        assert_eq!(log.append(NewTurn::human("hi", 0)).unwrap(), 1);
        assert_eq!(log.append(NewTurn::human("again", 0)).unwrap(), 2);
    }

    #[test]
    fn test_empty_content_is_rejected_without_consuming_a_sequence() {
        let mut log = filled(1);
        assert_eq!(
            log.append(NewTurn::human("   ", 1)),
            Err(DomainError::EmptyTurn)
        );
        assert_eq!(log.append(NewTurn::human("ok", 1)).unwrap(), 2);
    }

    #[test]
    fn test_tail_returns_last_n_in_order() {
        let log = filled(4);
        let tail: Vec<&str> = log.tail(2).iter().map(|t| t.content.as_str()).collect();
        assert_eq!(tail, vec!["turn 2", "turn 3"]);
        assert_eq!(log.tail(10).len(), 4);
        assert!(log.tail(0).is_empty());
    }

    #[test]
    fn test_tail_is_idempotent_without_append() {
        let log = filled(3);
        let first = log.tail(2).to_vec();
        let second = log.tail(2).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_turns_rejects_gaps() {
        let mut turns = filled(3).all().to_vec();
        turns.remove(1);
        assert!(matches!(
            ConversationLog::from_turns(turns),
            Err(DomainError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn test_from_turns_resumes_numbering() {
        let turns = filled(2).all().to_vec();
        let mut log = ConversationLog::from_turns(turns).unwrap();
        let seq = log
            .append(NewTurn::persona(PersonaId::new("kant").unwrap(), "Duty.", 2))
            .unwrap();
        assert_eq!(seq, 3);
    }
}
