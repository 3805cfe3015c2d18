//! Application layer for philosopher-forum
//!
//! This crate contains the turn scheduler, use cases, port definitions and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    human_input::{AlwaysContinue, HumanInput, HumanInputError, HumanInputPort},
    persona_memory::{NoPersonaMemory, PersonaMemoryPort, StaticPersonaMemory},
    progress::{NoProgress, ProgressNotifier},
    response_generator::{
        ContextWindow, GeneratedResponse, GenerationError, GenerationRequest, ResponseGenerator,
    },
    session_store::{NoSessionStore, SessionStore, StoreError},
};
pub use use_cases::run_forum::{RunForumError, RunForumOutput, RunForumUseCase};
pub use use_cases::turn_scheduler::{RoundOutcome, SchedulerError, SessionHandle, TurnScheduler};
