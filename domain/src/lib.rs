//! Domain layer for legal-mad
//!
//! This crate contains the core entities, value objects and pure logic of
//! the Multi-Agent Debate protocol. It performs no I/O.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! Two debaters argue for different answers to a legal question and a judge
//! rules on the exchange:
//!
//! - **Opening**: each debater fixes its position with a structured argument
//! - **Rebuttal**: each debater attacks the opponent's opening
//! - **Decision**: the judge picks an answer (or writes one, for essays)
//!
//! ## Baselines
//!
//! Single-agent methods (zero-shot, chain of thought, self-consistency)
//! answer the same questions without a debate, for comparison.
//!
//! ## IRAC
//!
//! Issue, Rule, Application, Conclusion. Model output is checked against a
//! declarative [`PayloadKind`] schema before it is trusted.

pub mod baseline;
pub mod core;
pub mod debate;
pub mod prompt;
pub mod schema;

// Re-export commonly used types
pub use baseline::{answer::BaselineAnswer, method::BaselineMethod};
pub use core::{
    choice::Choice,
    error::DomainError,
    question::{LegalQuestion, QuestionPrompt},
    string::{prefix_chars, truncate},
};
pub use debate::{
    argument::{Argument, ArgumentBody, Irac, Position, Round},
    decision::{Decision, Verdict},
    mode::{AssignmentPolicy, DebateMode},
    record::{DebateFailure, DebateOutcome, DebateRecord, FailureKind},
    role::DebaterRole,
    session::{DebatePhase, DebateSession, DebateStep},
    transcript::{
        AssignmentSource, DebateHistory, DebateTranscript, Exchange, PositionAssignment,
        RoleAssignment, RoundPair,
    },
};
pub use prompt::{BaselinePromptTemplate, DebatePromptTemplate, FINAL_ANSWER_MARKER};
pub use schema::{
    parsing::{ParseError, parse_json_payload, strip_code_fences},
    payload::{FieldRule, FieldSpec, PayloadKind},
    validator::{SchemaViolation, is_valid, validate},
};
