//! Payload variants and their declarative field tables.

use serde::{Deserialize, Serialize};

/// Keys of an IRAC object; every one must be a non-empty string.
pub const IRAC_KEYS: [&str; 4] = ["issue", "rule", "application", "conclusion"];

/// Shape a single field must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// A string; when required it must be non-empty after trimming
    Text,
    /// An object with the four [`IRAC_KEYS`], all non-empty strings
    Irac,
    /// An array of strings
    TextList,
}

/// One entry in a payload's field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub rule: FieldRule,
    pub required: bool,
}

const fn required(key: &'static str, rule: FieldRule) -> FieldSpec {
    FieldSpec {
        key,
        rule,
        required: true,
    }
}

const fn optional(key: &'static str, rule: FieldRule) -> FieldSpec {
    FieldSpec {
        key,
        rule,
        required: false,
    }
}

/// Every JSON shape an agent may produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    OpeningVanilla,
    OpeningIrac,
    OpeningOpenEndedIrac,
    OpeningOpenEndedVanilla,
    RebuttalVanilla,
    RebuttalIrac,
    RebuttalOpenEnded,
    DecisionMcq,
    DecisionIrac,
    DecisionHybrid,
    DecisionSynthesis,
}

use FieldRule::{Irac, Text, TextList};

const OPENING_VANILLA: &[FieldSpec] = &[
    required("position", Text),
    required("argument", Text),
    optional("key_citations", TextList),
    optional("argument_summary", Text),
];

const OPENING_IRAC: &[FieldSpec] = &[
    required("position", Text),
    required("irac", Irac),
    optional("key_citations", TextList),
    optional("argument_summary", Text),
];

const OPENING_OPEN_ENDED_IRAC: &[FieldSpec] = &[
    required("irac", Irac),
    required("full_answer", Text),
    optional("key_citations", TextList),
];

const OPENING_OPEN_ENDED_VANILLA: &[FieldSpec] = &[
    required("answer", Text),
    optional("key_citations", TextList),
];

const REBUTTAL_VANILLA: &[FieldSpec] = &[
    required("rebuttal", Text),
    optional("key_citations", TextList),
    optional("rebuttal_summary", Text),
];

const REBUTTAL_IRAC: &[FieldSpec] = &[
    required("rebuttal_irac", Irac),
    required("counter_argument", Text),
    optional("key_citations", TextList),
    optional("rebuttal_summary", Text),
];

const REBUTTAL_OPEN_ENDED: &[FieldSpec] = &[
    required("refined_answer", Text),
    optional("critique", Text),
    optional("key_citations", TextList),
];

const DECISION_MCQ: &[FieldSpec] = &[
    required("decision", Text),
    optional("rationale", Text),
    optional("winner", Text),
    optional("key_factors", TextList),
];

const DECISION_IRAC: &[FieldSpec] = &[
    required("decision", Text),
    required("synthesis", Irac),
    optional("rationale", Text),
    optional("winner", Text),
    optional("key_factors", TextList),
];

const DECISION_HYBRID: &[FieldSpec] = &[
    required("decision", Text),
    optional("winner", Text),
    optional("rationale", Text),
    optional("synthesis", Text),
    optional("key_factors", TextList),
];

const DECISION_SYNTHESIS: &[FieldSpec] = &[
    required("final_answer", Text),
    optional("rationale", Text),
    optional("key_citations", TextList),
];

impl PayloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::OpeningVanilla => "opening_vanilla",
            PayloadKind::OpeningIrac => "opening_irac",
            PayloadKind::OpeningOpenEndedIrac => "opening_open_ended_irac",
            PayloadKind::OpeningOpenEndedVanilla => "opening_open_ended_vanilla",
            PayloadKind::RebuttalVanilla => "rebuttal_vanilla",
            PayloadKind::RebuttalIrac => "rebuttal_irac",
            PayloadKind::RebuttalOpenEnded => "rebuttal_open_ended",
            PayloadKind::DecisionMcq => "decision_mcq",
            PayloadKind::DecisionIrac => "decision_irac",
            PayloadKind::DecisionHybrid => "decision_hybrid",
            PayloadKind::DecisionSynthesis => "decision_synthesis",
        }
    }

    /// Field table for this payload
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            PayloadKind::OpeningVanilla => OPENING_VANILLA,
            PayloadKind::OpeningIrac => OPENING_IRAC,
            PayloadKind::OpeningOpenEndedIrac => OPENING_OPEN_ENDED_IRAC,
            PayloadKind::OpeningOpenEndedVanilla => OPENING_OPEN_ENDED_VANILLA,
            PayloadKind::RebuttalVanilla => REBUTTAL_VANILLA,
            PayloadKind::RebuttalIrac => REBUTTAL_IRAC,
            PayloadKind::RebuttalOpenEnded => REBUTTAL_OPEN_ENDED,
            PayloadKind::DecisionMcq => DECISION_MCQ,
            PayloadKind::DecisionIrac => DECISION_IRAC,
            PayloadKind::DecisionHybrid => DECISION_HYBRID,
            PayloadKind::DecisionSynthesis => DECISION_SYNTHESIS,
        }
    }

    /// Names of the required top-level keys, for corrective prompts
    pub fn required_keys(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.key)
            .collect()
    }
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
