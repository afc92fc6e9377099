//! Progress notification ports
//!
//! Defines the interfaces for reporting progress during a debate and across
//! a batch of questions.

use mad_domain::DebateStep;

/// Callbacks for the steps of one debate
///
/// Implementations live in the presentation layer.
pub trait DebateProgressNotifier: Send + Sync {
    /// Called when a step starts
    fn on_step_start(&self, question_id: &str, step: DebateStep);

    /// Called when a step ends
    fn on_step_complete(&self, question_id: &str, step: DebateStep, success: bool);
}

/// Outcome of one question, as seen by a batch reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    /// Answered and scored against the gold letter
    Correct,
    Incorrect,
    /// Answered, no gold letter to score against
    Answered,
    Failed,
}

impl QuestionStatus {
    pub fn from_score(correct: Option<bool>) -> Self {
        match correct {
            Some(true) => QuestionStatus::Correct,
            Some(false) => QuestionStatus::Incorrect,
            None => QuestionStatus::Answered,
        }
    }
}

/// Callbacks for a batch of questions
pub trait BatchProgressNotifier: Send + Sync {
    /// Called once before the first question starts
    fn on_batch_start(&self, total: usize);

    /// Called as each question finishes, in completion order
    fn on_question_complete(&self, question_id: &str, status: QuestionStatus);

    /// Called after the last question
    fn on_batch_complete(&self);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_step_start(&self, _question_id: &str, _step: DebateStep) {}
    fn on_step_complete(&self, _question_id: &str, _step: DebateStep, _success: bool) {}
}

impl BatchProgressNotifier for NoProgress {
    fn on_batch_start(&self, _total: usize) {}
    fn on_question_complete(&self, _question_id: &str, _status: QuestionStatus) {}
    fn on_batch_complete(&self) {}
}
