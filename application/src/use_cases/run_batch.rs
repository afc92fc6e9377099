//! Run Batch use case
//!
//! Debates a list of questions with bounded concurrency. Each finished
//! question goes to the [`ResultSink`] immediately; one failure never stops
//! the others.

use crate::config::BatchParams;
use crate::ports::generation_backend::GenerationBackend;
use crate::ports::progress::{
    BatchProgressNotifier, DebateProgressNotifier, NoProgress, QuestionStatus,
};
use crate::ports::result_sink::ResultSink;
use crate::use_cases::run_debate::RunDebateUseCase;
use mad_domain::{DebateRecord, LegalQuestion};
use serde::Serialize;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// Counts over one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub correct: usize,
    /// Completed records that had a gold answer to compare with
    pub scored: usize,
}

impl BatchSummary {
    pub fn record(&mut self, record: &DebateRecord) {
        self.total += 1;
        if record.is_completed() {
            self.completed += 1;
        } else {
            self.failed += 1;
        }
        if let Some(correct) = record.is_correct() {
            self.scored += 1;
            if correct {
                self.correct += 1;
            }
        }
    }

    /// Share of scored questions decided correctly
    pub fn accuracy(&self) -> Option<f64> {
        (self.scored > 0).then(|| self.correct as f64 / self.scored as f64)
    }
}

/// Use case for debating many questions
pub struct RunBatchUseCase<B: GenerationBackend + 'static> {
    debate: RunDebateUseCase<B>,
    sink: Arc<dyn ResultSink>,
    params: BatchParams,
    step_progress: Arc<dyn DebateProgressNotifier>,
}

impl<B: GenerationBackend + 'static> RunBatchUseCase<B> {
    pub fn new(debate: RunDebateUseCase<B>, sink: Arc<dyn ResultSink>, params: BatchParams) -> Self {
        Self {
            debate,
            sink,
            params,
            step_progress: Arc::new(NoProgress),
        }
    }

    /// Report the steps of every debate, not just finished questions
    pub fn with_step_progress(mut self, progress: Arc<dyn DebateProgressNotifier>) -> Self {
        self.step_progress = progress;
        self
    }

    pub async fn execute(&self, questions: Vec<LegalQuestion>) -> BatchSummary {
        self.execute_with_progress(questions, &NoProgress).await
    }

    /// Debate every question; records arrive at the sink in completion order.
    pub async fn execute_with_progress(
        &self,
        questions: Vec<LegalQuestion>,
        progress: &dyn BatchProgressNotifier,
    ) -> BatchSummary {
        let total = questions.len();
        info!(
            "Debating {} questions ({} mode, {} in flight)",
            total,
            self.debate.params().mode,
            self.params.max_in_flight
        );
        progress.on_batch_start(total);

        let attempts = self.params.question_attempts.max(1);
        let mut records = stream::iter(questions)
            .map(|question| async move {
                self.debate_with_retries(&question, attempts).await
            })
            .buffer_unordered(self.params.max_in_flight.max(1));

        let mut summary = BatchSummary::default();
        while let Some(record) = records.next().await {
            self.sink.write_debate(&record);
            summary.record(&record);
            let status = if record.is_completed() {
                QuestionStatus::from_score(record.is_correct())
            } else {
                QuestionStatus::Failed
            };
            progress.on_question_complete(&record.question_id, status);
        }

        progress.on_batch_complete();
        info!(
            "Batch done: {} completed, {} failed, {}/{} correct",
            summary.completed, summary.failed, summary.correct, summary.scored
        );
        summary
    }

    async fn debate_with_retries(&self, question: &LegalQuestion, attempts: u32) -> DebateRecord {
        let mut attempt = 1;
        loop {
            let record = self
                .debate
                .execute_with_progress(question, self.step_progress.as_ref())
                .await;
            let retryable = record.failure().is_some_and(|f| f.kind.is_retryable());
            if !retryable || attempt >= attempts {
                return record;
            }
            warn!(
                "Question {} failed (attempt {}/{}), debating it again",
                question.id, attempt, attempts
            );
            attempt += 1;
        }
    }
}
