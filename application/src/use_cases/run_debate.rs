//! Run Debate use case
//!
//! Orchestrates one debate instance: openings, rebuttals, judgement.

use crate::agents::{Debater, Judge};
use crate::config::DebateParams;
use crate::error::DebateError;
use crate::gateway::GenerationGateway;
use crate::ports::generation_backend::GenerationBackend;
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::use_cases::shared::question_rng;
use mad_domain::{
    AssignmentPolicy, AssignmentSource, Choice, DebateFailure, DebateRecord,
    DebateSession, DebateStep, DebateTranscript, DebaterRole, LegalQuestion, PositionAssignment,
    RoleAssignment, RoundPair,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// A debate aborted at `step`
#[derive(Error, Debug, Clone)]
#[error("Question {question_id} failed at {step}: {source}")]
pub struct DebateRunError {
    pub question_id: String,
    pub step: DebateStep,
    #[source]
    pub source: DebateError,
}

impl DebateRunError {
    fn at(question: &LegalQuestion, step: DebateStep) -> impl FnOnce(DebateError) -> Self + '_ {
        move |source| DebateRunError {
            question_id: question.id.clone(),
            step,
            source,
        }
    }

    pub fn to_failure(&self) -> DebateFailure {
        DebateFailure {
            step: self.step,
            kind: self.source.kind(),
            message: self.source.to_string(),
        }
    }
}

/// Use case for debating one question
///
/// Each call builds private debaters and a judge, so concurrent calls share
/// nothing but the gateway.
pub struct RunDebateUseCase<B: GenerationBackend + 'static> {
    gateway: Arc<GenerationGateway<B>>,
    params: Arc<DebateParams>,
}

impl<B: GenerationBackend + 'static> Clone for RunDebateUseCase<B> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            params: Arc::clone(&self.params),
        }
    }
}

impl<B: GenerationBackend + 'static> RunDebateUseCase<B> {
    pub fn new(gateway: Arc<GenerationGateway<B>>, params: DebateParams) -> Self {
        Self {
            gateway,
            params: Arc::new(params),
        }
    }

    pub fn params(&self) -> &DebateParams {
        &self.params
    }

    /// Debate `question` and return its record, completed or failed
    pub async fn execute(&self, question: &LegalQuestion) -> DebateRecord {
        self.execute_with_progress(question, &NoProgress).await
    }

    /// Debate `question` with progress callbacks.
    ///
    /// Never fails: an aborted debate becomes a failure record naming the
    /// step and error kind.
    pub async fn execute_with_progress(
        &self,
        question: &LegalQuestion,
        progress: &dyn DebateProgressNotifier,
    ) -> DebateRecord {
        match self.run(question, progress).await {
            Ok(transcript) => DebateRecord::completed(question, transcript),
            Err(e) => {
                warn!("{}", e);
                DebateRecord::failed(question, self.params.mode, e.to_failure())
            }
        }
    }

    /// Run the full protocol: `Init -> Opened -> Rebutted -> Decided`.
    pub async fn run(
        &self,
        question: &LegalQuestion,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<DebateTranscript, DebateRunError> {
        let mode = self.params.mode;
        question
            .validate_for(mode)
            .map_err(DebateError::from)
            .map_err(DebateRunError::at(question, DebateStep::Validate))?;

        info!("Debating {} ({} mode)", question.id, mode);
        let mut session = DebateSession::new(question.id.clone(), mode);
        let mut x = Debater::new(DebaterRole::X, Arc::clone(&self.gateway), Arc::clone(&self.params));
        let mut y = Debater::new(DebaterRole::Y, Arc::clone(&self.gateway), Arc::clone(&self.params));

        // Round 1: openings
        let (assignment, openings) = if mode.is_multiple_choice() {
            let mut rng = question_rng(self.params.seed, &question.id);
            match self.params.assignment {
                AssignmentPolicy::IndependentDistinct => {
                    self.open_independent(question, &mut x, &mut y, &mut rng, progress)
                        .await?
                }
                AssignmentPolicy::FreeThenConstrained => {
                    self.open_free_then_constrained(question, &mut x, &mut y, &mut rng, progress)
                        .await?
                }
            }
        } else {
            self.open_adversarial(question, &mut x, &mut y, progress).await?
        };
        session
            .record_openings(assignment, openings.clone())
            .map_err(DebateError::from)
            .map_err(DebateRunError::at(question, DebateStep::OpeningY))?;

        // Round 2: each rebuttal needs only the opponent's opening
        progress.on_step_start(&question.id, DebateStep::RebuttalX);
        progress.on_step_start(&question.id, DebateStep::RebuttalY);
        let (x_rebuttal, y_rebuttal) = tokio::join!(
            x.rebut(question, &openings.debater_y),
            y.rebut(question, &openings.debater_x)
        );
        let x_rebuttal = step_result(question, DebateStep::RebuttalX, x_rebuttal, progress)?;
        let y_rebuttal = step_result(question, DebateStep::RebuttalY, y_rebuttal, progress)?;
        session
            .record_rebuttals(RoundPair::new(x_rebuttal, y_rebuttal))
            .map_err(DebateError::from)
            .map_err(DebateRunError::at(question, DebateStep::RebuttalY))?;

        // Judgement
        progress.on_step_start(&question.id, DebateStep::Judgement);
        let judge = Judge::new(Arc::clone(&self.gateway), Arc::clone(&self.params));
        let decided = async {
            let history = session.history()?;
            let decision = judge.decide(question, &history).await?;
            session.record_decision(decision)?;
            Ok::<_, DebateError>(())
        }
        .await;
        step_result(question, DebateStep::Judgement, decided, progress)?;

        let transcript = session
            .into_transcript()
            .map_err(DebateError::from)
            .map_err(DebateRunError::at(question, DebateStep::Judgement))?;
        info!("Debate on {} decided", question.id);
        Ok(transcript)
    }

    /// Policy (a): draw two distinct letters, then open concurrently.
    async fn open_independent(
        &self,
        question: &LegalQuestion,
        x: &mut Debater<B>,
        y: &mut Debater<B>,
        rng: &mut StdRng,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<(PositionAssignment, RoundPair), DebateRunError> {
        let drawn: Vec<Choice> = Choice::ALL.choose_multiple(rng, 2).copied().collect();
        let (x_position, y_position) = match drawn.as_slice() {
            [first, second] => (*first, *second),
            _ => {
                return Err(DebateRunError::at(question, DebateStep::OpeningX)(
                    DebateError::illegal_state("could not draw two distinct positions"),
                ));
            }
        };
        info!("Assigned {} to X and {} to Y", x_position, y_position);

        progress.on_step_start(&question.id, DebateStep::OpeningX);
        progress.on_step_start(&question.id, DebateStep::OpeningY);
        let (x_opening, y_opening) = tokio::join!(
            x.open(question, Some(x_position)),
            y.open(question, Some(y_position))
        );
        let x_opening = step_result(question, DebateStep::OpeningX, x_opening, progress)?;
        let y_opening = step_result(question, DebateStep::OpeningY, y_opening, progress)?;

        let assignment = PositionAssignment::new(
            AssignmentPolicy::IndependentDistinct,
            RoleAssignment {
                source: AssignmentSource::Assigned,
                position: x_opening.position.clone(),
            },
            RoleAssignment {
                source: AssignmentSource::Assigned,
                position: y_opening.position.clone(),
            },
        );
        Ok((assignment, RoundPair::new(x_opening, y_opening)))
    }

    /// Policy (b): X chooses, then Y is assigned one of the other three.
    async fn open_free_then_constrained(
        &self,
        question: &LegalQuestion,
        x: &mut Debater<B>,
        y: &mut Debater<B>,
        rng: &mut StdRng,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<(PositionAssignment, RoundPair), DebateRunError> {
        progress.on_step_start(&question.id, DebateStep::OpeningX);
        let x_opening = x.open(question, None).await;
        let x_opening = step_result(question, DebateStep::OpeningX, x_opening, progress)?;

        let remaining = x_opening
            .position
            .as_choice()
            .map(Choice::others)
            .unwrap_or_default();
        let y_position = remaining.choose(rng).copied().ok_or_else(|| {
            DebateRunError::at(question, DebateStep::OpeningY)(DebateError::illegal_state(
                "no position left for debater Y",
            ))
        })?;
        info!(
            "X chose {}, assigned {} to Y",
            x_opening.position, y_position
        );

        progress.on_step_start(&question.id, DebateStep::OpeningY);
        let y_opening = y.open(question, Some(y_position)).await;
        let y_opening = step_result(question, DebateStep::OpeningY, y_opening, progress)?;

        let assignment = PositionAssignment::new(
            AssignmentPolicy::FreeThenConstrained,
            RoleAssignment {
                source: AssignmentSource::Free,
                position: x_opening.position.clone(),
            },
            RoleAssignment {
                source: AssignmentSource::Assigned,
                position: y_opening.position.clone(),
            },
        );
        Ok((assignment, RoundPair::new(x_opening, y_opening)))
    }

    /// Open-ended modes: X answers, Y answers against X.
    async fn open_adversarial(
        &self,
        question: &LegalQuestion,
        x: &mut Debater<B>,
        y: &mut Debater<B>,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<(PositionAssignment, RoundPair), DebateRunError> {
        progress.on_step_start(&question.id, DebateStep::OpeningX);
        let x_opening = x.open(question, None).await;
        let x_opening = step_result(question, DebateStep::OpeningX, x_opening, progress)?;

        progress.on_step_start(&question.id, DebateStep::OpeningY);
        let y_opening = y.open_against(question, &x_opening).await;
        let y_opening = step_result(question, DebateStep::OpeningY, y_opening, progress)?;

        let assignment =
            PositionAssignment::adversarial(x_opening.position.clone(), y_opening.position.clone());
        Ok((assignment, RoundPair::new(x_opening, y_opening)))
    }
}

/// Report a finished step and attach the step to its error.
fn step_result<T>(
    question: &LegalQuestion,
    step: DebateStep,
    result: Result<T, DebateError>,
    progress: &dyn DebateProgressNotifier,
) -> Result<T, DebateRunError> {
    progress.on_step_complete(&question.id, step, result.is_ok());
    result.map_err(DebateRunError::at(question, step))
}
