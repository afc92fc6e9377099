//! Debater agent

use crate::config::DebateParams;
use crate::error::DebateError;
use crate::gateway::GenerationGateway;
use crate::ports::generation_backend::{GenerationBackend, GenerationRequest};
use crate::validation::generate_with_validation;
use mad_domain::{
    Argument, Choice, DebateMode, DebatePromptTemplate, DebaterRole, LegalQuestion, PayloadKind,
    Position,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Where a debater is in its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum DebaterState {
    NoOpening,
    /// Opening produced; its position is frozen
    HasOpening(Argument),
}

/// One debater seat in one debate instance
///
/// Owns its own opening; the opponent's arguments are only ever passed in
/// explicitly by the caller.
pub struct Debater<B: GenerationBackend + 'static> {
    role: DebaterRole,
    gateway: Arc<GenerationGateway<B>>,
    params: Arc<DebateParams>,
    state: DebaterState,
}

impl<B: GenerationBackend + 'static> Debater<B> {
    pub fn new(role: DebaterRole, gateway: Arc<GenerationGateway<B>>, params: Arc<DebateParams>) -> Self {
        Self {
            role,
            gateway,
            params,
            state: DebaterState::NoOpening,
        }
    }

    pub fn role(&self) -> DebaterRole {
        self.role
    }

    pub fn state(&self) -> &DebaterState {
        &self.state
    }

    /// Frozen position, once the opening exists
    pub fn position(&self) -> Option<&Position> {
        match &self.state {
            DebaterState::HasOpening(opening) => Some(&opening.position),
            DebaterState::NoOpening => None,
        }
    }

    fn mode(&self) -> DebateMode {
        self.params.mode
    }

    /// Produce the opening argument.
    ///
    /// With `position` the debater must defend exactly that letter; a
    /// response for any other letter is [`DebateError::InvalidChoice`].
    /// Without it the debater chooses, and the choice is still checked
    /// against the closed set.
    pub async fn open(
        &mut self,
        question: &LegalQuestion,
        position: Option<Choice>,
    ) -> Result<Argument, DebateError> {
        self.ensure_no_opening()?;
        if position.is_some() && !self.mode().is_multiple_choice() {
            return Err(DebateError::illegal_state(format!(
                "positions cannot be assigned in {} mode",
                self.mode()
            )));
        }

        let prompt = DebatePromptTemplate::opening(self.mode(), &question.prompt_view(), position);
        let opening = self.generate_opening(prompt).await?;

        if let Some(assigned) = position
            && opening.position.as_choice() != Some(assigned)
        {
            return Err(DebateError::InvalidChoice {
                value: opening.position.to_string(),
                allowed: assigned.to_string(),
            });
        }

        info!(
            "{} opened on {} ({})",
            self.role.display_name(),
            question.id,
            opening.position
        );
        self.state = DebaterState::HasOpening(opening.clone());
        Ok(opening)
    }

    /// Produce an opening that challenges `opponent` (open-ended modes).
    pub async fn open_against(
        &mut self,
        question: &LegalQuestion,
        opponent: &Argument,
    ) -> Result<Argument, DebateError> {
        self.ensure_no_opening()?;
        if self.mode().is_multiple_choice() {
            return Err(DebateError::illegal_state(format!(
                "adversarial openings are not used in {} mode",
                self.mode()
            )));
        }

        let prompt =
            DebatePromptTemplate::adversarial_opening(self.mode(), &question.prompt_view(), opponent);
        let opening = self.generate_opening(prompt).await?;

        info!("{} opened adversarially on {}", self.role.display_name(), question.id);
        self.state = DebaterState::HasOpening(opening.clone());
        Ok(opening)
    }

    /// Produce a rebuttal of `opponent_opening`.
    ///
    /// Fails with [`DebateError::IllegalState`] before [`Debater::open`].
    pub async fn rebut(
        &self,
        question: &LegalQuestion,
        opponent_opening: &Argument,
    ) -> Result<Argument, DebateError> {
        let own = match &self.state {
            DebaterState::HasOpening(opening) => opening,
            DebaterState::NoOpening => {
                return Err(DebateError::illegal_state(format!(
                    "{} cannot rebut before opening",
                    self.role
                )));
            }
        };

        let kind = self.mode().rebuttal_kind();
        let prompt = DebatePromptTemplate::rebuttal(
            self.mode(),
            &question.prompt_view(),
            own,
            opponent_opening,
        );
        let request = self.request(prompt, self.params.budgets.rebuttal_for(self.mode()));
        debug!("{} rebuttal budget: {} tokens", self.role, request.max_tokens);

        let payload =
            generate_with_validation(&self.gateway, &request, kind, self.params.validation_attempts)
                .await?;
        let rebuttal = Argument::rebuttal_from_payload(self.role, kind, &payload, own.position.clone())?;

        info!("{} rebutted on {}", self.role.display_name(), question.id);
        Ok(rebuttal)
    }

    async fn generate_opening(&self, prompt: String) -> Result<Argument, DebateError> {
        let kind: PayloadKind = self.mode().opening_kind();
        let request = self.request(prompt, self.params.budgets.opening_for(self.mode()));
        debug!("{} opening budget: {} tokens", self.role, request.max_tokens);

        let payload =
            generate_with_validation(&self.gateway, &request, kind, self.params.validation_attempts)
                .await?;
        Ok(Argument::opening_from_payload(self.role, kind, &payload)?)
    }

    fn request(&self, prompt: String, max_tokens: u32) -> GenerationRequest {
        GenerationRequest::new(prompt)
            .with_temperature(self.params.debater_temperature)
            .with_max_tokens(max_tokens)
    }

    fn ensure_no_opening(&self) -> Result<(), DebateError> {
        match self.state {
            DebaterState::NoOpening => Ok(()),
            DebaterState::HasOpening(_) => Err(DebateError::illegal_state(format!(
                "{} already opened; its position is frozen",
                self.role
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedBackend, fast_gateway_config, irac_json};
    use mad_domain::FailureKind;
    use serde_json::json;

    fn question() -> LegalQuestion {
        LegalQuestion::multiple_choice(
            "q1",
            "Is the contract enforceable?",
            vec!["W".into(), "X".into(), "Y".into(), "Z".into()],
        )
        .with_gold_answer(Choice::C)
    }

    fn debater(
        role: DebaterRole,
        mode: DebateMode,
        replies: Vec<String>,
    ) -> (Debater<ScriptedBackend>, Arc<ScriptedBackend>) {
        let backend = Arc::new(ScriptedBackend::new(replies.into_iter().map(Ok).collect()));
        let gateway = Arc::new(GenerationGateway::new(Arc::clone(&backend), fast_gateway_config()));
        let params = Arc::new(DebateParams::default().with_mode(mode));
        (Debater::new(role, gateway, params), backend)
    }

    fn opening_json(letter: &str) -> String {
        json!({"position": letter, "irac": irac_json(letter), "argument_summary": format!("{letter} wins")})
            .to_string()
    }

    #[tokio::test]
    async fn test_free_opening_freezes_position() {
        let (mut x, backend) = debater(DebaterRole::X, DebateMode::Irac, vec![opening_json("C")]);
        let opening = x.open(&question(), None).await.unwrap();

        assert_eq!(opening.position, Position::Choice(Choice::C));
        assert_eq!(x.position(), Some(&Position::Choice(Choice::C)));
        let request = &backend.requests()[0];
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 1200);
    }

    #[tokio::test]
    async fn test_invalid_letter_is_invalid_choice() {
        let (mut x, _) = debater(DebaterRole::X, DebateMode::Irac, vec![opening_json("E")]);
        let err = x.open(&question(), None).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidChoice);
        assert_eq!(x.state(), &DebaterState::NoOpening);
    }

    #[tokio::test]
    async fn test_assigned_position_must_be_defended() {
        let (mut y, _) = debater(DebaterRole::Y, DebateMode::Irac, vec![opening_json("B")]);
        let err = y.open(&question(), Some(Choice::A)).await.unwrap_err();
        match err {
            DebateError::InvalidChoice { value, allowed } => {
                assert_eq!(value, "B");
                assert_eq!(allowed, "A");
            }
            other => panic!("expected invalid choice, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rebut_before_open_is_illegal_state() {
        let (x, backend) = debater(DebaterRole::X, DebateMode::Irac, vec![]);
        let (mut y, _) = debater(DebaterRole::Y, DebateMode::Irac, vec![opening_json("A")]);
        let y_opening = y.open(&question(), Some(Choice::A)).await.unwrap();

        let err = x.rebut(&question(), &y_opening).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::IllegalState);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_second_open_is_illegal_state() {
        let (mut x, _) = debater(
            DebaterRole::X,
            DebateMode::Irac,
            vec![opening_json("C"), opening_json("D")],
        );
        x.open(&question(), None).await.unwrap();
        let err = x.open(&question(), None).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::IllegalState);
        assert_eq!(x.position(), Some(&Position::Choice(Choice::C)));
    }

    #[tokio::test]
    async fn test_rebuttal_keeps_position_and_sees_opponent_rule() {
        let rebuttal = json!({
            "rebuttal_irac": irac_json("C still holds"),
            "counter_argument": "Opponent misreads the rule",
            "rebuttal_summary": "C holds"
        })
        .to_string();
        let (mut x, backend) = debater(
            DebaterRole::X,
            DebateMode::Irac,
            vec![opening_json("C"), rebuttal],
        );
        let (mut y, _) = debater(DebaterRole::Y, DebateMode::Irac, vec![opening_json("A")]);

        x.open(&question(), None).await.unwrap();
        let y_opening = y.open(&question(), Some(Choice::A)).await.unwrap();
        let arg = x.rebut(&question(), &y_opening).await.unwrap();

        assert_eq!(arg.position, Position::Choice(Choice::C));
        assert_eq!(arg.critique.as_deref(), Some("Opponent misreads the rule"));
        let prompt = &backend.requests()[1].prompt;
        assert!(prompt.contains("Opponent's position: A"));
        assert!(prompt.contains("Opponent's rule: Offer and acceptance must coincide"));
        assert_eq!(backend.requests()[1].max_tokens, 1000);
    }

    #[tokio::test]
    async fn test_open_ended_adversarial_opening() {
        let neutral = json!({"irac": irac_json("Liable"), "full_answer": "The employer is liable."});
        let adversarial = json!({"irac": irac_json("Not liable"), "full_answer": "No liability arises."});
        let q = LegalQuestion::open_ended("oab-1", "Is the employer liable?").with_category("labor law");

        let (mut x, _) = debater(DebaterRole::X, DebateMode::OpenEnded, vec![neutral.to_string()]);
        let (mut y, backend) =
            debater(DebaterRole::Y, DebateMode::OpenEnded, vec![adversarial.to_string()]);

        let x_opening = x.open(&q, None).await.unwrap();
        let y_opening = y.open_against(&q, &x_opening).await.unwrap();

        assert_eq!(y_opening.position, Position::FreeForm("Not liable".into()));
        let prompt = &backend.requests()[0].prompt;
        assert!(prompt.contains("ADVERSARIAL"));
        assert!(prompt.contains("The employer is liable."));
        assert_eq!(backend.requests()[0].max_tokens, 2000);
    }
}
