//! Judge agent

use crate::config::DebateParams;
use crate::error::DebateError;
use crate::gateway::GenerationGateway;
use crate::ports::generation_backend::{GenerationBackend, GenerationRequest};
use crate::validation::generate_with_validation;
use mad_domain::{Decision, DebateHistory, DebateMode, DebatePromptTemplate, LegalQuestion};
use std::sync::Arc;
use tracing::{debug, info};

/// Rules on a completed exchange of openings and rebuttals
pub struct Judge<B: GenerationBackend + 'static> {
    gateway: Arc<GenerationGateway<B>>,
    params: Arc<DebateParams>,
}

impl<B: GenerationBackend + 'static> Judge<B> {
    pub fn new(gateway: Arc<GenerationGateway<B>>, params: Arc<DebateParams>) -> Self {
        Self { gateway, params }
    }

    /// Produce the final decision.
    ///
    /// In hybrid mode a declared winner must have argued for the decided
    /// letter, otherwise [`DebateError::InconsistentRuling`].
    pub async fn decide(
        &self,
        question: &LegalQuestion,
        history: &DebateHistory,
    ) -> Result<Decision, DebateError> {
        let mode = self.params.mode;
        let kind = mode.decision_kind();
        let prompt = DebatePromptTemplate::judge(mode, &question.prompt_view(), history);
        let request = GenerationRequest::new(prompt)
            .with_temperature(self.params.judge_temperature)
            .with_max_tokens(self.params.budgets.judge_for(mode));
        debug!("Judge budget: {} tokens", request.max_tokens);

        let payload =
            generate_with_validation(&self.gateway, &request, kind, self.params.validation_attempts)
                .await?;
        let decision = Decision::from_payload(kind, &payload)?;

        if mode == DebateMode::IracHybrid {
            history.check_winner(&decision)?;
        }
        if decision.rationale_synthesized {
            debug!("Rationale for {} derived from the judge's synthesis", question.id);
        }

        match decision.choice() {
            Some(choice) => info!("Judge decided {} on {}", choice, question.id),
            None => info!("Judge synthesized a final answer on {}", question.id),
        }
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedBackend, fast_gateway_config, irac_json};
    use mad_domain::{
        Argument, ArgumentBody, Choice, DebaterRole, FailureKind, Position, Round, RoundPair,
    };
    use serde_json::json;

    fn question() -> LegalQuestion {
        LegalQuestion::multiple_choice(
            "q1",
            "Which remedy applies?",
            vec!["W".into(), "X".into(), "Y".into(), "Z".into()],
        )
    }

    fn argument(role: DebaterRole, round: Round, choice: Choice) -> Argument {
        Argument {
            role,
            round,
            position: Position::Choice(choice),
            body: ArgumentBody::Prose("argument".into()),
            critique: None,
            full_answer: None,
            citations: vec![],
            summary: format!("{} summary", role),
        }
    }

    fn history(x: Choice, y: Choice) -> DebateHistory {
        DebateHistory {
            openings: RoundPair::new(
                argument(DebaterRole::X, Round::Opening, x),
                argument(DebaterRole::Y, Round::Opening, y),
            ),
            rebuttals: RoundPair::new(
                argument(DebaterRole::X, Round::Rebuttal, x),
                argument(DebaterRole::Y, Round::Rebuttal, y),
            ),
        }
    }

    fn judge(mode: DebateMode, reply: serde_json::Value) -> (Judge<ScriptedBackend>, Arc<ScriptedBackend>) {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(reply.to_string())]));
        let gateway = Arc::new(GenerationGateway::new(Arc::clone(&backend), fast_gateway_config()));
        let params = Arc::new(DebateParams::default().with_mode(mode));
        (Judge::new(gateway, params), backend)
    }

    #[tokio::test]
    async fn test_hybrid_winner_mismatch_is_inconsistent() {
        let (judge, _) = judge(
            DebateMode::IracHybrid,
            json!({"decision": "B", "winner": "debater_x"}),
        );
        let err = judge
            .decide(&question(), &history(Choice::A, Choice::C))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::InconsistentRuling);
    }

    #[tokio::test]
    async fn test_hybrid_winner_match_is_accepted() {
        let (judge, backend) = judge(
            DebateMode::IracHybrid,
            json!({"decision": "C", "winner": "debater_y", "rationale": "Y applied the rule"}),
        );
        let decision = judge
            .decide(&question(), &history(Choice::A, Choice::C))
            .await
            .unwrap();
        assert_eq!(decision.choice(), Some(Choice::C));
        assert_eq!(decision.winner, Some(DebaterRole::Y));

        let request = &backend.requests()[0];
        assert_eq!(request.temperature, 0.0);
        assert!(request.prompt.contains("Debater X (position A)"));
    }

    #[tokio::test]
    async fn test_winner_not_checked_outside_hybrid() {
        let (judge, _) = judge(
            DebateMode::Vanilla,
            json!({"decision": "B", "winner": "debater_x", "rationale": "r"}),
        );
        let decision = judge
            .decide(&question(), &history(Choice::A, Choice::C))
            .await
            .unwrap();
        assert_eq!(decision.choice(), Some(Choice::B));
    }

    #[tokio::test]
    async fn test_invalid_decision_letter() {
        let (judge, _) = judge(DebateMode::Vanilla, json!({"decision": "maybe"}));
        let err = judge
            .decide(&question(), &history(Choice::A, Choice::C))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidChoice);
    }

    #[tokio::test]
    async fn test_irac_judge_derives_missing_rationale() {
        let (judge, _) = judge(
            DebateMode::Irac,
            json!({"decision": "A", "synthesis": irac_json("A follows")}),
        );
        let decision = judge
            .decide(&question(), &history(Choice::A, Choice::C))
            .await
            .unwrap();
        assert!(decision.rationale_synthesized);
        assert!(decision
            .rationale
            .starts_with("Decision A is correct because Offer and acceptance must coincide"));
    }
}
