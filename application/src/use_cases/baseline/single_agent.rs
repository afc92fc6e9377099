//! One-shot single-agent baselines: zero-shot and chain of thought.

use super::types::{BaselineError, BaselineRecord};
use super::{read_essay, read_letter, read_text, read_text_list, validate};
use crate::config::BaselineParams;
use crate::gateway::{GatewayError, GenerationGateway};
use crate::ports::generation_backend::{GenerationBackend, GenerationRequest};
use mad_domain::{
    BaselineAnswer, BaselineMethod, BaselinePromptTemplate, Choice, FINAL_ANSWER_MARKER,
    LegalQuestion,
};
use std::sync::Arc;
use tracing::info;

/// Letter after the last `Final Answer` marker, or anywhere in the reply
/// when the marker is missing.
pub fn read_final_answer(text: &str) -> Option<Choice> {
    match text.to_ascii_lowercase().rfind(FINAL_ANSWER_MARKER) {
        Some(index) => Choice::extract_from(&text[index + FINAL_ANSWER_MARKER.len()..]),
        None => Choice::extract_from(text),
    }
}

/// Use case for the zero-shot and chain-of-thought baselines
pub struct SingleAgentUseCase<B: GenerationBackend + 'static> {
    gateway: Arc<GenerationGateway<B>>,
    params: BaselineParams,
}

impl<B: GenerationBackend + 'static> SingleAgentUseCase<B> {
    pub fn new(gateway: Arc<GenerationGateway<B>>, params: BaselineParams) -> Self {
        Self { gateway, params }
    }

    /// Zero-shot answer: one JSON call, no reasoning instructions.
    pub async fn answer(&self, question: &LegalQuestion) -> Result<BaselineRecord, BaselineError> {
        validate(question)?;
        let view = question.prompt_view();

        let record = if question.is_multiple_choice() {
            let request = self.request(
                BaselinePromptTemplate::single_agent(&view),
                self.params.choice_tokens,
            );
            let reply = self.gateway.generate_json_reply(&request).await?;
            let choice = read_letter(&reply.value)
                .ok_or_else(|| BaselineError::MissingAnswer { raw: reply.raw.clone() })?;
            BaselineRecord::single(
                &question.id,
                BaselineMethod::Single,
                BaselineAnswer::Choice(choice),
                question.gold_answer,
            )
            .with_reasoning(read_text(&reply.value, "reasoning"))
        } else {
            let request = self.request(
                BaselinePromptTemplate::single_agent_essay(&view),
                self.params.essay_tokens,
            );
            let reply = self.gateway.generate_json_reply(&request).await?;
            let essay = read_essay(&reply.value)
                .ok_or_else(|| BaselineError::MissingAnswer { raw: reply.raw.clone() })?;
            BaselineRecord::single(
                &question.id,
                BaselineMethod::Single,
                BaselineAnswer::Essay(essay),
                None,
            )
            .with_key_citations(read_text_list(&reply.value, "key_citations"))
        };

        info!("{} on {}: {}", record.method, question.id, summary(&record.answer));
        Ok(record)
    }

    /// Chain-of-thought answer, optionally steered by IRAC.
    ///
    /// Multiple choice asks for a bare `Final Answer: X` in plain text;
    /// essays reason step by step inside the JSON reply.
    pub async fn chain_of_thought(
        &self,
        question: &LegalQuestion,
        irac: bool,
    ) -> Result<BaselineRecord, BaselineError> {
        validate(question)?;
        let method = if irac {
            BaselineMethod::CotIrac
        } else {
            BaselineMethod::Cot
        };
        let view = question.prompt_view();

        let record = if question.is_multiple_choice() {
            let request = self.request(
                BaselinePromptTemplate::chain_of_thought(&view, irac),
                self.params.choice_tokens,
            );
            let text = self
                .gateway
                .generate(&request)
                .await
                .map_err(GatewayError::from)?;
            let choice = read_final_answer(&text)
                .ok_or_else(|| BaselineError::MissingAnswer { raw: text.clone() })?;
            BaselineRecord::single(
                &question.id,
                method,
                BaselineAnswer::Choice(choice),
                question.gold_answer,
            )
        } else {
            let request = self.request(
                BaselinePromptTemplate::chain_of_thought_essay(&view, irac),
                self.params.reasoned_essay_tokens,
            );
            let reply = self.gateway.generate_json_reply(&request).await?;
            let essay = read_essay(&reply.value)
                .ok_or_else(|| BaselineError::MissingAnswer { raw: reply.raw.clone() })?;
            BaselineRecord::single(&question.id, method, BaselineAnswer::Essay(essay), None)
                .with_reasoning(read_text(&reply.value, "reasoning"))
                .with_key_citations(read_text_list(&reply.value, "key_citations"))
        };

        info!("{} on {}: {}", method, question.id, summary(&record.answer));
        Ok(record)
    }

    fn request(&self, prompt: String, max_tokens: u32) -> GenerationRequest {
        GenerationRequest::new(prompt)
            .with_temperature(self.params.temperature)
            .with_max_tokens(max_tokens)
    }
}

fn summary(answer: &BaselineAnswer) -> String {
    match answer {
        BaselineAnswer::Choice(choice) => choice.to_string(),
        BaselineAnswer::Essay(text) => format!("essay of {} chars", text.chars().count()),
    }
}
