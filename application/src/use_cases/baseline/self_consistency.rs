//! Self-consistency baseline
//!
//! Samples one model several times and takes the majority answer. Letters
//! are counted directly; essays vote on their opening characters.

use super::types::{BaselineError, BaselineRecord, BaselineSample};
use super::{read_essay, read_letter, read_text, read_text_list, validate};
use crate::config::SelfConsistencyParams;
use crate::gateway::GenerationGateway;
use crate::ports::generation_backend::{GenerationBackend, GenerationRequest};
use crate::use_cases::shared::question_rng;
use mad_domain::{
    BaselineAnswer, BaselineMethod, BaselinePromptTemplate, Choice, LegalQuestion, prefix_chars,
    truncate,
};
use rand::Rng;
use rand::rngs::StdRng;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Characters of an essay that decide which vote it counts towards
pub const ESSAY_VOTE_PREFIX: usize = 100;

const SAMPLE_REASONING_LEN: usize = 2000;

/// Majority letter; ties go to the letter that reached the top count first.
pub fn majority_vote(answers: &[Choice]) -> Option<(Choice, usize)> {
    let mut counts = [0usize; 4];
    let mut leader: Option<(Choice, usize)> = None;
    for answer in answers {
        let count = &mut counts[answer.index()];
        *count += 1;
        if leader.is_none_or(|(_, best)| *count > best) {
            leader = Some((*answer, *count));
        }
    }
    leader
}

/// Majority essay, keyed on the first [`ESSAY_VOTE_PREFIX`] characters.
///
/// Returns the index of the first essay carrying the winning key and the
/// vote count. Ties go to the key that reached the top count first.
pub fn essay_vote(essays: &[&str]) -> Option<(usize, usize)> {
    let mut keys: Vec<(&str, usize, usize)> = Vec::new();
    let mut leader: Option<(usize, usize)> = None;
    for (index, essay) in essays.iter().enumerate() {
        let key = prefix_chars(essay.trim(), ESSAY_VOTE_PREFIX);
        let (first, count) = match keys.iter_mut().find(|(k, _, _)| *k == key) {
            Some((_, first, count)) => {
                *count += 1;
                (*first, *count)
            }
            None => {
                keys.push((key, index, 1));
                (index, 1)
            }
        };
        if leader.is_none_or(|(_, best)| count > best) {
            leader = Some((first, count));
        }
    }
    leader
}

/// Use case for the self-consistency baseline
pub struct SelfConsistencyUseCase<B: GenerationBackend + 'static> {
    gateway: Arc<GenerationGateway<B>>,
    params: SelfConsistencyParams,
}

impl<B: GenerationBackend + 'static> SelfConsistencyUseCase<B> {
    pub fn new(gateway: Arc<GenerationGateway<B>>, params: SelfConsistencyParams) -> Self {
        Self { gateway, params }
    }

    /// Sample `num_samples` answers and vote.
    pub async fn execute(&self, question: &LegalQuestion) -> Result<BaselineRecord, BaselineError> {
        validate(question)?;
        if self.params.num_samples == 0 {
            return Err(BaselineError::NoSamples);
        }
        if question.is_multiple_choice() {
            self.vote_on_letters(question).await
        } else {
            self.vote_on_essays(question).await
        }
    }

    async fn vote_on_letters(&self, question: &LegalQuestion) -> Result<BaselineRecord, BaselineError> {
        let base = BaselinePromptTemplate::self_consistency(&question.prompt_view());
        let mut rng = question_rng(self.params.seed, &question.id);

        let mut samples = Vec::with_capacity(self.params.num_samples);
        for index in 0..self.params.num_samples {
            let prompt = variation(&base, &mut rng);
            let sample = match self
                .sample(&question.id, &prompt, self.params.max_tokens, read_letter_sample)
                .await
            {
                Some(sample) => sample,
                None => {
                    let answer = Choice::ALL[rng.gen_range(0..Choice::ALL.len())];
                    warn!(
                        "Sample on {} timed out after {:?}, falling back to random answer {}",
                        question.id, self.params.sample_timeout, answer
                    );
                    BaselineSample {
                        answer: BaselineAnswer::Choice(answer),
                        reasoning: String::new(),
                        key_citations: Vec::new(),
                        fallback: true,
                    }
                }
            };
            debug!(
                "Sample {}/{} on {}: {}{}",
                index + 1,
                self.params.num_samples,
                question.id,
                sample.answer,
                if sample.fallback { " (fallback)" } else { "" }
            );
            samples.push(sample);
        }

        let answers: Vec<Choice> = samples.iter().filter_map(|s| s.answer.as_choice()).collect();
        let Some((answer, majority_count)) = majority_vote(&answers) else {
            return Err(BaselineError::NoSamples);
        };
        let fallback_count = samples.iter().filter(|s| s.fallback).count();
        info!(
            "Self-consistency on {}: {} ({}/{} votes, {} fallbacks)",
            question.id,
            answer,
            majority_count,
            samples.len(),
            fallback_count
        );

        Ok(BaselineRecord {
            question_id: question.id.clone(),
            method: BaselineMethod::SelfConsistency,
            answer: BaselineAnswer::Choice(answer),
            reasoning: String::new(),
            key_citations: Vec::new(),
            samples,
            majority_count,
            fallback_count,
            gold_answer: question.gold_answer,
            correct: question.gold_answer.map(|gold| gold == answer),
        })
    }

    async fn vote_on_essays(&self, question: &LegalQuestion) -> Result<BaselineRecord, BaselineError> {
        let base = BaselinePromptTemplate::chain_of_thought_essay(&question.prompt_view(), false);
        let mut rng = question_rng(self.params.seed, &question.id);

        let mut samples = Vec::with_capacity(self.params.num_samples);
        for index in 0..self.params.num_samples {
            let prompt = variation(&base, &mut rng);
            match self
                .sample(&question.id, &prompt, self.params.essay_max_tokens, read_essay_sample)
                .await
            {
                Some(sample) => samples.push(sample),
                None => warn!(
                    "Essay sample {}/{} on {} timed out after {:?}, dropping it",
                    index + 1,
                    self.params.num_samples,
                    question.id,
                    self.params.sample_timeout
                ),
            }
        }

        let essays: Vec<&str> = samples.iter().map(|s| s.answer.as_str()).collect();
        let Some((winner, majority_count)) = essay_vote(&essays) else {
            return Err(BaselineError::NoUsableSamples);
        };

        let mut key_citations: Vec<String> = Vec::new();
        for citation in samples.iter().flat_map(|s| s.key_citations.iter()) {
            if !key_citations.contains(citation) {
                key_citations.push(citation.clone());
            }
        }
        let answer = samples[winner].answer.clone();
        let reasoning = samples[winner].reasoning.clone();
        info!(
            "Self-consistency on {}: essay {} won {}/{} votes",
            question.id,
            winner + 1,
            majority_count,
            samples.len()
        );

        Ok(BaselineRecord {
            question_id: question.id.clone(),
            method: BaselineMethod::SelfConsistency,
            answer,
            reasoning,
            key_citations,
            samples,
            majority_count,
            fallback_count: 0,
            gold_answer: None,
            correct: None,
        })
    }

    /// One readable sample. Retries until the sample budget runs out and
    /// returns `None` on expiry.
    async fn sample(
        &self,
        question_id: &str,
        prompt: &str,
        max_tokens: u32,
        read: fn(&Value) -> Option<BaselineSample>,
    ) -> Option<BaselineSample> {
        let request = GenerationRequest::new(prompt)
            .with_temperature(self.params.temperature)
            .with_max_tokens(max_tokens);
        let deadline = Instant::now() + self.params.sample_timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }

            match tokio::time::timeout(remaining, self.gateway.generate_json(&request)).await {
                Ok(Ok(payload)) => match read(&payload) {
                    Some(sample) => return Some(sample),
                    None => warn!("Sample on {} has no readable answer", question_id),
                },
                Ok(Err(e)) => warn!("Sample on {} failed: {}", question_id, e),
                Err(_) => return None,
            }

            let pause = self
                .params
                .retry_pause
                .min(deadline.saturating_duration_since(Instant::now()));
            if pause > Duration::ZERO {
                tokio::time::sleep(pause).await;
            }
        }
    }
}

fn variation(base: &str, rng: &mut StdRng) -> String {
    let nonce: u64 = rng.gen_range(0..1_000_000_000);
    BaselinePromptTemplate::sample_variation(base, nonce)
}

fn read_letter_sample(payload: &Value) -> Option<BaselineSample> {
    let answer = read_letter(payload)?;
    Some(BaselineSample {
        answer: BaselineAnswer::Choice(answer),
        reasoning: truncate(&read_text(payload, "reasoning"), SAMPLE_REASONING_LEN),
        key_citations: Vec::new(),
        fallback: false,
    })
}

fn read_essay_sample(payload: &Value) -> Option<BaselineSample> {
    let essay = read_essay(payload)?;
    Some(BaselineSample {
        answer: BaselineAnswer::Essay(essay),
        reasoning: truncate(&read_text(payload, "reasoning"), SAMPLE_REASONING_LEN),
        key_citations: read_text_list(payload, "key_citations"),
        fallback: false,
    })
}
