//! Prompt templates for single-agent baselines
//!
//! One model, no roles and no opponent context.

use crate::core::question::QuestionPrompt;

const DEFAULT_CATEGORY: &str = "law";

const COT_BASIC_INSTRUCTION: &str = "Return only: Final Answer: X (A/B/C/D).";

const COT_IRAC_INSTRUCTION: &str = "Use IRAC internally (Issue, Rule, Application, Conclusion) to decide the answer. \
Do NOT write the IRAC steps. \
Return only the final answer in the format 'Final Answer: X' where X is A, B, C, or D.";

/// Marker a chain-of-thought reply puts before its letter
pub const FINAL_ANSWER_MARKER: &str = "final answer";

/// Templates for the single-agent baselines
pub struct BaselinePromptTemplate;

impl BaselinePromptTemplate {
    /// Zero-shot multiple-choice prompt answered as `{"answer", "reasoning"}`
    pub fn single_agent(question: &QuestionPrompt<'_>) -> String {
        format!(
            r#"You are a legal expert. Answer the following legal question by selecting the most legally correct answer choice.

{full_question}

Answer choices:
{choices}

Provide your answer with legal reasoning to support your choice.

Respond in JSON format:
{{
  "answer": "A",
  "reasoning": "Your legal reasoning here..."
}}

IMPORTANT: The "answer" field must be exactly one letter: A, B, C, or D (not multiple letters)."#,
            full_question = question.full_question(),
            choices = question.choices_text(),
        )
    }

    /// Zero-shot essay prompt answered as `{"answer", "key_citations"}`
    pub fn single_agent_essay(question: &QuestionPrompt<'_>) -> String {
        format!(
            r#"You are an expert in {category}.

Question:
{full_question}

Answer this exam question in essay form.

Respond in JSON:
{{
  "answer": "Your essay answer",
  "key_citations": ["Citations used"]
}}"#,
            category = question.category.unwrap_or(DEFAULT_CATEGORY),
            full_question = question.full_question(),
        )
    }

    /// Plain-text chain-of-thought prompt ending in `Final Answer: `.
    ///
    /// With `irac` the instruction asks the model to reason in IRAC
    /// without writing the steps out.
    pub fn chain_of_thought(question: &QuestionPrompt<'_>, irac: bool) -> String {
        let instruction = if irac {
            COT_IRAC_INSTRUCTION
        } else {
            COT_BASIC_INSTRUCTION
        };
        format!(
            "SYSTEM INSTRUCTION: {}\n\nUSER PROMPT: {}\n\n{}\n\nFinal Answer: ",
            instruction,
            question.full_question(),
            Self::parenthesized_choices(question)
        )
    }

    /// Step-by-step essay prompt answered as `{"reasoning", "answer", "key_citations"}`
    pub fn chain_of_thought_essay(question: &QuestionPrompt<'_>, irac: bool) -> String {
        let steps = if irac {
            "Think step by step using IRAC (Issue, Rule, Application, Conclusion) before answering this exam question."
        } else {
            "Think step by step before answering this exam question."
        };
        format!(
            r#"You are an expert in {category}.

Question:
{full_question}

{steps}

Respond in JSON:
{{
  "reasoning": "Your step-by-step reasoning",
  "answer": "Your final essay answer",
  "key_citations": ["Citations used"]
}}"#,
            category = question.category.unwrap_or(DEFAULT_CATEGORY),
            full_question = question.full_question(),
            steps = steps,
        )
    }

    /// Step-by-step multiple-choice prompt answered as `{"answer", "reasoning"}`
    pub fn self_consistency(question: &QuestionPrompt<'_>) -> String {
        format!(
            r#"You are a legal expert. This is a bar exam style multiple-choice question.
Think step-by-step, evaluate each option, and then pick the BEST answer.

{full_question}

Answer choices:
{choices}

Respond ONLY in JSON format:
{{
  "answer": "A",
  "reasoning": "Explain your full legal reasoning step by step."
}}

IMPORTANT:
- "answer" must be ONE letter A-D.
- "reasoning" MUST explain why the chosen option is best."#,
            full_question = question.full_question(),
            choices = question.choices_text(),
        )
    }

    /// Per-sample variation so repeated samples do not collapse to one path
    pub fn sample_variation(base: &str, nonce: u64) -> String {
        format!(
            "{}\n\nSelf-consistency sample ID: {}. Try a different line of reasoning from other samples.",
            base, nonce
        )
    }

    fn parenthesized_choices(question: &QuestionPrompt<'_>) -> String {
        question
            .choices_text()
            .lines()
            .filter_map(|line| line.split_once(") "))
            .map(|(letter, text)| format!("({}) {}", letter, text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
