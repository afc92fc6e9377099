//! Prompt templates for debaters and the judge

use crate::core::choice::Choice;
use crate::core::question::QuestionPrompt;
use crate::debate::argument::Argument;
use crate::debate::mode::DebateMode;
use crate::debate::role::DebaterRole;
use crate::debate::transcript::DebateHistory;
use crate::schema::payload::PayloadKind;

const DEFAULT_CATEGORY: &str = "law";

/// Templates for every agent turn, selected by [`DebateMode`]
pub struct DebatePromptTemplate;

impl DebatePromptTemplate {
    /// Opening argument prompt.
    ///
    /// In multiple-choice modes `position` is the letter to defend, or
    /// `None` to let the debater choose. Open-ended modes ignore it.
    pub fn opening(mode: DebateMode, question: &QuestionPrompt<'_>, position: Option<Choice>) -> String {
        match mode {
            DebateMode::Vanilla => Self::opening_vanilla(question, position),
            DebateMode::Irac | DebateMode::IracHybrid => Self::opening_irac(question, position),
            DebateMode::OpenEnded => Self::opening_essay_irac(question, None),
            DebateMode::OpenEndedVanilla => Self::opening_essay(question, None),
        }
    }

    /// Adversarial opening: the debater sees the opponent's answer first and
    /// must present a different view (open-ended modes).
    pub fn adversarial_opening(
        mode: DebateMode,
        question: &QuestionPrompt<'_>,
        opponent: &Argument,
    ) -> String {
        match mode {
            DebateMode::OpenEndedVanilla => Self::opening_essay(question, Some(opponent)),
            _ => Self::opening_essay_irac(question, Some(opponent)),
        }
    }

    /// Rebuttal prompt, built only from the arguments the caller passes in.
    pub fn rebuttal(
        mode: DebateMode,
        question: &QuestionPrompt<'_>,
        own: &Argument,
        opponent: &Argument,
    ) -> String {
        match mode {
            DebateMode::Irac => Self::rebuttal_irac(question, own, opponent),
            DebateMode::Vanilla | DebateMode::IracHybrid => {
                Self::rebuttal_vanilla(question, own, opponent)
            }
            DebateMode::OpenEnded | DebateMode::OpenEndedVanilla => {
                Self::rebuttal_essay(question, own, opponent)
            }
        }
    }

    /// Judge prompt over the compressed debate history.
    pub fn judge(mode: DebateMode, question: &QuestionPrompt<'_>, history: &DebateHistory) -> String {
        match mode {
            DebateMode::Vanilla => Self::judge_mcq(question, history, JudgeFormat::Plain),
            DebateMode::Irac => Self::judge_mcq(question, history, JudgeFormat::Irac),
            DebateMode::IracHybrid => Self::judge_mcq(question, history, JudgeFormat::Hybrid),
            DebateMode::OpenEnded | DebateMode::OpenEndedVanilla => {
                Self::judge_synthesis(question, history)
            }
        }
    }

    /// Instruction appended to the original prompt after a schema violation
    pub fn corrective_suffix(kind: PayloadKind, problem: &str) -> String {
        let required = kind.required_keys().join(", ");
        format!(
            "\n\nYour previous response was rejected: {}.\n\
             Respond ONLY with valid JSON populating all required fields ({}). \
             Every IRAC object must contain non-empty issue, rule, application and conclusion.",
            problem, required
        )
    }

    // ==================== Openings ====================

    fn opening_irac(question: &QuestionPrompt<'_>, position: Option<Choice>) -> String {
        let (instruction, slot) = position_instruction(position);
        format!(
            r#"You are a legal expert. {instruction} using IRAC structure.

Question:
{full_question}

Choices:
{choices}

Respond in JSON with IRAC structure (be concise):
{{
  "position": "{slot}",
  "irac": {{
    "issue": "Legal issue in 1-2 sentences",
    "rule": "Applicable legal rule or doctrine (cite authority if known)",
    "application": "Apply the rule to the facts (2-3 sentences)",
    "conclusion": "Why {slot} is correct (1 sentence)"
  }},
  "key_citations": ["Most relevant authority 1", "Authority 2"],
  "argument_summary": "One-sentence summary of your position"
}}"#,
            instruction = instruction,
            full_question = question.full_question(),
            choices = question.choices_text(),
            slot = slot,
        )
    }

    fn opening_vanilla(question: &QuestionPrompt<'_>, position: Option<Choice>) -> String {
        let (instruction, slot) = position_instruction(position);
        format!(
            r#"You are a legal expert. {instruction}.

Question:
{full_question}

Choices:
{choices}

Respond in JSON:
{{
  "position": "{slot}",
  "argument": "Your argument (3-5 sentences)",
  "key_citations": ["Relevant authority"],
  "argument_summary": "One-sentence summary of your position"
}}"#,
            instruction = instruction,
            full_question = question.full_question(),
            choices = question.choices_text(),
            slot = slot,
        )
    }

    fn opening_essay_irac(question: &QuestionPrompt<'_>, opponent: Option<&Argument>) -> String {
        let mut prompt = essay_preamble(question, opponent);
        prompt.push_str(
            r#"
Structure your answer with IRAC (Issue, Rule, Application, Conclusion).

Respond in JSON:
{
  "irac": {
    "issue": "Central legal issue (2-3 sentences)",
    "rule": "Applicable statutes, doctrine and case law with citations",
    "application": "Application to the facts (4-5 sentences)",
    "conclusion": "Reasoned conclusion (2-3 sentences)"
  },
  "full_answer": "Complete exam-quality essay answer (5-8 paragraphs)",
  "key_citations": ["Statute/article 1", "Doctrine or precedent 2"]
}"#,
        );
        prompt
    }

    fn opening_essay(question: &QuestionPrompt<'_>, opponent: Option<&Argument>) -> String {
        let mut prompt = essay_preamble(question, opponent);
        prompt.push_str(
            r#"
Respond in JSON:
{
  "answer": "Complete exam-quality essay answer with legal grounds and citations",
  "key_citations": ["Statute/article 1", "Doctrine or precedent 2"]
}"#,
        );
        prompt
    }

    // ==================== Rebuttals ====================

    fn rebuttal_irac(question: &QuestionPrompt<'_>, own: &Argument, opponent: &Argument) -> String {
        format!(
            r#"Continue your legal debate. Your position: {position}

Question: {full_question}

{own}

{opponent}

Your task (be concise):
1. Identify the flaw in the opponent's rule or application
2. Strengthen your IRAC reasoning
3. Provide a counter-argument

Respond in JSON:
{{
  "rebuttal_irac": {{
    "issue": "Refined issue statement",
    "rule": "Your rule (reinforced)",
    "application": "Counter-application addressing the opponent's flaw",
    "conclusion": "Why your position remains superior"
  }},
  "counter_argument": "Main flaw in the opponent's reasoning (1-2 sentences)",
  "key_citations": ["Additional authority if needed"],
  "rebuttal_summary": "One-sentence summary of your rebuttal"
}}"#,
            position = own.position,
            full_question = question.full_question(),
            own = own_digest(own),
            opponent = opponent_digest(opponent),
        )
    }

    fn rebuttal_vanilla(question: &QuestionPrompt<'_>, own: &Argument, opponent: &Argument) -> String {
        format!(
            r#"Continue your legal debate. Your position: {position}

Question: {full_question}

{own}

{opponent}

Point out the weaknesses in the opponent's argument and defend your position.

Respond in JSON:
{{
  "rebuttal": "Your rebuttal (3-5 sentences)",
  "key_citations": ["Additional authority if needed"],
  "rebuttal_summary": "One-sentence summary of your rebuttal"
}}"#,
            position = own.position,
            full_question = question.full_question(),
            own = own_digest(own),
            opponent = opponent_digest(opponent),
        )
    }

    fn rebuttal_essay(question: &QuestionPrompt<'_>, own: &Argument, opponent: &Argument) -> String {
        format!(
            r#"Continue the debate on this {category} exam question.

Question: {full_question}

Your initial answer:
{own}

Opponent's answer:
{opponent}

Your task:
1. Critically analyse the opponent's answer: flaws, omissions, weaknesses
2. Reinforce your own reasoning with new grounds or citations
3. Produce a refined, improved version of your essay answer

Respond in JSON:
{{
  "critique": "Main flaws in the opponent's answer (3-4 sentences)",
  "refined_answer": "Your COMPLETE refined essay answer",
  "key_citations": ["Every citation used in the refined answer"]
}}

The refined_answer must be complete and self-contained."#,
            category = question.category.unwrap_or(DEFAULT_CATEGORY),
            full_question = question.full_question(),
            own = own.answer_text(),
            opponent = opponent.answer_text(),
        )
    }

    // ==================== Judge ====================

    fn judge_mcq(question: &QuestionPrompt<'_>, history: &DebateHistory, format: JudgeFormat) -> String {
        let mut prompt = format!(
            "You are an impartial legal judge. Evaluate the debate and decide which answer is legally correct.\n\n\
             Question: {}\nChoices:\n{}\n",
            question.full_question(),
            question.choices_text()
        );

        for role in [DebaterRole::X, DebaterRole::Y] {
            let exchange = history.exchange(role);
            prompt.push_str(&format!(
                "\n{} (position {}):\nOpening: {}\nRebuttal: {}\n",
                role.display_name(),
                exchange.opening.position,
                exchange.opening.summary,
                exchange.rebuttal.summary
            ));
            if let Some(irac) = exchange.opening.irac() {
                prompt.push_str(&format!(
                    "Key rule: {}\nApplication: {}\n",
                    irac.rule, irac.application
                ));
            }
        }

        prompt.push_str(match format {
            JudgeFormat::Plain => {
                r#"
Respond in JSON:
{
  "decision": "A, B, C, or D",
  "rationale": "Why this answer is correct",
  "key_factors": ["Factor 1", "Factor 2"]
}"#
            }
            JudgeFormat::Irac => {
                r#"
Evaluate using IRAC: which issue framing is most accurate, which rule is most
applicable, which application is most sound, which conclusion is correct.

Respond in JSON:
{
  "decision": "A, B, C, or D",
  "synthesis": {
    "issue": "The decisive legal issue",
    "rule": "The governing rule",
    "application": "How the rule applies to these facts",
    "conclusion": "Why the chosen answer follows"
  },
  "rationale": "Why this answer is correct",
  "key_factors": ["Factor 1", "Factor 2"]
}"#
            }
            JudgeFormat::Hybrid => {
                r#"
Declare the debater with the stronger argument as the winner. The decision
MUST be the winner's position.

Respond in JSON:
{
  "decision": "A, B, C, or D",
  "winner": "debater_x or debater_y",
  "rationale": "Why the winner's argument prevails",
  "synthesis": "Short synthesis of the decisive reasoning",
  "key_factors": ["Factor 1", "Factor 2"]
}"#
            }
        });
        prompt
    }

    fn judge_synthesis(question: &QuestionPrompt<'_>, history: &DebateHistory) -> String {
        let x = history.exchange(DebaterRole::X);
        let y = history.exchange(DebaterRole::Y);
        format!(
            r#"You are an impartial {category} examiner.

<question>
{full_question}
</question>

<debate>
<debater_x>
<refined_answer>
{x_answer}
</refined_answer>
<critique_of_y>
{x_critique}
</critique_of_y>
</debater_x>
<debater_y>
<refined_answer>
{y_answer}
</refined_answer>
<critique_of_x>
{y_critique}
</critique_of_x>
</debater_y>
</debate>

Analyse the debate and write the best answer to the question. You may draw on
either debater or neither. The final answer must open with a direct position,
develop the legal grounds applied to the facts in 2-4 sentences and cite
precise provisions (article, paragraph, statute, precedent).

Respond in JSON:
{{
  "final_answer": "Complete, grounded answer (4-6 sentences)",
  "rationale": "How the debate shaped this answer (2-3 sentences)",
  "key_citations": ["Article X of Statute Y"]
}}"#,
            category = question.category.unwrap_or(DEFAULT_CATEGORY),
            full_question = question.full_question(),
            x_answer = x.rebuttal.answer_text(),
            x_critique = x.rebuttal.critique.as_deref().unwrap_or(""),
            y_answer = y.rebuttal.answer_text(),
            y_critique = y.rebuttal.critique.as_deref().unwrap_or(""),
        )
    }
}

#[derive(Clone, Copy)]
enum JudgeFormat {
    Plain,
    Irac,
    Hybrid,
}

fn position_instruction(position: Option<Choice>) -> (String, &'static str) {
    match position {
        Some(choice) => (
            format!("Argue that choice {} is correct", choice),
            choice.as_str(),
        ),
        None => (
            "Choose the answer you believe is correct and argue for it".to_string(),
            "A, B, C, or D",
        ),
    }
}

fn essay_preamble(question: &QuestionPrompt<'_>, opponent: Option<&Argument>) -> String {
    let category = question.category.unwrap_or(DEFAULT_CATEGORY);
    match opponent {
        None => format!(
            "You are an expert in {}. Write an essay answer to the following exam question.\n\n\
             Question:\n{}\n",
            category,
            question.full_question()
        ),
        Some(opponent) => format!(
            "You are an expert in {}. Your role is ADVERSARIAL.\n\n\
             Question:\n{}\n\n\
             Another expert answered:\n{}\n\n\
             Present a genuinely different view: challenge the opponent's \
             interpretation, rules or conclusion. Do not restate the opponent in other words.\n",
            category,
            question.full_question(),
            opponent.answer_text()
        ),
    }
}

fn own_digest(own: &Argument) -> String {
    let mut digest = format!("Your opening (summary): {}", own.summary);
    if let Some(irac) = own.irac() {
        digest.push_str(&format!("\nYour rule: {}", irac.rule));
    }
    digest
}

fn opponent_digest(opponent: &Argument) -> String {
    let mut digest = format!(
        "Opponent's position: {}\nOpponent's summary: {}",
        opponent.position, opponent.summary
    );
    if let Some(irac) = opponent.irac() {
        digest.push_str(&format!(
            "\nOpponent's rule: {}\nOpponent's application: {}",
            irac.rule, irac.application
        ));
    }
    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::question::LegalQuestion;
    use crate::debate::argument::{ArgumentBody, Irac, Position, Round};
    use crate::debate::transcript::RoundPair;

    fn question() -> LegalQuestion {
        LegalQuestion::multiple_choice(
            "q1",
            "Was a contract formed?",
            vec!["Yes".into(), "No".into(), "Only in part".into(), "Void".into()],
        )
        .with_context("A offered; B replied with new terms.")
        .with_gold_answer(Choice::B)
    }

    fn irac_argument(role: DebaterRole, round: Round, choice: Choice) -> Argument {
        Argument {
            role,
            round,
            position: Position::Choice(choice),
            body: ArgumentBody::Irac(Irac {
                issue: "formation".into(),
                rule: format!("rule of {}", role.as_str()),
                application: format!("application of {}", role.as_str()),
                conclusion: "done".into(),
            }),
            critique: None,
            full_answer: None,
            citations: vec![],
            summary: format!("summary of {}", role.as_str()),
        }
    }

    #[test]
    fn test_assigned_opening_names_letter() {
        let q = question();
        let prompt = DebatePromptTemplate::opening(DebateMode::Irac, &q.prompt_view(), Some(Choice::D));
        assert!(prompt.contains("Argue that choice D is correct"));
        assert!(prompt.contains("\"position\": \"D\""));
        assert!(prompt.contains("A) Yes\nB) No"));
        assert!(prompt.contains("A offered"));
    }

    #[test]
    fn test_free_opening_lets_debater_choose() {
        let q = question();
        let prompt = DebatePromptTemplate::opening(DebateMode::Vanilla, &q.prompt_view(), None);
        assert!(prompt.contains("Choose the answer"));
        assert!(prompt.contains("\"argument\""));
    }

    #[test]
    fn test_rebuttal_uses_opponent_rule_and_application() {
        let q = question();
        let own = irac_argument(DebaterRole::X, Round::Opening, Choice::A);
        let opponent = irac_argument(DebaterRole::Y, Round::Opening, Choice::C);
        let prompt =
            DebatePromptTemplate::rebuttal(DebateMode::Irac, &q.prompt_view(), &own, &opponent);
        assert!(prompt.contains("Your position: A"));
        assert!(prompt.contains("Opponent's rule: rule of debater_y"));
        assert!(prompt.contains("Opponent's application: application of debater_y"));
        assert!(prompt.contains("rebuttal_irac"));
    }

    #[test]
    fn test_hybrid_judge_asks_for_winner() {
        let q = question();
        let history = DebateHistory {
            openings: RoundPair::new(
                irac_argument(DebaterRole::X, Round::Opening, Choice::A),
                irac_argument(DebaterRole::Y, Round::Opening, Choice::C),
            ),
            rebuttals: RoundPair::new(
                irac_argument(DebaterRole::X, Round::Rebuttal, Choice::A),
                irac_argument(DebaterRole::Y, Round::Rebuttal, Choice::C),
            ),
        };
        let prompt = DebatePromptTemplate::judge(DebateMode::IracHybrid, &q.prompt_view(), &history);
        assert!(prompt.contains("Debater X (position A)"));
        assert!(prompt.contains("Debater Y (position C)"));
        assert!(prompt.contains("\"winner\""));
    }

    #[test]
    fn test_corrective_suffix_lists_required_keys() {
        let suffix = DebatePromptTemplate::corrective_suffix(
            PayloadKind::OpeningIrac,
            "missing required field 'irac.rule'",
        );
        assert!(suffix.contains("position, irac"));
        assert!(suffix.contains("irac.rule"));
    }
}
