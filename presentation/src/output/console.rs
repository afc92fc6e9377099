//! Console output formatter for debate and baseline results

use colored::Colorize;
use mad_application::{BaselineRecord, BatchSummary};
use mad_domain::{
    Argument, ArgumentBody, BaselineAnswer, BaselineMethod, DebateOutcome, DebateRecord,
    DebateTranscript, Verdict, truncate,
};
use serde::Serialize;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One line per record: id, verdict and score
    pub fn format_record_line(record: &DebateRecord) -> String {
        match &record.outcome {
            DebateOutcome::Completed {
                transcript,
                correct,
            } => {
                let verdict = match &transcript.decision.verdict {
                    Verdict::Choice(choice) => choice.to_string(),
                    Verdict::FinalAnswer(answer) => truncate(answer, 60),
                };
                format!(
                    "{} {} {}",
                    Self::score_mark(*correct),
                    record.question_id.bold(),
                    verdict
                )
            }
            DebateOutcome::Failed(failure) => format!(
                "{} {} failed at {} ({})",
                "!".red().bold(),
                record.question_id.bold(),
                failure.step,
                failure.kind
            ),
        }
    }

    /// Every argument and the decision of one record
    pub fn format_record(record: &DebateRecord) -> String {
        let mut output = String::new();
        output.push_str(&Self::header(&format!("Question {}", record.question_id)));
        output.push('\n');

        let transcript = match &record.outcome {
            DebateOutcome::Completed { transcript, .. } => transcript,
            DebateOutcome::Failed(failure) => {
                output.push_str(&format!(
                    "\n{} {} at {}\n{}\n",
                    "Failed:".red().bold(),
                    failure.kind,
                    failure.step,
                    failure.message
                ));
                output.push_str(&Self::footer());
                return output;
            }
        };

        output.push_str(&format!(
            "{} {}\n{} {}\n",
            "Mode:".cyan().bold(),
            record.mode,
            "Assignment:".cyan().bold(),
            transcript.assignment.strategy
        ));

        output.push_str(&Self::section_header("Round 1: Openings"));
        for argument in [&transcript.openings().debater_x, &transcript.openings().debater_y] {
            output.push_str(&Self::format_argument(argument));
        }

        output.push_str(&Self::section_header("Round 2: Rebuttals"));
        for argument in [&transcript.rebuttals().debater_x, &transcript.rebuttals().debater_y] {
            output.push_str(&Self::format_argument(argument));
        }

        output.push_str(&Self::section_header("Judgement"));
        output.push_str(&Self::format_decision(transcript, record));
        output.push_str(&Self::footer());
        output
    }

    fn format_argument(argument: &Argument) -> String {
        let title = format!("── {} ({}) ──", argument.role.display_name(), argument.position);
        let body = match &argument.body {
            ArgumentBody::Irac(irac) => format!(
                "  Issue:       {}\n  Rule:        {}\n  Application: {}\n  Conclusion:  {}",
                irac.issue, irac.rule, irac.application, irac.conclusion
            ),
            ArgumentBody::Prose(text) => Self::indent(text, "  "),
        };
        let mut output = format!("\n{}\n{}\n", title.yellow().bold(), body);
        if let Some(critique) = &argument.critique {
            output.push_str(&format!("  {} {}\n", "Critique:".dimmed(), critique));
        }
        output
    }

    fn format_decision(transcript: &DebateTranscript, record: &DebateRecord) -> String {
        let decision = &transcript.decision;
        let mut output = String::new();
        match &decision.verdict {
            Verdict::Choice(choice) => {
                output.push_str(&format!("\n{} {}", "Decision:".green().bold(), choice));
                if let Some(gold) = record.gold_answer {
                    output.push_str(&format!(
                        "  {} {}",
                        Self::score_mark(record.is_correct()),
                        format!("(gold {})", gold).dimmed()
                    ));
                }
                output.push('\n');
            }
            Verdict::FinalAnswer(answer) => {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    "Final answer:".green().bold(),
                    Self::indent(answer, "  ")
                ));
            }
        }
        if let Some(winner) = decision.winner {
            output.push_str(&format!("{} {}\n", "Winner:".cyan().bold(), winner.display_name()));
        }
        if !decision.rationale.is_empty() {
            output.push_str(&format!("{} {}\n", "Rationale:".cyan().bold(), decision.rationale));
        }
        if !decision.key_factors.is_empty() {
            output.push_str(&format!("{}\n", "Key factors:".cyan().bold()));
            for factor in &decision.key_factors {
                output.push_str(&format!("  * {}\n", factor));
            }
        }
        output
    }

    /// Batch totals and accuracy
    pub fn format_summary(summary: &BatchSummary) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Debate Results"));
        output.push_str(&format!(
            "\n{} {}   {} {}   {} {}\n",
            "Questions:".cyan().bold(),
            summary.total,
            "Completed:".green().bold(),
            summary.completed,
            "Failed:".red().bold(),
            summary.failed
        ));
        match summary.accuracy() {
            Some(accuracy) => output.push_str(&format!(
                "{} {:.1}% ({}/{})\n",
                "Accuracy:".cyan().bold(),
                accuracy * 100.0,
                summary.correct,
                summary.scored
            )),
            None => output.push_str(&format!("{} n/a\n", "Accuracy:".cyan().bold())),
        }
        output.push_str(&Self::footer());
        output
    }

    /// One line per baseline record
    pub fn format_baseline_line(record: &BaselineRecord) -> String {
        let answer = match &record.answer {
            BaselineAnswer::Choice(choice) => choice.to_string(),
            BaselineAnswer::Essay(text) => truncate(text, 60),
        };
        let mut line = format!(
            "{} {} {}",
            Self::score_mark(record.correct),
            record.question_id.bold(),
            answer
        );
        if !record.samples.is_empty() {
            line.push_str(&format!(
                " ({}/{} votes)",
                record.majority_count,
                record.samples.len()
            ));
        }
        if record.fallback_count > 0 {
            line.push_str(&format!(
                " {}",
                format!("[{} fallback]", record.fallback_count).yellow()
            ));
        }
        line
    }

    /// Baseline accuracy over `records`
    pub fn format_baseline_summary(method: BaselineMethod, records: &[BaselineRecord]) -> String {
        let scored: Vec<bool> = records.iter().filter_map(|r| r.correct).collect();
        let correct = scored.iter().filter(|c| **c).count();
        let accuracy = if scored.is_empty() {
            "n/a".to_string()
        } else {
            format!(
                "{:.1}% ({}/{})",
                correct as f64 * 100.0 / scored.len() as f64,
                correct,
                scored.len()
            )
        };
        format!(
            "{}\n{} {}\n{}",
            Self::header(&format!("{} Results", method.display_name())),
            "Accuracy:".cyan().bold(),
            accuracy,
            Self::footer()
        )
    }

    /// Format any record as pretty JSON
    pub fn format_json(value: &impl Serialize) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn score_mark(correct: Option<bool>) -> String {
        match correct {
            Some(true) => "v".green().bold().to_string(),
            Some(false) => "x".red().bold().to_string(),
            None => "-".dimmed().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
