//! Progress reporting for debate batches

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mad_application::{BatchProgressNotifier, DebateProgressNotifier, QuestionStatus};
use mad_domain::DebateStep;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Tally {
    correct: usize,
    incorrect: usize,
    failed: usize,
}

/// Reports batch progress with a progress bar and a running tally
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
    tally: Mutex<Tally>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            tally: Mutex::new(Tally::default()),
        }
    }

    fn batch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn status_mark(status: QuestionStatus) -> String {
        match status {
            QuestionStatus::Correct => "v".green().to_string(),
            QuestionStatus::Incorrect => "x".red().to_string(),
            QuestionStatus::Answered => "-".dimmed().to_string(),
            QuestionStatus::Failed => "!".red().bold().to_string(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProgressNotifier for ProgressReporter {
    fn on_batch_start(&self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::batch_style());
        pb.set_prefix("Debating");
        pb.set_message("Starting...");
        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_question_complete(&self, question_id: &str, status: QuestionStatus) {
        let summary = match self.tally.lock() {
            Ok(mut tally) => {
                match status {
                    QuestionStatus::Correct => tally.correct += 1,
                    QuestionStatus::Incorrect => tally.incorrect += 1,
                    QuestionStatus::Failed => tally.failed += 1,
                    QuestionStatus::Answered => {}
                }
                format!(
                    "{} correct, {} wrong, {} failed",
                    tally.correct, tally.incorrect, tally.failed
                )
            }
            Err(_) => String::new(),
        };

        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(format!("{} {}  {}", Self::status_mark(status), question_id, summary));
            pb.inc(1);
        }
    }

    fn on_batch_complete(&self) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message("Batch complete!".green().to_string());
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl BatchProgressNotifier for SimpleProgress {
    fn on_batch_start(&self, total: usize) {
        println!("{} {} ({} questions)", "->".cyan(), "Debating".bold(), total);
    }

    fn on_question_complete(&self, question_id: &str, status: QuestionStatus) {
        println!("  {} {}", ProgressReporter::status_mark(status), question_id);
    }

    fn on_batch_complete(&self) {
        println!();
    }
}

impl DebateProgressNotifier for SimpleProgress {
    fn on_step_start(&self, question_id: &str, step: DebateStep) {
        println!("{} {} {}", "->".cyan(), question_id.bold(), step.display_name());
    }

    fn on_step_complete(&self, _question_id: &str, step: DebateStep, success: bool) {
        if success {
            println!("  {} {}", "v".green(), step.display_name());
        } else {
            println!("  {} {} (failed)", "x".red(), step.display_name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tallies_without_a_started_bar() {
        let reporter = ProgressReporter::new();
        reporter.on_question_complete("q1", QuestionStatus::Correct);
        reporter.on_question_complete("q2", QuestionStatus::Failed);

        let tally = reporter.tally.lock().unwrap();
        assert_eq!(tally.correct, 1);
        assert_eq!(tally.failed, 1);
    }

    #[test]
    fn test_reporter_lifecycle() {
        let reporter = ProgressReporter::new();
        reporter.on_batch_start(2);
        reporter.on_question_complete("q1", QuestionStatus::Incorrect);
        reporter.on_question_complete("q2", QuestionStatus::Answered);
        reporter.on_batch_complete();

        assert!(reporter.bar.lock().unwrap().is_none());
        assert_eq!(reporter.tally.lock().unwrap().incorrect, 1);
    }
}
