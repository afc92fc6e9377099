//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use mad_domain::{AssignmentPolicy, BaselineMethod, DebateMode};
use std::path::PathBuf;

/// Console output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per question plus the batch summary
    #[default]
    Summary,
    /// Every argument and the full decision
    Full,
    /// JSON records on stdout
    Json,
}

/// Debate mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Vanilla,
    Irac,
    IracHybrid,
    OpenEnded,
    OpenEndedVanilla,
}

impl From<ModeArg> for DebateMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Vanilla => DebateMode::Vanilla,
            ModeArg::Irac => DebateMode::Irac,
            ModeArg::IracHybrid => DebateMode::IracHybrid,
            ModeArg::OpenEnded => DebateMode::OpenEnded,
            ModeArg::OpenEndedVanilla => DebateMode::OpenEndedVanilla,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AssignmentArg {
    /// Draw two distinct positions, then open concurrently
    Independent,
    /// X chooses freely, Y is assigned one of the other letters
    Free,
}

impl From<AssignmentArg> for AssignmentPolicy {
    fn from(policy: AssignmentArg) -> Self {
        match policy {
            AssignmentArg::Independent => AssignmentPolicy::IndependentDistinct,
            AssignmentArg::Free => AssignmentPolicy::FreeThenConstrained,
        }
    }
}

/// Baseline method as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// One zero-shot answer
    Single,
    /// Chain of thought
    Cot,
    /// Chain of thought steered by IRAC
    CotIrac,
    /// Majority over sampled answers
    SelfConsistency,
}

impl From<MethodArg> for BaselineMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Single => BaselineMethod::Single,
            MethodArg::Cot => BaselineMethod::Cot,
            MethodArg::CotIrac => BaselineMethod::CotIrac,
            MethodArg::SelfConsistency => BaselineMethod::SelfConsistency,
        }
    }
}

/// CLI arguments for legal-mad
#[derive(Parser, Debug)]
#[command(name = "legal-mad")]
#[command(author, version, about = "Multi-Agent Debate for legal questions")]
#[command(long_about = r#"
legal-mad answers legal exam questions by structured debate.

Two debaters take different positions and argue in IRAC form
(Issue, Rule, Application, Conclusion):
1. Openings: each debater fixes its position
2. Rebuttals: each debater attacks the opponent's opening
3. Judgement: a judge decides the answer (or writes one, for essays)

Configuration files are loaded from (in priority order):
1. LEGAL_MAD_* environment variables
2. --config <path>          Explicit config file
3. ./legal-mad.toml         Project-level config
4. ~/.config/legal-mad/config.toml   Global config

Example:
  legal-mad debate questions.jsonl -o results.jsonl
  legal-mad debate oab.jsonl --mode open-ended --limit 10
  legal-mad baseline questions.jsonl --samples 5
  legal-mad baseline oab.jsonl --method cot-irac
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Debate every question in a JSONL file
    Debate(DebateArgs),

    /// Answer a JSONL file with a single-agent baseline
    Baseline(BaselineArgs),

    /// Show configuration file locations and the merged configuration
    ShowConfig,
}

/// Options shared by every command that calls a model
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Questions, one JSON object per line
    pub questions: PathBuf,

    /// Append result records to this JSONL file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Only the first N questions
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Model id (overrides [backend].model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Seed for reproducible position draws and sample nonces
    #[arg(long)]
    pub seed: Option<u64>,

    /// Console output format
    #[arg(short = 'f', long, value_enum, default_value = "summary")]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct DebateArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Debate mode (overrides [debate].mode)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Position assignment policy for multiple-choice modes
    #[arg(long, value_enum)]
    pub assignment: Option<AssignmentArg>,

    /// Questions debated at the same time
    #[arg(long, value_name = "N")]
    pub max_in_flight: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct BaselineArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Baseline method (overrides [baseline].method)
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Samples per question (self-consistency)
    #[arg(long, value_name = "N")]
    pub samples: Option<usize>,
}
