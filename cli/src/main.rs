//! CLI entrypoint for legal-mad
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use mad_application::{
    BaselineRecord, GenerationGateway, NoResultSink, ResultSink, RunBaselineUseCase,
    RunBatchUseCase, RunDebateUseCase,
};
use mad_domain::{AssignmentPolicy, BaselineMethod, DebateMode, DebateRecord, LegalQuestion};
use mad_infrastructure::{
    ChatCompletionsBackend, ConfigLoader, FileConfig, JsonlResultSink, ResolvedConfig,
    read_questions,
};
use mad_presentation::{
    BaselineArgs, Cli, Command, ConsoleFormatter, DebateArgs, OutputFormat, ProgressReporter,
    RunArgs, SimpleProgress,
};
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Forwards records to the configured sink and keeps them for console output
struct EchoSink {
    inner: Arc<dyn ResultSink>,
    debates: Mutex<Vec<DebateRecord>>,
}

impl EchoSink {
    fn new(inner: Arc<dyn ResultSink>) -> Self {
        Self {
            inner,
            debates: Mutex::new(Vec::new()),
        }
    }

    fn take_debates(&self) -> Vec<DebateRecord> {
        self.debates
            .lock()
            .map(|mut records| std::mem::take(&mut *records))
            .unwrap_or_default()
    }
}

impl ResultSink for EchoSink {
    fn write_debate(&self, record: &DebateRecord) {
        self.inner.write_debate(record);
        if let Ok(mut records) = self.debates.lock() {
            records.push(record.clone());
        }
    }

    fn write_baseline(&self, record: &BaselineRecord) {
        self.inner.write_baseline(record);
    }
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Fold command-line overrides into the loaded configuration
fn apply_overrides(config: &mut FileConfig, command: &Command) {
    let run = match command {
        Command::Debate(args) => &args.run,
        Command::Baseline(args) => &args.run,
        Command::ShowConfig => return,
    };
    if let Some(model) = &run.model {
        config.backend.model = Some(model.clone());
    }
    if let Some(seed) = run.seed {
        config.debate.seed = Some(seed);
    }

    match command {
        Command::Debate(args) => {
            if let Some(mode) = args.mode {
                config.debate.mode = DebateMode::from(mode).as_str().to_string();
            }
            if let Some(policy) = args.assignment {
                config.debate.assignment = AssignmentPolicy::from(policy).as_str().to_string();
            }
            if let Some(max) = args.max_in_flight {
                config.batch.max_in_flight = max;
            }
        }
        Command::Baseline(args) => {
            if let Some(method) = args.method {
                config.baseline.method = BaselineMethod::from(method).as_str().to_string();
            }
            if let Some(samples) = args.samples {
                config.self_consistency.num_samples = samples;
            }
        }
        Command::ShowConfig => {}
    }
}

async fn load_questions(run: &RunArgs) -> Result<Vec<LegalQuestion>> {
    let mut questions = read_questions(&run.questions).await?;
    if let Some(limit) = run.limit {
        questions.truncate(limit);
    }
    info!(
        "Loaded {} questions from {}",
        questions.len(),
        run.questions.display()
    );
    Ok(questions)
}

fn open_sink(run: &RunArgs) -> Result<Arc<dyn ResultSink>> {
    Ok(match &run.output {
        Some(path) => Arc::new(
            JsonlResultSink::new(path)
                .with_context(|| format!("Cannot open output file {}", path.display()))?,
        ),
        None => Arc::new(NoResultSink),
    })
}

type Gateway = Arc<GenerationGateway<ChatCompletionsBackend>>;

fn connect(config: &FileConfig) -> Result<(ResolvedConfig, Gateway)> {
    let resolved = ConfigLoader::resolve(config)?;
    let api_key = ConfigLoader::api_key(&resolved.backend)?;
    info!(
        "Using {} model {}",
        resolved.backend.provider, resolved.backend.model
    );

    let backend = Arc::new(ChatCompletionsBackend::new(resolved.backend.clone(), api_key));
    let gateway = Arc::new(GenerationGateway::new(backend, resolved.gateway.clone()));
    Ok((resolved, gateway))
}

async fn run_debates(cli: &Cli, args: &DebateArgs, config: &FileConfig) -> Result<()> {
    let questions = load_questions(&args.run).await?;
    let (resolved, gateway) = connect(config)?;
    let sequential = resolved.batch.max_in_flight <= 1;
    let sink = Arc::new(EchoSink::new(open_sink(&args.run)?));

    // === Dependency Injection ===
    let debate = RunDebateUseCase::new(gateway, resolved.debate);
    let mut batch = RunBatchUseCase::new(debate, sink.clone(), resolved.batch);

    let summary = if cli.quiet {
        batch.execute(questions).await
    } else if sequential {
        batch = batch.with_step_progress(Arc::new(SimpleProgress));
        batch.execute_with_progress(questions, &SimpleProgress).await
    } else {
        let progress = ProgressReporter::new();
        batch.execute_with_progress(questions, &progress).await
    };

    let records = sink.take_debates();
    match args.run.format {
        OutputFormat::Summary => {
            if cli.quiet || !sequential {
                for record in &records {
                    println!("{}", ConsoleFormatter::format_record_line(record));
                }
            }
        }
        OutputFormat::Full => {
            for record in &records {
                println!("{}", ConsoleFormatter::format_record(record));
            }
        }
        OutputFormat::Json => {
            for record in &records {
                println!("{}", ConsoleFormatter::format_json(record));
            }
            println!("{}", ConsoleFormatter::format_json(&summary));
            return Ok(());
        }
    }

    println!("{}", ConsoleFormatter::format_summary(&summary));
    Ok(())
}

async fn run_baseline(args: &BaselineArgs, config: &FileConfig) -> Result<()> {
    let questions = load_questions(&args.run).await?;
    let (resolved, gateway) = connect(config)?;
    let sink = open_sink(&args.run)?;

    let use_case = RunBaselineUseCase::new(gateway, resolved.baseline, resolved.self_consistency);
    info!("Running the {} baseline", use_case.method().display_name());
    let records = use_case.execute_all(&questions, sink.as_ref()).await;

    match args.run.format {
        OutputFormat::Json => {
            for record in &records {
                println!("{}", ConsoleFormatter::format_json(record));
            }
        }
        OutputFormat::Summary | OutputFormat::Full => {
            for record in &records {
                println!("{}", ConsoleFormatter::format_baseline_line(record));
            }
            println!("{}", ConsoleFormatter::format_baseline_summary(use_case.method(), &records));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting legal-mad");

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    apply_overrides(&mut config, &cli.command);

    match &cli.command {
        Command::ShowConfig => {
            ConfigLoader::print_config_sources();
            println!();
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Command::Debate(args) => run_debates(&cli, args, &config).await,
        Command::Baseline(args) => run_baseline(args, &config).await,
    }
}
