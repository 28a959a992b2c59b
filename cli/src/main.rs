//! CLI entrypoint for taskforce
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use taskforce_application::{
    ConversationLogger, NoConversationLogger, TaskForceOrchestrator, TaskForceRepository,
};
use taskforce_domain::{Severity, TaskForceConfig};
use taskforce_infrastructure::{
    CommandOracle, ConfigLoader, FileConfig, InMemoryTaskForceRepository,
    JsonlConversationLogger, JsonlTaskForceRepository, PersistenceBackend,
};
use taskforce_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormatter, ProgressReporter, RunArgs, SimpleProgress,
};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Held until exit so buffered file log lines are flushed
    let _log_guard = init_tracing(cli.verbose, config.logging.dir.as_deref());

    check_config(&config)?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Some(Command::Run(args)) => run(args, &config, cli.quiet).await,
        None => bail!("No command given. Try `taskforce run --help`."),
    }
}

/// Console logging to stderr filtered by `-v` (or `RUST_LOG`), plus a daily
/// rolling file when `[logging] dir` is set.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let (file, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "taskforce.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}

fn check_config(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
        eprintln!("warning: {}", issue.message);
    }

    let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
    if !errors.is_empty() {
        for issue in &errors {
            eprintln!("error: {}", issue.message);
        }
        bail!("Invalid configuration ({} error(s))", errors.len());
    }
    Ok(())
}

fn build_task_force_config(args: &RunArgs, config: &FileConfig) -> Result<TaskForceConfig> {
    let mut builder = config.taskforce.builder(&args.name, &args.problem);

    if let Some(kind) = args.kind {
        builder = builder.kind(kind.into());
    }
    for tag in &args.capabilities {
        builder = builder.capability(tag);
    }
    if let Some(max) = args.max_agents {
        builder = builder.max_agents(max);
    }
    if let Some(max) = args.max_rounds {
        builder = builder.max_rounds(max);
    }
    if let Some(threshold) = args.threshold {
        builder = builder.consensus_threshold(threshold);
    }
    if let Some(minutes) = args.timeout_minutes {
        builder = builder.timeout_minutes(minutes);
    }

    Ok(builder.build()?)
}

fn build_repository(config: &FileConfig) -> Result<Arc<dyn TaskForceRepository>> {
    match config.persistence.parse_backend().0 {
        PersistenceBackend::Memory => Ok(Arc::new(InMemoryTaskForceRepository::new())),
        PersistenceBackend::Jsonl => {
            let path = config
                .persistence
                .path
                .as_ref()
                .ok_or_else(|| anyhow!("persistence.path is required for the jsonl backend"))?;
            info!("Recording task forces to {}", path.display());
            Ok(Arc::new(JsonlTaskForceRepository::open(path)?))
        }
    }
}

fn build_logger(args: &RunArgs, config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let path = args
        .transcript
        .as_ref()
        .or(config.logging.conversation_log.as_ref());

    match path.and_then(JsonlConversationLogger::new) {
        Some(logger) => {
            info!("Writing transcript to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    }
}

async fn run(args: RunArgs, config: &FileConfig, quiet: bool) -> Result<()> {
    let task_force_config = build_task_force_config(&args, config)?;

    let program = match args.oracle.as_ref().or(config.oracle.command.as_ref()) {
        Some(program) => program.clone(),
        None => bail!(
            "No oracle command configured. Set [oracle] command in taskforce.toml, \
             TASKFORCE_ORACLE__COMMAND, or pass --oracle."
        ),
    };

    // === Dependency Injection ===
    let mut oracle = CommandOracle::new(program).with_args(config.oracle.args.clone());
    if let Some(secs) = config.oracle.timeout_secs {
        oracle = oracle.with_timeout(Duration::from_secs(secs));
    }
    let oracle = Arc::new(oracle);
    let orchestrator = TaskForceOrchestrator::with_collaborators(
        oracle,
        config.execution.to_execution_params(),
        build_repository(config)?,
        build_logger(&args, config),
    );

    if !quiet {
        eprintln!();
        eprintln!("Task force: {} ({})", task_force_config.name, task_force_config.kind);
        eprintln!("Problem: {}", task_force_config.problem_statement);
        eprintln!(
            "Participants: {}",
            args.participants
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        eprintln!(
            "Limits: {} rounds, threshold {:.2}, {} min",
            task_force_config.max_rounds,
            task_force_config.consensus_threshold,
            task_force_config.timeout.as_secs() / 60
        );
        eprintln!();
    }

    let id = orchestrator
        .create(task_force_config, args.participants)
        .await?;

    let result = if quiet {
        orchestrator.execute(&id).await?
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        orchestrator.execute_with_progress(&id, &progress).await?
    } else {
        // Redirected stderr gets plain lines instead of redrawn bars
        orchestrator.execute_with_progress(&id, &SimpleProgress).await?
    };

    let format = args
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter.render(&result, format));

    Ok(())
}
