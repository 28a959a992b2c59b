//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use taskforce_domain::{OutputFormat, Participant, TaskForceKind};

/// Output format for task force results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// First-round contributions, rounds, consensus and solution
    Full,
    /// Only the synthesized solution
    Solution,
    /// JSON output
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Full => OutputFormat::Full,
            OutputFormatArg::Solution => OutputFormat::Solution,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Task force lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Long-lived council
    #[value(alias = "council")]
    Persistent,
    /// One-off mission
    #[value(alias = "expedition")]
    Ephemeral,
}

impl From<KindArg> for TaskForceKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Persistent => TaskForceKind::Persistent,
            KindArg::Ephemeral => TaskForceKind::Ephemeral,
        }
    }
}

/// CLI arguments for taskforce
#[derive(Parser, Debug)]
#[command(name = "taskforce")]
#[command(author, version, about = "Task force orchestration - participants iterate toward consensus")]
#[command(long_about = r#"
taskforce assembles a group of participants around one problem and lets them
iterate until they agree, the round limit is hit, or the time budget runs out.

Each run:
1. Contribution: every participant answers the problem in parallel
2. Refinement: participants revise their answers after reading the discussion,
   with agreement scored after every round
3. Synthesis: the whole discussion is condensed into one solution

Participants are consulted through the oracle command set in [oracle].

Configuration files are loaded from (in priority order):
1. TASKFORCE_<SECTION>__<KEY>   Environment variables
2. --config <path>              Explicit config file
3. ./taskforce.toml             Project-level config
4. ~/.config/taskforce/config.toml   Global config

Example:
  taskforce run "How should we shard the users table?" -p dba=Database -p sre=Operations
  taskforce run "Pick a cache eviction policy" -p a -p b -p c --max-rounds 3 --output full
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

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

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a task force for a problem and execute it
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// The problem statement the task force works on
    pub problem: String,

    /// Participant as `id` or `id=label` (repeat for each member)
    #[arg(short, long = "participant", value_name = "ID[=LABEL]", value_parser = parse_participant)]
    pub participants: Vec<Participant>,

    /// Display name of the task force
    #[arg(long, default_value = "taskforce")]
    pub name: String,

    /// Task force lifetime (defaults to [taskforce] kind)
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Required capability tag (repeatable)
    #[arg(long = "capability", value_name = "TAG")]
    pub capabilities: Vec<String>,

    /// Maximum number of participants
    #[arg(long)]
    pub max_agents: Option<usize>,

    /// Maximum number of rounds, 1 to 50
    #[arg(long)]
    pub max_rounds: Option<usize>,

    /// Consensus score that ends the run early, 0.5 to 1.0
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Overall time budget in minutes, 5 to 120
    #[arg(long)]
    pub timeout_minutes: Option<u64>,

    /// Oracle command, overriding [oracle] command
    #[arg(long, value_name = "PROGRAM")]
    pub oracle: Option<String>,

    /// Output format (defaults to [output] format, then `solution`)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormatArg>,

    /// Write the conversation transcript to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}

fn parse_participant(s: &str) -> Result<Participant, String> {
    let participant: Participant = s
        .parse()
        .map_err(|e: std::convert::Infallible| e.to_string())?;
    if participant.id.as_str().is_empty() {
        return Err(format!("participant '{}' has an empty id", s));
    }
    Ok(participant)
}
