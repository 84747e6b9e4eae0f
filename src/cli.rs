use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "matchscore",
    version,
    about = "Score profile evaluation engine for tournament matches"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding matchscore.toml; profile paths resolve against it
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one match side against a profile
    Evaluate(EvaluateCommand),
    /// Validate a score profile definition
    Check(CheckCommand),
}

#[derive(Args)]
pub struct EvaluateCommand {
    /// Score input document (.json or .toml)
    #[arg(long)]
    pub input: PathBuf,

    /// Profile definition to apply
    #[arg(long, required_unless_present = "stage", conflicts_with = "stage")]
    pub profile: Option<PathBuf>,

    /// Stage id; the profile is resolved from matchscore.toml
    #[arg(long, required_unless_present = "profile", conflicts_with = "profile")]
    pub stage: Option<String>,

    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct CheckCommand {
    pub profile: PathBuf,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
