//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// regrun - dependency-ordered SQL conformance runs
#[derive(Parser, Debug)]
#[command(name = "rr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target (database path)
    #[arg(short, long, global = true, env = "RR_TARGET")]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run fixtures and their dependencies against the engine
    Run(RunArgs),

    /// List fixtures in execution order
    Ls(LsArgs),

    /// Compare two saved reports
    Diff(DiffArgs),
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Fixtures to run; dependencies are resolved automatically
    pub fixtures: Vec<String>,

    /// Run every registered fixture
    #[arg(long, conflicts_with = "fixtures")]
    pub all: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Where to write the JSON report (default: report_path from config)
    #[arg(long)]
    pub report: Option<String>,

    /// Run-level deadline in seconds (overrides config)
    #[arg(long)]
    pub deadline_secs: Option<u64>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// The full report as JSON
    Json,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Show the resolved order for this fixture (default: every fixture)
    pub fixture: Option<String>,

    /// Also list each fixture's direct dependents
    #[arg(long)]
    pub dependents: bool,
}

/// Arguments for the diff command
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Baseline report
    pub from: String,

    /// Report to compare against the baseline
    pub to: String,

    /// Exit with an error when any statement regressed
    #[arg(long)]
    pub fail_on_regression: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
