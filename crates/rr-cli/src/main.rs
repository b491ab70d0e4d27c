//! regrun CLI - dependency-ordered SQL conformance runs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, GlobalArgs};
use commands::common::ExitCode;
use commands::{diff, ls, run};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.global);

    let result: Result<()> = match &cli.command {
        cli::Commands::Run(args) => run::execute(args, &cli.global).await,
        cli::Commands::Ls(args) => ls::execute(args, &cli.global).await,
        cli::Commands::Diff(args) => diff::execute(args, &cli.global).await,
    };

    if let Err(err) = result {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

/// Initialize logging. `RR_LOG` takes precedence over `RUST_LOG`; `log`
/// records from the library crates are bridged into the subscriber.
fn init_logging(global: &GlobalArgs) {
    let default_level = if global.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("RR_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
