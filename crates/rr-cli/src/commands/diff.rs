//! Diff command implementation

use anyhow::{Context, Result};
use rr_test::{Report, ReportDiff};
use std::path::Path;

use crate::cli::{DiffArgs, GlobalArgs};
use crate::commands::common::ExitCode;

/// Execute the diff command
pub(crate) async fn execute(args: &DiffArgs, _global: &GlobalArgs) -> Result<()> {
    let from = Report::load(Path::new(&args.from))
        .with_context(|| format!("Failed to load report {}", args.from))?;
    let to = Report::load(Path::new(&args.to))
        .with_context(|| format!("Failed to load report {}", args.to))?;

    let diff = ReportDiff::between(&from, &to);
    print!("{}", diff.to_markdown());

    if args.fail_on_regression && !diff.is_clean() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}
