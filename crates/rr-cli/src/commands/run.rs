//! Run command implementation

use anyhow::{bail, Context, Result};
use rr_core::FixtureStatus;
use rr_test::{ConformanceRunner, FixtureReport, Report, RunOptions};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{GlobalArgs, OutputFormat, RunArgs};
use crate::commands::common::{ExitCode, Project};

/// Execute the run command
pub(crate) async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let project = Project::load(global)?;

    let roots: Vec<&str> = if args.all {
        project.registry.names().iter().map(|n| n.as_str()).collect()
    } else {
        args.fixtures.iter().map(String::as_str).collect()
    };
    if roots.is_empty() {
        bail!("No fixtures requested; pass fixture names or --all");
    }

    let engine = project.open_engine(global)?;
    let deadline = args
        .deadline_secs
        .map(Duration::from_secs)
        .or_else(|| project.config.deadline());
    let options = match deadline {
        Some(timeout) => RunOptions::with_timeout(timeout),
        None => RunOptions::default(),
    };

    let report = ConformanceRunner::new(&project.registry, &engine)
        .with_options(options)
        .run_many(&roots)
        .await
        .context("Conformance run aborted")?;

    let report_path = match &args.report {
        Some(path) => PathBuf::from(path),
        None => project.root.join(&project.config.report_path),
    };
    report
        .save(&report_path)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_text(&report),
    }
    log::info!("Report written to {}", report_path.display());

    if !report.all_passed() {
        return Err(ExitCode(2).into());
    }
    Ok(())
}

fn print_text(report: &Report) {
    for fixture in &report.fixtures {
        println!("{}", fixture_line(fixture));
        for failure in &fixture.failures {
            match failure.statement_index {
                Some(index) => println!("      [{}] {}", index, failure.sql),
                None => println!("      [-]"),
            }
            println!("          {}", failure.reason);
        }
    }

    let (pass, skip, fail) = report.totals();
    let counts = report.fixture_counts();
    println!();
    println!(
        "Fixtures: {} passed, {} failed, {} skipped",
        counts.passed, counts.failed, counts.skipped
    );
    println!(
        "Statements: {} passed, {} failed, {} skipped ({}ms)",
        pass, fail, skip, report.duration_ms
    );
}

fn fixture_line(fixture: &FixtureReport) -> String {
    let label = match fixture.status {
        FixtureStatus::Passed => "PASS",
        FixtureStatus::Failed => "FAIL",
        FixtureStatus::Skipped => "SKIP",
        FixtureStatus::Pending | FixtureStatus::Running => "????",
    };
    match &fixture.skip_reason {
        Some(reason) => format!("  {}  {} ({})", label, fixture.name, reason),
        None => format!(
            "  {}  {} ({}/{} statements, {}ms)",
            label,
            fixture.name,
            fixture.pass_ids.len(),
            fixture.statements.len(),
            fixture.duration_ms
        ),
    }
}
