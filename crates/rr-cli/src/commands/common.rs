//! Shared helpers for CLI commands

use anyhow::{Context, Result};
use rr_core::{load_registry, Config, FixtureRegistry};
use rr_db::DuckDbEngine;
use std::fmt;
use std::path::{Path, PathBuf};

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main exits with the code without printing.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A loaded project: its root, configuration, and fixture registry
pub(crate) struct Project {
    pub root: PathBuf,
    pub config: Config,
    pub registry: FixtureRegistry,
}

impl Project {
    /// Load the project named by the global arguments
    pub(crate) fn load(global: &crate::cli::GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&global.project_dir);
        let config = match &global.config {
            Some(path) => Config::load(Path::new(path)),
            None => Config::load_from_dir(&root),
        }
        .context("Failed to load configuration")?;
        let registry = load_registry(&root, &config).context("Failed to load fixtures")?;
        Ok(Self {
            root,
            config,
            registry,
        })
    }

    /// Open the engine, honoring the `--target` override
    pub(crate) fn open_engine(&self, global: &crate::cli::GlobalArgs) -> Result<DuckDbEngine> {
        let db_path = global.target.as_ref().unwrap_or(&self.config.database.path);
        DuckDbEngine::new(db_path).context("Failed to connect to database")
    }
}
