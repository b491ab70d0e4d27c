//! Fixture file discovery and registry construction

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::fixture::FixtureDefinition;
use crate::registry::FixtureRegistry;
use std::path::{Path, PathBuf};

/// Recursively collect `.yml`/`.yaml` files under `dir`, in sorted path order.
///
/// A missing directory yields no files.
pub fn discover_fixture_files(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    if dir.exists() {
        discover_recursive(dir, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn discover_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> CoreResult<()> {
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })? {
        let entry = entry.map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();

        if path.is_dir() {
            discover_recursive(&path, files)?;
            continue;
        }
        if path.extension().is_some_and(|e| e == "yml" || e == "yaml") {
            files.push(path);
        }
    }
    Ok(())
}

/// Parse one fixture file
pub fn load_fixture_file(path: &Path) -> CoreResult<FixtureDefinition> {
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    let def: FixtureDefinition =
        serde_yaml::from_str(&content).map_err(|e| CoreError::FixtureParseError {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
    log::debug!(
        "Loaded fixture '{}' ({} statements) from {}",
        def.name,
        def.statements.len(),
        path.display()
    );
    Ok(def)
}

/// Load every fixture under the configured paths into a validated registry
pub fn load_registry(root: &Path, config: &Config) -> CoreResult<FixtureRegistry> {
    let mut definitions = Vec::new();
    for dir in config.fixture_paths_absolute(root) {
        let files = discover_fixture_files(&dir)?;
        if files.is_empty() {
            log::warn!("No fixture files found under {}", dir.display());
        }
        for file in files {
            definitions.push(load_fixture_file(&file)?);
        }
    }
    let registry = FixtureRegistry::from_definitions(definitions)?;
    log::info!("Loaded {} fixtures for '{}'", registry.len(), config.name);
    Ok(registry)
}

#[cfg(test)]
#[path = "loading_test.rs"]
mod tests;
