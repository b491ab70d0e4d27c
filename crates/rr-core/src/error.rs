//! Error types for rr-core

use thiserror::Error;

/// Core error type for regrun
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Fixture name was requested but never registered
    #[error("[E004] Fixture not found: {name}")]
    UnknownFixture { name: String },

    /// E005: A fixture lists a dependency that is not registered
    #[error("[E005] Fixture '{fixture}' depends on unregistered fixture '{dependency}'")]
    UnknownDependency { fixture: String, dependency: String },

    /// E006: Fixture lists itself as a dependency
    #[error("[E006] Fixture '{name}' depends on itself")]
    SelfDependency { name: String },

    /// E007: Circular dependency detected
    #[error("[E007] Circular dependency detected: {cycle}")]
    CircularDependency {
        cycle: String,
        fixtures: Vec<String>,
    },

    /// E008: Duplicate fixture name
    #[error("[E008] Duplicate fixture name: {name}")]
    DuplicateFixture { name: String },

    /// E009: Same dependency listed twice
    #[error("[E009] Fixture '{fixture}' lists dependency '{dependency}' more than once")]
    DuplicateDependency { fixture: String, dependency: String },

    /// E010: Statement declares conflicting expectations
    #[error("[E010] Invalid statement {index} in fixture '{fixture}': {reason}")]
    InvalidStatement {
        fixture: String,
        index: usize,
        reason: String,
    },

    /// E011: Fixture file could not be parsed
    #[error("[E011] Failed to parse fixture file {path}: {details}")]
    FixtureParseError { path: String, details: String },

    /// E012: Fixture declared with an empty name
    #[error("[E012] Empty name: {context}")]
    EmptyName { context: String },

    /// E013: Illegal fixture status transition
    #[error("[E013] Fixture '{name}' cannot move from {from} to {to}")]
    InvalidTransition {
        name: String,
        from: String,
        to: String,
    },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E015: YAML parse error
    #[error("[E015] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E017: JSON serialization/deserialization error
    #[error("[E017] JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether this error is a defect in the fixture corpus or its
    /// configuration. These abort the whole run before any engine work.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CoreError::ConfigNotFound { .. }
                | CoreError::ConfigParseError { .. }
                | CoreError::ConfigInvalid { .. }
                | CoreError::UnknownFixture { .. }
                | CoreError::UnknownDependency { .. }
                | CoreError::SelfDependency { .. }
                | CoreError::CircularDependency { .. }
                | CoreError::DuplicateFixture { .. }
                | CoreError::DuplicateDependency { .. }
                | CoreError::InvalidStatement { .. }
                | CoreError::FixtureParseError { .. }
                | CoreError::EmptyName { .. }
        )
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
