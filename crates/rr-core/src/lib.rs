//! rr-core - Core library for regrun
//!
//! This crate provides the fixture model, result values, the fixture
//! registry, dependency resolution, configuration parsing, and fixture file
//! discovery shared by every regrun component.

pub mod config;
pub mod dag;
pub mod error;
pub mod fixture;
pub mod fixture_name;
pub mod loading;
pub mod registry;
pub mod resolver;
pub mod status;
pub mod value;

pub use config::{Config, DatabaseConfig};
pub use dag::FixtureDag;
pub use error::{CoreError, CoreResult};
pub use fixture::{Expectation, FixtureDefinition, StatementCase, StatementKind};
pub use fixture_name::FixtureName;
pub use loading::{discover_fixture_files, load_fixture_file, load_registry};
pub use registry::FixtureRegistry;
pub use resolver::{resolve, resolve_all};
pub use status::{FixtureStatus, StatementStatus};
pub use value::{Row, Value};
