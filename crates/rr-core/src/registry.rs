//! The fixture catalog.
//!
//! Built once by an initialization pass over a table of definitions and
//! passed explicitly to the resolver and runner. Read-only afterwards.

use crate::dag::FixtureDag;
use crate::error::{CoreError, CoreResult};
use crate::fixture::FixtureDefinition;
use crate::fixture_name::FixtureName;
use std::collections::HashMap;

/// Catalog of fixture definitions keyed by name
#[derive(Debug, Default)]
pub struct FixtureRegistry {
    fixtures: HashMap<FixtureName, FixtureDefinition>,

    /// Names in registration order
    order: Vec<FixtureName>,
}

impl FixtureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every definition, then validate the dependency graph as a
    /// whole (unknown dependencies, cycles).
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = FixtureDefinition>,
    ) -> CoreResult<Self> {
        let mut registry = Self::new();
        for def in definitions {
            registry.register(def)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Insert a definition. Fails if the name is already taken or the
    /// definition itself is malformed.
    ///
    /// Dependencies may be registered later; [`validate`](Self::validate)
    /// checks they all exist.
    pub fn register(&mut self, def: FixtureDefinition) -> CoreResult<()> {
        def.validate()?;
        if self.fixtures.contains_key(&def.name) {
            return Err(CoreError::DuplicateFixture {
                name: def.name.to_string(),
            });
        }
        log::debug!("Registered fixture '{}'", def.name);
        self.order.push(def.name.clone());
        self.fixtures.insert(def.name.clone(), def);
        Ok(())
    }

    /// Look up a definition by name
    pub fn lookup(&self, name: &str) -> CoreResult<&FixtureDefinition> {
        self.fixtures
            .get(name)
            .ok_or_else(|| CoreError::UnknownFixture {
                name: name.to_string(),
            })
    }

    /// Look up a definition by name, returning `None` if absent
    pub fn get(&self, name: &str) -> Option<&FixtureDefinition> {
        self.fixtures.get(name)
    }

    /// Check if a fixture is registered
    pub fn contains(&self, name: &str) -> bool {
        self.fixtures.contains_key(name)
    }

    /// Validate that every dependency is registered and that the graph is
    /// acyclic.
    pub fn validate(&self) -> CoreResult<()> {
        for name in &self.order {
            let def = &self.fixtures[name];
            if let Some(missing) = def.depends_on.iter().find(|d| !self.contains(d)) {
                return Err(CoreError::UnknownDependency {
                    fixture: name.to_string(),
                    dependency: missing.to_string(),
                });
            }
        }
        FixtureDag::build(self).validate()
    }

    /// Fixture names in registration order
    pub fn names(&self) -> &[FixtureName] {
        &self.order
    }

    /// Definitions in registration order
    pub fn iter(&self) -> impl Iterator<Item = &FixtureDefinition> {
        self.order.iter().map(|name| &self.fixtures[name])
    }

    /// Number of registered fixtures
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
