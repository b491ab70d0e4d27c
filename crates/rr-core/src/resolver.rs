//! Execution order for a requested fixture and its transitive dependencies.

use crate::error::{CoreError, CoreResult};
use crate::fixture_name::FixtureName;
use crate::registry::FixtureRegistry;
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current DFS path
    Visiting,
    /// Already emitted
    Done,
}

/// Compute the execution order for `root`.
///
/// Every transitive dependency appears exactly once, strictly before every
/// fixture that depends on it, and `root` comes last. Siblings are visited
/// in their declared `depends_on` order, so the output is identical across
/// calls against an unchanged registry.
///
/// Revisiting a fixture that is still on the current path is a cycle and
/// fails with [`CoreError::CircularDependency`] naming the fixtures involved.
pub fn resolve(registry: &FixtureRegistry, root: &str) -> CoreResult<Vec<FixtureName>> {
    let mut resolver = Resolver {
        registry,
        marks: HashMap::new(),
        path: Vec::new(),
        order: Vec::new(),
    };
    let root_def = registry.lookup(root)?;
    resolver.visit(&root_def.name)?;
    Ok(resolver.order)
}

/// Resolve several roots into one order, each fixture appearing once.
///
/// Roots are processed in the order given; a fixture already placed by an
/// earlier root is not repeated.
pub fn resolve_all(registry: &FixtureRegistry, roots: &[&str]) -> CoreResult<Vec<FixtureName>> {
    let mut resolver = Resolver {
        registry,
        marks: HashMap::new(),
        path: Vec::new(),
        order: Vec::new(),
    };
    for root in roots {
        let root_def = registry.lookup(root)?;
        resolver.visit(&root_def.name)?;
    }
    Ok(resolver.order)
}

struct Resolver<'a> {
    registry: &'a FixtureRegistry,
    marks: HashMap<&'a str, Mark>,
    path: Vec<&'a FixtureName>,
    order: Vec<FixtureName>,
}

impl<'a> Resolver<'a> {
    fn visit(&mut self, name: &'a FixtureName) -> CoreResult<()> {
        match self.marks.get(name.as_str()) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(self.cycle_error(name)),
            None => {}
        }

        let registry = self.registry;
        let def = registry.lookup(name)?;
        self.marks.insert(def.name.as_str(), Mark::Visiting);
        self.path.push(&def.name);

        for dep in &def.depends_on {
            if !registry.contains(dep) {
                return Err(CoreError::UnknownDependency {
                    fixture: def.name.to_string(),
                    dependency: dep.to_string(),
                });
            }
            self.visit(dep)?;
        }

        self.path.pop();
        self.marks.insert(def.name.as_str(), Mark::Done);
        self.order.push(def.name.clone());
        Ok(())
    }

    /// Build the cycle error from the part of the current path that starts at
    /// the revisited fixture.
    fn cycle_error(&self, revisited: &FixtureName) -> CoreError {
        let start = self
            .path
            .iter()
            .position(|n| *n == revisited)
            .unwrap_or(0);
        let fixtures: Vec<String> = self.path[start..].iter().map(|n| n.to_string()).collect();
        let mut cycle = fixtures.clone();
        cycle.push(revisited.to_string());
        CoreError::CircularDependency {
            cycle: cycle.join(" -> "),
            fixtures,
        }
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
