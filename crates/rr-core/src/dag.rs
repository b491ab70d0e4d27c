//! Whole-corpus fixture dependency graph

use crate::error::{CoreError, CoreResult};
use crate::fixture_name::FixtureName;
use crate::registry::FixtureRegistry;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// A directed graph of fixture dependencies.
///
/// Edges point from dependency to dependent, so a topological sort yields
/// setup fixtures first. Used to validate the whole registry up front and to
/// answer "who depends on this" queries; per-run ordering comes from
/// [`resolve`](crate::resolver::resolve).
#[derive(Debug)]
pub struct FixtureDag {
    /// The underlying graph
    graph: DiGraph<FixtureName, ()>,

    /// Map from fixture name to node index
    node_map: HashMap<FixtureName, NodeIndex>,
}

impl FixtureDag {
    /// Create a new empty DAG
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add a fixture to the DAG
    pub fn add_fixture(&mut self, name: &FixtureName) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(name) {
            idx
        } else {
            let idx = self.graph.add_node(name.clone());
            self.node_map.insert(name.clone(), idx);
            idx
        }
    }

    /// Add a dependency edge (`fixture` depends on `dependency`)
    pub fn add_dependency(&mut self, fixture: &FixtureName, dependency: &FixtureName) {
        let from_idx = self.add_fixture(fixture);
        let to_idx = self.add_fixture(dependency);
        self.graph.add_edge(to_idx, from_idx, ());
    }

    /// Build the DAG from every registered fixture.
    ///
    /// Dependencies that are not registered are left out of the graph;
    /// [`FixtureRegistry::validate`] reports them.
    pub fn build(registry: &FixtureRegistry) -> Self {
        let mut dag = Self::new();

        for def in registry.iter() {
            dag.add_fixture(&def.name);
        }

        for def in registry.iter() {
            for dep in &def.depends_on {
                if registry.contains(dep) {
                    dag.add_dependency(&def.name, dep);
                }
            }
        }

        dag
    }

    /// Validate the DAG has no cycles
    pub fn validate(&self) -> CoreResult<()> {
        self.topological_order().map(|_| ())
    }

    /// Find a cycle path starting from a node for error reporting
    fn cycle_error(&self, start: NodeIndex) -> CoreError {
        let mut path: Vec<String> = vec![self.graph[start].to_string()];
        let mut current = start;
        let mut visited = HashSet::new();
        visited.insert(current);

        // Follow edges that stay inside a strongly connected component so the
        // walk cannot wander off into an acyclic tail.
        let sccs = petgraph::algo::tarjan_scc(&self.graph);
        let component: HashSet<NodeIndex> = sccs
            .into_iter()
            .find(|scc| scc.contains(&start))
            .map(|scc| scc.into_iter().collect())
            .unwrap_or_default();

        while let Some(edge) = self
            .graph
            .edges(current)
            .find(|e| component.contains(&e.target()))
        {
            let target = edge.target();
            path.push(self.graph[target].to_string());

            if target == start || visited.contains(&target) {
                break;
            }

            visited.insert(target);
            current = target;
        }

        let mut fixtures: Vec<String> = path.clone();
        fixtures.pop();
        CoreError::CircularDependency {
            cycle: path.join(" -> "),
            fixtures,
        }
    }

    /// Every fixture in dependency order (dependencies first)
    pub fn topological_order(&self) -> CoreResult<Vec<FixtureName>> {
        match toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .into_iter()
                .map(|idx| self.graph[idx].clone())
                .collect()),
            Err(cycle) => Err(self.cycle_error(cycle.node_id())),
        }
    }

    /// Get direct dependents of a fixture
    pub fn dependents(&self, fixture: &str) -> Vec<FixtureName> {
        if let Some(&idx) = self.node_map.get(fixture) {
            let mut names: Vec<FixtureName> = self
                .graph
                .edges_directed(idx, petgraph::Direction::Outgoing)
                .map(|e| self.graph[e.target()].clone())
                .collect();
            names.sort();
            names
        } else {
            Vec::new()
        }
    }

    /// Check if a fixture exists in the DAG
    pub fn contains(&self, fixture: &str) -> bool {
        self.node_map.contains_key(fixture)
    }
}

impl Default for FixtureDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
