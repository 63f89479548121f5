//! Dependency graph between templates.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: template IRIs, including referenced IRIs that are not defined
//! - Edges: `A -> B` when an instance in the body of `A` references `B`

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Reference graph over template IRIs.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, iri: &str) -> NodeIndex {
        if let Some(&index) = self.nodes.get(iri) {
            return index;
        }
        let index = self.graph.add_node(iri.to_string());
        self.nodes.insert(iri.to_string(), index);
        index
    }

    /// Record a template and the IRIs its body references.
    pub fn add_template<'a>(&mut self, iri: &str, dependencies: impl IntoIterator<Item = &'a str>) {
        let from = self.node(iri);
        for dependency in dependencies {
            let to = self.node(dependency);
            self.graph.update_edge(from, to, ());
        }
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.nodes.contains_key(iri)
    }

    /// Every IRI known to the graph, defined or merely referenced.
    pub fn iris(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Direct references of `iri`.
    pub fn direct_dependencies(&self, iri: &str) -> BTreeSet<String> {
        self.neighbours(iri, Direction::Outgoing)
    }

    /// Transitive closure of references from `iri`.
    ///
    /// `iri` itself is included only if it lies on a cycle.
    pub fn dependencies_of(&self, iri: &str) -> BTreeSet<String> {
        self.reachable(iri, Direction::Outgoing)
    }

    /// Transitive closure of templates referencing `iri`.
    pub fn dependents_of(&self, iri: &str) -> BTreeSet<String> {
        self.reachable(iri, Direction::Incoming)
    }

    fn neighbours(&self, iri: &str, direction: Direction) -> BTreeSet<String> {
        let Some(&start) = self.nodes.get(iri) else {
            return BTreeSet::new();
        };
        self.graph
            .neighbors_directed(start, direction)
            .map(|n| self.graph[n].clone())
            .collect()
    }

    fn reachable(&self, iri: &str, direction: Direction) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let Some(&start) = self.nodes.get(iri) else {
            return found;
        };
        let mut visited = vec![false; self.graph.node_count()];
        let mut queue: VecDeque<NodeIndex> =
            self.graph.neighbors_directed(start, direction).collect();
        while let Some(node) = queue.pop_front() {
            if visited[node.index()] {
                continue;
            }
            visited[node.index()] = true;
            found.insert(self.graph[node].clone());
            queue.extend(self.graph.neighbors_directed(node, direction));
        }
        found
    }

    /// IRIs that lie on a directed cycle.
    pub fn detect_cycles(&self) -> BTreeSet<String> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .flatten()
            .map(|n| self.graph[n].clone())
            .collect()
    }

    /// IRIs ordered so that every template comes after everything it
    /// references. Fails with the cyclic IRIs if there is a cycle.
    pub fn topological_order(&self) -> Result<Vec<String>, BTreeSet<String>> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .rev()
                .map(|n| self.graph[n].clone())
                .collect()),
            Err(_) => Err(self.detect_cycles()),
        }
    }
}
