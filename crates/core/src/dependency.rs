//! Class-level dependency graph for layer and cycle style rules.

use crate::graph::ClassGraph;
use crate::model::ClassId;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Extends,
    Implements,
    /// A member of the source class accesses a member of the target class.
    Access,
    /// Code in the source class tests values against the target class.
    InstanceofCheck,
}

#[derive(Debug, Default)]
pub struct ClassDependencyGraph {
    topology: DiGraph<ClassId, DependencyKind>,
    nodes: HashMap<ClassId, NodeIndex>,
}

impl ClassDependencyGraph {
    pub(crate) fn build(graph: &ClassGraph) -> Self {
        let mut deps = Self::default();
        for class in graph.classes().filter(|c| c.is_complete()) {
            if let Some(superclass) = graph.superclass(class.id) {
                deps.add_edge(class.id, superclass, DependencyKind::Extends);
            }
            for iface in graph.interfaces(class.id) {
                deps.add_edge(class.id, iface, DependencyKind::Implements);
            }
            for member in graph.members_of(class.id) {
                for access in graph.accesses_from(member.id) {
                    deps.add_edge(class.id, access.target.owner, DependencyKind::Access);
                }
                for check in &member.instanceof_checks {
                    deps.add_edge(class.id, check.target, DependencyKind::InstanceofCheck);
                }
            }
        }
        tracing::debug!(
            "Dependency graph: {} classes, {} edges",
            deps.topology.node_count(),
            deps.topology.edge_count()
        );
        deps
    }

    fn node(&mut self, id: ClassId) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(&id) {
            return idx;
        }
        let idx = self.topology.add_node(id);
        self.nodes.insert(id, idx);
        idx
    }

    /// Self edges and duplicates of the same kind are dropped.
    fn add_edge(&mut self, from: ClassId, to: ClassId, kind: DependencyKind) {
        if from == to {
            return;
        }
        let from = self.node(from);
        let to = self.node(to);
        let already_exists = self
            .topology
            .edges_connecting(from, to)
            .any(|e| *e.weight() == kind);
        if !already_exists {
            self.topology.add_edge(from, to, kind);
        }
    }

    pub fn topology(&self) -> &DiGraph<ClassId, DependencyKind> {
        &self.topology
    }

    pub fn dependencies_of(&self, id: ClassId) -> Vec<(ClassId, DependencyKind)> {
        self.neighbours(id, Direction::Outgoing)
    }

    pub fn dependents_of(&self, id: ClassId) -> Vec<(ClassId, DependencyKind)> {
        self.neighbours(id, Direction::Incoming)
    }

    pub fn depends_on(&self, from: ClassId, to: ClassId) -> bool {
        match (self.nodes.get(&from), self.nodes.get(&to)) {
            (Some(&a), Some(&b)) => self.topology.contains_edge(a, b),
            _ => false,
        }
    }

    fn neighbours(&self, id: ClassId, direction: Direction) -> Vec<(ClassId, DependencyKind)> {
        let Some(&idx) = self.nodes.get(&id) else {
            return Vec::new();
        };
        self.topology
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (self.topology[other], *e.weight())
            })
            .collect()
    }
}
