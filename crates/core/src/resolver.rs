//! Binding access targets to the members they can reach.

use crate::graph::ClassGraph;
use crate::model::{AccessTarget, ClassId, MemberId};
use archscope_api::MemberKind;
use indexmap::IndexSet;
use std::collections::{HashSet, VecDeque};

/// Computes the member set an access target binds to.
///
/// Called at most once per target; the graph caches the answer.
pub trait TargetResolver: Send + Sync {
    fn resolve(&self, graph: &ClassGraph, target: &AccessTarget) -> IndexSet<MemberId>;
}

/// Resolution against the batch's own class hierarchy.
///
/// Constructors bind only to the owner's constructors with the same parameter
/// types. Methods and fields bind to the first class up the superclass chain
/// that declares a match; if no class does, to every match found in the
/// implemented interfaces, searched breadth first.
#[derive(Debug, Default, Clone, Copy)]
pub struct HierarchyResolver;

impl TargetResolver for HierarchyResolver {
    fn resolve(&self, graph: &ClassGraph, target: &AccessTarget) -> IndexSet<MemberId> {
        let resolved = match target.kind {
            MemberKind::Constructor => declared_matches(graph, target.owner, target),
            MemberKind::Method | MemberKind::Field => find_in_hierarchy(graph, target),
            MemberKind::StaticInitializer => IndexSet::new(),
        };
        tracing::trace!(
            "Resolved {}.{} to {} member(s)",
            graph.class_name(target.owner),
            target.name,
            resolved.len()
        );
        resolved
    }
}

fn declared_matches(graph: &ClassGraph, class: ClassId, target: &AccessTarget) -> IndexSet<MemberId> {
    graph
        .members_of(class)
        .filter(|m| m.kind == target.kind)
        .filter(|m| {
            if m.is_field() {
                m.name == target.name
            } else {
                m.matches_signature(&target.name, &target.parameters)
            }
        })
        .map(|m| m.id)
        .collect()
}

fn find_in_hierarchy(graph: &ClassGraph, target: &AccessTarget) -> IndexSet<MemberId> {
    let mut visited = HashSet::new();
    let mut interfaces = VecDeque::new();

    let mut current = Some(target.owner);
    while let Some(class) = current {
        if !visited.insert(class) {
            break;
        }
        let found = declared_matches(graph, class, target);
        if !found.is_empty() {
            return found;
        }
        interfaces.extend(graph.interfaces(class));
        current = graph.superclass(class);
    }

    let mut result = IndexSet::new();
    while let Some(iface) = interfaces.pop_front() {
        if !visited.insert(iface) {
            continue;
        }
        let found = declared_matches(graph, iface, target);
        if found.is_empty() {
            interfaces.extend(graph.interfaces(iface));
        } else {
            result.extend(found);
        }
    }
    result
}
