//! Visibility projection over a knowledge graph.
//!
//! Nothing is removed: every node and edge comes back tagged with
//! `hidden`, so positions a renderer cached by id survive filter toggles.

use std::ops::Deref;

use hashbrown::HashSet;
use serde::Serialize;
use tracing::debug;

use super::config::KgFilters;
use crate::model::{RawEdge, RawKg, RawNode, UnifiedEdge, UnifiedKg, UnifiedNode};

// ============================================================================
// Graph views
// ============================================================================

/// What the projection needs to know about a node.
pub trait GraphNodeView {
    fn id(&self) -> &str;
    fn node_type(&self) -> &str;
}

/// What the projection needs to know about an edge.
pub trait GraphEdgeView {
    fn source(&self) -> &str;
    fn target(&self) -> &str;
    fn relation(&self) -> &str;
}

/// A graph the projection can walk: a single technology's raw graph or
/// the unified one.
pub trait GraphView {
    type Node: GraphNodeView;
    type Edge: GraphEdgeView;

    fn nodes(&self) -> &[Self::Node];
    fn edges(&self) -> &[Self::Edge];
}

impl GraphNodeView for RawNode {
    fn id(&self) -> &str { &self.id }
    fn node_type(&self) -> &str { &self.node_type }
}

impl GraphNodeView for UnifiedNode {
    fn id(&self) -> &str { &self.id }
    fn node_type(&self) -> &str { &self.node_type }
}

impl GraphEdgeView for RawEdge {
    fn source(&self) -> &str { &self.source }
    fn target(&self) -> &str { &self.target }
    fn relation(&self) -> &str { &self.relation }
}

impl GraphEdgeView for UnifiedEdge {
    fn source(&self) -> &str { &self.source }
    fn target(&self) -> &str { &self.target }
    fn relation(&self) -> &str { &self.relation }
}

impl GraphView for RawKg {
    type Node = RawNode;
    type Edge = RawEdge;

    fn nodes(&self) -> &[RawNode] { &self.nodes }
    fn edges(&self) -> &[RawEdge] { &self.edges }
}

impl GraphView for UnifiedKg {
    type Node = UnifiedNode;
    type Edge = UnifiedEdge;

    fn nodes(&self) -> &[UnifiedNode] { &self.nodes }
    fn edges(&self) -> &[UnifiedEdge] { &self.edges }
}

// ============================================================================
// Projection
// ============================================================================

/// An element tagged with its visibility. Serializes as the element's own
/// fields plus `"hidden"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Visible<'a, T> {
    #[serde(flatten)]
    pub item: &'a T,
    pub hidden: bool,
}

impl<T> Deref for Visible<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.item
    }
}

/// The annotated graph. Same elements, same order as the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection<'a, N, E> {
    pub nodes: Vec<Visible<'a, N>>,
    pub edges: Vec<Visible<'a, E>>,
}

impl<'a, N: GraphNodeView, E: GraphEdgeView> Projection<'a, N, E> {
    pub fn visible_nodes(&self) -> impl Iterator<Item = &'a N> + '_ {
        self.nodes.iter().filter(|v| !v.hidden).map(|v| v.item)
    }

    pub fn visible_edges(&self) -> impl Iterator<Item = &'a E> + '_ {
        self.edges.iter().filter(|v| !v.hidden).map(|v| v.item)
    }

    pub fn is_node_visible(&self, id: &str) -> bool {
        self.visible_nodes().any(|n| n.id() == id)
    }
}

/// Annotate `graph` with visibility under `filters`.
///
/// Two passes: node visibility first (type enabled, keyword matched), then
/// each edge is visible only if its relation is enabled and both of its
/// endpoints made it through the first pass.
pub fn project<'a, G: GraphView>(
    graph: &'a G,
    filters: &KgFilters,
) -> Projection<'a, G::Node, G::Edge> {
    let needle = filters.needle();

    let nodes: Vec<Visible<'a, G::Node>> = graph
        .nodes()
        .iter()
        .map(|node| {
            let type_allowed = filters.node_type_enabled(node.node_type());
            let keyword_allowed = needle
                .as_deref()
                .is_none_or(|k| node.id().to_lowercase().contains(k));
            Visible { item: node, hidden: !(type_allowed && keyword_allowed) }
        })
        .collect();

    let visible_ids: HashSet<&str> = nodes
        .iter()
        .filter(|v| !v.hidden)
        .map(|v| v.item.id())
        .collect();

    let edges: Vec<Visible<'a, G::Edge>> = graph
        .edges()
        .iter()
        .map(|edge| {
            let relation_allowed = filters.relation_enabled(edge.relation());
            let ends_visible =
                visible_ids.contains(edge.source()) && visible_ids.contains(edge.target());
            Visible { item: edge, hidden: !(relation_allowed && ends_visible) }
        })
        .collect();

    debug!(
        nodes = nodes.len(),
        visible_nodes = visible_ids.len(),
        edges = edges.len(),
        "projected knowledge graph"
    );
    Projection { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> RawKg {
        RawKg {
            nodes: vec![
                RawNode::new("ai", "technology"),
                RawNode::new("Patent-42", "patent"),
                RawNode::new("India", "country"),
            ],
            edges: vec![
                RawEdge::new("ai", "Patent-42", "HAS_PATENT"),
                RawEdge::new("Patent-42", "India", "HAS_PATENT"),
                RawEdge::new("ai", "Patent-42", "FILED_IN"),
            ],
        }
    }

    #[test]
    fn test_hidden_endpoint_hides_edge() {
        let kg = sample();
        let projection = project(&kg, &KgFilters::default());
        let hidden: Vec<bool> = projection.edges.iter().map(|e| e.hidden).collect();
        // Enabled relation, both visible / country endpoint hidden / relation disabled.
        assert_eq!(hidden, vec![false, true, true]);
        assert_eq!(projection.nodes.len(), 3);
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let kg = sample();
        let projection = project(&kg, &KgFilters::default().with_keyword("PATENT"));
        let visible: Vec<&str> = projection.visible_nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(visible, vec!["Patent-42"]);
        assert_eq!(projection.visible_edges().count(), 0);
    }

    #[test]
    fn test_serializes_with_hidden_flag() {
        let kg = sample();
        let projection = project(&kg, &KgFilters::default());
        assert_eq!(
            serde_json::to_value(&projection.nodes[2]).unwrap(),
            json!({"id": "India", "type": "country", "hidden": true})
        );
    }
}
