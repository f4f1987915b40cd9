//! # Graph Reconciler
//!
//! Merges per-technology entity graphs into one graph:
//!
//! ```text
//! [(ai, RawKg), (quantum, RawKg), ...]
//!     └─ fold(GraphAccumulator::absorb) ─→ UnifiedKg
//!           nodes: deduplicated by id, techs in first-seen order
//!           edges: never merged, each attributed to its technology
//! ```
//!
//! The accumulator is an explicit value threaded through the fold. There
//! is no shared state, so independent reconciliations can run concurrently.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::model::{RawKg, RawNode, TechDocuments, UnifiedEdge, UnifiedKg, UnifiedNode};

/// One technology's contribution to a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechGraph {
    pub technology: String,
    pub graph: RawKg,
}

impl TechGraph {
    pub fn new(technology: impl Into<String>, graph: RawKg) -> Self {
        Self { technology: technology.into(), graph }
    }
}

/// Reconcile `sources` in order.
///
/// Deterministic: nodes come out in first-seen order, edges in
/// source-then-position order. Running it twice on the same input yields
/// identical output.
pub fn reconcile(sources: &[TechGraph]) -> UnifiedKg {
    let unified = sources
        .iter()
        .fold(GraphAccumulator::new(), |acc, source| {
            acc.absorb(&source.technology, &source.graph)
        })
        .finish();
    debug!(
        sources = sources.len(),
        nodes = unified.nodes.len(),
        edges = unified.edges.len(),
        "reconciled knowledge graph"
    );
    unified
}

/// Reconcile the entity graph of every document, in mapping order.
pub fn reconcile_documents(docs: &TechDocuments) -> UnifiedKg {
    let sources: Vec<TechGraph> = docs
        .iter()
        .map(|(tech, doc)| TechGraph::new(tech, doc.knowledge_graph()))
        .collect();
    reconcile(&sources)
}

// ============================================================================
// GraphAccumulator
// ============================================================================

/// Keyed arena of unified nodes plus the ordered edge list.
#[derive(Debug, Clone, Default)]
pub struct GraphAccumulator {
    /// node id → position in `nodes`
    index: HashMap<String, usize>,
    nodes: Vec<UnifiedNode>,
    edges: Vec<UnifiedEdge>,
    issued_edge_ids: HashSet<String>,
}

impl GraphAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one technology's graph.
    pub fn absorb(mut self, tech: &str, graph: &RawKg) -> Self {
        for node in &graph.nodes {
            self.merge_node(tech, node);
        }
        for (position, edge) in graph.edges.iter().enumerate() {
            let id = self.issue_edge_id(format!("{tech}-{position}-{}-{}", edge.source, edge.target));
            self.edges.push(UnifiedEdge {
                id,
                source: edge.source.clone(),
                target: edge.target.clone(),
                relation: edge.relation.clone(),
                tech: tech.to_owned(),
            });
        }
        self
    }

    pub fn finish(self) -> UnifiedKg {
        UnifiedKg { nodes: self.nodes, edges: self.edges }
    }

    fn merge_node(&mut self, tech: &str, raw: &RawNode) {
        let url = raw.url.as_deref().filter(|u| is_absolute_url(u));
        match self.index.get(&raw.id) {
            Some(&pos) => {
                let existing = &mut self.nodes[pos];
                existing.add_tech(tech);
                if existing.url.is_none() {
                    existing.url = url.map(str::to_owned);
                }
            }
            None => {
                let mut node = UnifiedNode::first_seen(raw, tech);
                node.url = url.map(str::to_owned);
                self.index.insert(raw.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
        if url.is_none() && raw.url.is_some() {
            trace!(tech, node = %raw.id, "ignoring non-absolute url");
        }
    }

    /// `candidate` unless already issued, else the first free `candidate#n`.
    fn issue_edge_id(&mut self, candidate: String) -> String {
        let mut id = candidate.clone();
        let mut n = 0usize;
        while self.issued_edge_ids.contains(&id) {
            n += 1;
            id = format!("{candidate}#{n}");
        }
        self.issued_edge_ids.insert(id.clone());
        id
    }
}

/// Scheme-prefixed absolute web URL.
fn is_absolute_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
