//! Graph containers: one technology's raw graph and the unified graph.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use super::{RawEdge, RawNode, UnifiedEdge, UnifiedNode};

/// One technology's entity graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawKg {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

impl RawKg {
    /// Tolerant extraction: non-array `nodes`/`edges` read as empty, and
    /// individual elements that don't deserialize are skipped.
    pub fn from_value(value: &Value) -> Self {
        Self {
            nodes: collect_lenient(value.get("nodes"), "node"),
            edges: collect_lenient(value.get("edges"), "edge"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

fn collect_lenient<T>(items: Option<&Value>, what: &str) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
{
    let Some(items) = items.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match T::deserialize(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                trace!(position = i, %err, "skipping malformed {what}");
                None
            }
        })
        .collect()
}

/// The reconciled graph spanning every contributing technology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnifiedKg {
    /// First-seen order.
    pub nodes: Vec<UnifiedNode>,
    /// Source-then-position order.
    pub edges: Vec<UnifiedEdge>,
}

impl UnifiedKg {
    pub fn node(&self, id: &str) -> Option<&UnifiedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes contributed by more than one technology.
    pub fn shared_nodes(&self) -> impl Iterator<Item = &UnifiedNode> + '_ {
        self.nodes.iter().filter(|n| n.is_shared())
    }

    /// Every contributing technology in first-seen order. Renderers key
    /// legend entries and colour assignment off this order.
    pub fn technologies(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let from_nodes = self.nodes.iter().flat_map(|n| n.techs.iter());
        let from_edges = self.edges.iter().map(|e| &e.tech);
        for tech in from_nodes.chain(from_edges) {
            if !seen.contains(&tech.as_str()) {
                seen.push(tech);
            }
        }
        seen
    }
}
