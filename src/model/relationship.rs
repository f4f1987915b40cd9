//! Edges: raw per-technology relations and their attributed unified form.

use serde::{Deserialize, Serialize};

/// A directed relation as emitted by one technology's pipeline run.
/// Endpoints reference node ids of the same raw graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
    pub relation: String,
}

impl RawEdge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: relation.into(),
        }
    }
}

/// An edge of the unified graph, attributed to the technology that reported it.
///
/// Edges are never merged across technologies: the same triple seen from
/// two technologies stays two edges with distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnifiedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relation: String,
    pub tech: String,
}
