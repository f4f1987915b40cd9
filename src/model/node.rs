//! Nodes: raw per-technology entities and their unified, deduplicated form.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node type that marks a technology hub (layout level 0).
pub const TECHNOLOGY_TYPE: &str = "technology";

/// Technologies contributing a node. Most nodes come from one or two.
pub type TechList = SmallVec<[String; 4]>;

/// A node as emitted by one technology's pipeline run.
///
/// Identity is `id`, unique only within that technology's graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RawNode {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A node of the unified graph, carrying technology provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Contributing technologies, first-seen order, no duplicates.
    pub techs: TechList,
    /// Always `techs.len()`.
    pub tech_count: usize,
    /// 0 for technology hubs, 1 for everything else. Consumed by layout.
    pub level: u8,
}

impl UnifiedNode {
    /// Create from the first occurrence of `raw`, contributed by `tech`.
    /// The url is not adopted here; the reconciler validates it.
    pub fn first_seen(raw: &RawNode, tech: &str) -> Self {
        let mut techs = TechList::new();
        techs.push(tech.to_owned());
        Self {
            id: raw.id.clone(),
            label: raw.id.clone(),
            node_type: raw.node_type.clone(),
            url: None,
            techs,
            tech_count: 1,
            level: level_of(&raw.node_type),
        }
    }

    /// Record `tech` as a contributor. Idempotent; returns whether it was new.
    pub fn add_tech(&mut self, tech: &str) -> bool {
        if self.has_tech(tech) {
            return false;
        }
        self.techs.push(tech.to_owned());
        self.tech_count = self.techs.len();
        true
    }

    pub fn has_tech(&self, tech: &str) -> bool {
        self.techs.iter().any(|t| t == tech)
    }

    /// Contributed by more than one technology.
    pub fn is_shared(&self) -> bool {
        self.tech_count > 1
    }
}

fn level_of(node_type: &str) -> u8 {
    if node_type == TECHNOLOGY_TYPE { 0 } else { 1 }
}
