//! Raw per-technology documents and the ordered document accumulator.
//!
//! A `RawTechDocument` is whatever the analysis pipeline emitted for one
//! technology. Nothing about its shape is trusted: every accessor here
//! returns `Option` and treats "wrong shape" exactly like "missing".

use hashbrown::HashMap;
use serde::Serialize;
use serde_json::Value;

use super::graph::RawKg;
use crate::Result;

/// Envelope keys checked, in order, when locating the dashboard view.
const ENVELOPE_KEYS: &[&str] = &["dashboard", "data"];

/// Candidate locations of the entity graph across pipeline versions.
const KNOWLEDGE_GRAPH_LOCATIONS: &[&[&str]] = &[
    &["knowledge_graph"],
    &["dashboard", "knowledge_graph"],
    &["data", "knowledge_graph"],
    &["knowledgeGraph"],
];

// ============================================================================
// Path resolution
// ============================================================================

/// Resolve a dotted path (`"a.b.c"`) or a single key against `root`.
///
/// Descends one object key at a time and short-circuits to `None` on the
/// first missing key or non-object intermediate.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    resolve_segments(root, path.split('.'))
}

/// Resolve an already-split path against `root`.
pub fn resolve_segments<'a, 'k>(
    root: &'a Value,
    segments: impl IntoIterator<Item = &'k str>,
) -> Option<&'a Value> {
    segments
        .into_iter()
        .try_fold(root, |node, key| node.as_object()?.get(key))
}

/// Walk an ordered fallback chain of locations; the first one holding an
/// array wins. Locations holding anything else are passed over.
pub fn first_array<'a>(root: &'a Value, chain: &[&[&str]]) -> Option<&'a Vec<Value>> {
    chain
        .iter()
        .find_map(|location| resolve_segments(root, location.iter().copied())?.as_array())
}

// ============================================================================
// RawTechDocument
// ============================================================================

/// One technology's analysis document, opaque and best-effort readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawTechDocument {
    root: Value,
}

impl RawTechDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse a document from its JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// The document exactly as received.
    pub fn raw(&self) -> &Value {
        &self.root
    }

    /// The dashboard view: the first object found under `dashboard`, then
    /// `data`, falling back to the document itself.
    pub fn dashboard(&self) -> &Value {
        ENVELOPE_KEYS
            .iter()
            .filter_map(|key| self.root.get(*key))
            .find(|v| v.is_object())
            .unwrap_or(&self.root)
    }

    /// Resolve a dotted path against the dashboard view.
    pub fn field(&self, path: &str) -> Option<&Value> {
        resolve_path(self.dashboard(), path)
    }

    /// Extract this technology's entity graph, wherever this pipeline
    /// version put it. Absent or malformed graphs come back empty.
    pub fn knowledge_graph(&self) -> RawKg {
        KNOWLEDGE_GRAPH_LOCATIONS
            .iter()
            .find_map(|location| {
                resolve_segments(&self.root, location.iter().copied()).filter(|v| v.is_object())
            })
            .map(RawKg::from_value)
            .unwrap_or_default()
    }
}

impl From<Value> for RawTechDocument {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

// ============================================================================
// TechDocuments (the accumulator)
// ============================================================================

/// Ordered technology → document mapping.
///
/// Keys are unique and keep insertion order. Re-inserting a technology
/// replaces its document in place, so column order stays stable while
/// late fetches land.
#[derive(Debug, Clone, Default)]
pub struct TechDocuments {
    entries: Vec<(String, RawTechDocument)>,
    index: HashMap<String, usize>,
}

impl TechDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns the previous document, if any.
    pub fn insert(
        &mut self,
        tech: impl Into<String>,
        doc: RawTechDocument,
    ) -> Option<RawTechDocument> {
        let tech = tech.into();
        match self.index.get(&tech) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, doc)),
            None => {
                self.index.insert(tech.clone(), self.entries.len());
                self.entries.push((tech, doc));
                None
            }
        }
    }

    pub fn get(&self, tech: &str) -> Option<&RawTechDocument> {
        self.index.get(tech).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, tech: &str) -> bool {
        self.index.contains_key(tech)
    }

    /// Technologies in insertion order.
    pub fn technologies(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(tech, _)| tech.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawTechDocument)> + '_ {
        self.entries.iter().map(|(tech, doc)| (tech.as_str(), doc))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, RawTechDocument)> for TechDocuments {
    fn from_iter<I: IntoIterator<Item = (K, RawTechDocument)>>(iter: I) -> Self {
        let mut docs = Self::new();
        for (tech, doc) in iter {
            docs.insert(tech, doc);
        }
        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_dotted_path() {
        let v = json!({"a": {"b": {"c": 3}}});
        assert_eq!(resolve_path(&v, "a.b.c"), Some(&json!(3)));
        assert_eq!(resolve_path(&v, "a.x.c"), None);
        assert_eq!(resolve_path(&v, "a.b.c.d"), None);
    }

    #[test]
    fn test_first_array_skips_non_arrays() {
        let v = json!({
            "market_reports": {"not": "an array"},
            "entities": {"market_reports": [1, 2]}
        });
        let chain: &[&[&str]] = &[
            &["market_reports"],
            &["dashboard", "market_reports"],
            &["entities", "market_reports"],
        ];
        assert_eq!(first_array(&v, chain).map(Vec::len), Some(2));
    }

    #[test]
    fn test_dashboard_envelope() {
        let doc = RawTechDocument::new(json!({"data": {"trend_curve": [1]}}));
        assert!(doc.field("trend_curve").is_some());

        // A non-object `data` is not an envelope.
        let doc = RawTechDocument::new(json!({"data": [1, 2], "trend_curve": [3]}));
        assert_eq!(doc.field("trend_curve"), Some(&json!([3])));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut docs = TechDocuments::new();
        docs.insert("a", RawTechDocument::new(json!(1)));
        docs.insert("b", RawTechDocument::new(json!(2)));
        let prev = docs.insert("a", RawTechDocument::new(json!(3)));

        assert_eq!(prev, Some(RawTechDocument::new(json!(1))));
        assert_eq!(docs.technologies().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(docs.get("a").map(|d| d.raw()), Some(&json!(3)));
    }

    #[test]
    fn test_knowledge_graph_locations() {
        let doc = RawTechDocument::new(json!({
            "dashboard": {
                "knowledge_graph": {
                    "nodes": [{"id": "ai", "type": "technology"}],
                    "edges": []
                }
            }
        }));
        assert_eq!(doc.knowledge_graph().nodes.len(), 1);
        assert!(RawTechDocument::default().knowledge_graph().nodes.is_empty());
    }

    #[test]
    fn test_knowledge_graph_inside_data_envelope() {
        let doc = RawTechDocument::new(json!({
            "data": {
                "trend_curve": [1, 2],
                "knowledge_graph": {
                    "nodes": [{"id": "ai", "type": "technology"}, {"id": "p1", "type": "patent"}],
                    "edges": [{"source": "ai", "target": "p1", "relation": "HAS_PATENT"}]
                }
            }
        }));
        assert!(doc.field("trend_curve").is_some());
        let kg = doc.knowledge_graph();
        assert_eq!(kg.nodes.len(), 2);
        assert_eq!(kg.edges.len(), 1);
    }
}
