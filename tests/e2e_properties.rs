// Property-based tests for normalization, reconciliation and projection.
// CI: 128 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::{json, Value};
use techpulse::normalize::{normalize_event_counts, normalize_series, BASE_YEAR};
use techpulse::TimeKey;
use techpulse::{
    magnitude, project, reconcile, KgFilters, RawEdge, RawKg, RawNode, RawTechDocument,
    TechDocuments, TechGraph,
};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_128() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// A metric-array element: mostly timed points, some bare numbers, some junk.
fn arb_point() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => (2015i64..2030, 0u32..100).prop_map(|(year, v)| json!({"year": year, "value": v})),
        1 => (2015i64..2030, 0u32..100).prop_map(|(year, v)| json!({"year": year as f64 + 0.5, "value": v})),
        2 => (0u32..100).prop_map(|v| json!(v)),
        1 => (2015i64..2030).prop_map(|year| json!({"year": year})),
        1 => "[a-z]{0,5}".prop_map(Value::from),
        1 => Just(Value::Null),
    ]
}

/// A document whose `m` field is an array of points, or sometimes not an array.
fn arb_document() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => prop::collection::vec(arb_point(), 0..8).prop_map(|pts| json!({"m": pts})),
        1 => Just(json!({"m": {"year": 2020}})),
        1 => Just(json!({})),
    ]
}

fn arb_docs() -> impl Strategy<Value = TechDocuments> {
    prop::collection::vec(arb_document(), 1..5).prop_map(|docs| {
        docs.into_iter()
            .enumerate()
            .map(|(i, doc)| (format!("tech-{i}"), RawTechDocument::new(doc)))
            .collect()
    })
}

fn arb_node_type() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["technology", "patent", "paper", "company", "country", "other"])
        .prop_map(str::to_owned)
}

fn arb_relation() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["HAS_PATENT", "HAS_PAPER", "INVOLVES_COMPANY", "FILED_IN", "LOCATED_IN"])
        .prop_map(str::to_owned)
}

/// A raw graph over a small shared id space, so graphs overlap.
fn arb_kg() -> impl Strategy<Value = RawKg> {
    let node = (0u8..8, arb_node_type()).prop_map(|(i, t)| RawNode::new(format!("n{i}"), t));
    let edge = (0u8..9, 0u8..9, arb_relation())
        .prop_map(|(s, t, r)| RawEdge::new(format!("n{s}"), format!("n{t}"), r));
    (
        prop::collection::vec(node, 0..8),
        prop::collection::vec(edge, 0..8),
    )
        .prop_map(|(nodes, edges)| RawKg { nodes, edges })
}

fn arb_sources() -> impl Strategy<Value = Vec<TechGraph>> {
    prop::collection::vec(arb_kg(), 0..5).prop_map(|graphs| {
        graphs
            .into_iter()
            .enumerate()
            .map(|(i, kg)| TechGraph::new(format!("t{i}"), kg))
            .collect()
    })
}

fn arb_kg_filters() -> impl Strategy<Value = KgFilters> {
    (
        prop::collection::btree_map(arb_node_type(), any::<bool>(), 0..6),
        prop::collection::btree_map(arb_relation(), any::<bool>(), 0..5),
        prop::option::of("n[0-9]?"),
    )
        .prop_map(|(node_types, relations, keyword)| KgFilters {
            node_types,
            relations,
            min_degree: 1,
            keyword,
        })
}

// ---------------------------------------------------------------------------
// Expected key set, computed independently of the normalizer
// ---------------------------------------------------------------------------

fn expected_keys(docs: &TechDocuments) -> BTreeSet<TimeKey> {
    let mut keys = BTreeSet::new();
    for (_, doc) in docs.iter() {
        let Some(points) = doc.raw().get("m").and_then(Value::as_array) else {
            continue;
        };
        for (i, p) in points.iter().enumerate() {
            if let Some(year) = p.get("year").and_then(Value::as_f64).and_then(TimeKey::new) {
                keys.insert(year);
            } else if p.is_number() {
                keys.insert(TimeKey::from(BASE_YEAR + i as i64));
            }
        }
    }
    keys
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_128())]

    #[test]
    fn rows_cover_distinct_keys_and_every_column(docs in arb_docs()) {
        let rows = normalize_series(&docs, "m");
        let expected = expected_keys(&docs);

        prop_assert_eq!(rows.len(), expected.len());
        let keys: Vec<TimeKey> = rows.iter().map(|r| r.time_key).collect();
        prop_assert_eq!(keys, expected.into_iter().collect::<Vec<_>>());
        for row in &rows {
            prop_assert_eq!(row.cells.len(), docs.len());
            for tech in docs.technologies() {
                prop_assert!(row.has_column(tech));
            }
        }
    }

    #[test]
    fn summed_rows_share_the_key_set(docs in arb_docs()) {
        let overwrite: Vec<TimeKey> = normalize_series(&docs, "m").iter().map(|r| r.time_key).collect();
        let summed: Vec<TimeKey> = normalize_event_counts(&docs, "m").iter().map(|r| r.time_key).collect();
        prop_assert_eq!(overwrite, summed);
    }

    #[test]
    fn reconcile_is_idempotent(sources in arb_sources()) {
        prop_assert_eq!(reconcile(&sources), reconcile(&sources));
    }

    #[test]
    fn reconcile_invariants(sources in arb_sources()) {
        let unified = reconcile(&sources);

        let ids: BTreeSet<&str> = unified.nodes.iter().map(|n| n.id.as_str()).collect();
        prop_assert_eq!(ids.len(), unified.nodes.len());

        for node in &unified.nodes {
            prop_assert_eq!(node.tech_count, node.techs.len());
            let distinct: BTreeSet<&String> = node.techs.iter().collect();
            prop_assert_eq!(distinct.len(), node.techs.len());
        }

        let total_edges: usize = sources.iter().map(|s| s.graph.edges.len()).sum();
        prop_assert_eq!(unified.edges.len(), total_edges);
        let edge_ids: BTreeSet<&str> = unified.edges.iter().map(|e| e.id.as_str()).collect();
        prop_assert_eq!(edge_ids.len(), unified.edges.len());
    }

    #[test]
    fn tech_counts_ignore_source_order(sources in arb_sources()) {
        let forward = reconcile(&sources);
        let mut reversed = sources.clone();
        reversed.reverse();
        let backward = reconcile(&reversed);

        prop_assert_eq!(forward.nodes.len(), backward.nodes.len());
        for node in &forward.nodes {
            let other = backward.node(&node.id);
            prop_assert!(other.is_some());
            prop_assert_eq!(node.tech_count, other.map_or(0, |n| n.tech_count));
        }
    }

    #[test]
    fn projection_never_deletes(sources in arb_sources(), filters in arb_kg_filters()) {
        let unified = reconcile(&sources);
        let projection = project(&unified, &filters);

        prop_assert_eq!(projection.nodes.len(), unified.nodes.len());
        prop_assert_eq!(projection.edges.len(), unified.edges.len());

        for edge in &projection.edges {
            if !edge.hidden {
                prop_assert!(filters.relation_enabled(&edge.relation));
                prop_assert!(projection.is_node_visible(&edge.source));
                prop_assert!(projection.is_node_visible(&edge.target));
            }
        }
        for node in &projection.nodes {
            if !node.hidden {
                prop_assert!(filters.node_type_enabled(&node.node_type));
            }
        }
    }

    #[test]
    fn magnitude_never_panics(s in "\\PC{0,24}") {
        let _ = magnitude::parse(Some(&s));
    }
}
