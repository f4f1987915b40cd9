//! Tabular filtering of one technology's dashboard: entity collections and
//! the patent timeline.

use serde_json::{Map, Value};
use tracing::debug;

use super::config::DashboardFilters;
use super::timeline::{select, TimelinePoint};
use crate::model::RawTechDocument;
use crate::normalize::shape::integral;
use crate::normalize::PATENT_TIMELINE_PATH;

const ENTITIES: &str = "entities";

/// Apply `filters` to the dashboard view of `doc`, returning a filtered copy.
///
/// - `entities.patents`, `entities.papers` and `entities.companies` are
///   always present in the output; disabled, absent or malformed
///   collections come back as `[]`.
/// - `patent_timeline`, when present, is reduced by year window and density.
/// - Every other field passes through untouched.
///
/// A dashboard view that is not an object is returned as-is.
pub fn apply_filters(doc: &RawTechDocument, filters: &DashboardFilters) -> Value {
    let dashboard = doc.dashboard();
    let Value::Object(fields) = dashboard else {
        return dashboard.clone();
    };
    let needle = filters.needle();
    let entities_in = fields.get(ENTITIES);
    let collection = |name: &str| {
        entities_in
            .and_then(|e| e.get(name))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    };

    let patents = keep_if(filters.entities.patents, collection("patents"), |p| {
        patent_in_range(p, filters) && text_matches(needle.as_deref(), p, &["title", "snippet"], true)
    });
    let papers = keep_if(filters.entities.papers, collection("papers"), |p| {
        text_matches(needle.as_deref(), p, &["title", "snippet"], false)
    });
    let companies = keep_if(filters.entities.companies, collection("companies"), |c| {
        text_matches(needle.as_deref(), c, &["name", "description"], false)
    });
    debug!(
        patents = patents.len(),
        papers = papers.len(),
        companies = companies.len(),
        "filtered entities"
    );

    let mut entities_out: Map<String, Value> = entities_in
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    entities_out.insert("patents".into(), Value::Array(patents));
    entities_out.insert("papers".into(), Value::Array(papers));
    entities_out.insert("companies".into(), Value::Array(companies));

    let mut out = fields.clone();
    out.insert(ENTITIES.into(), Value::Object(entities_out));
    if let Some(timeline) = fields.get(PATENT_TIMELINE_PATH) {
        out.insert(PATENT_TIMELINE_PATH.into(), Value::Array(filter_timeline(timeline, filters)));
    }
    Value::Object(out)
}

/// Smallest and largest integral patent year in the dashboard view. Used
/// to seed the year window when a document arrives.
pub fn patent_year_bounds(doc: &RawTechDocument) -> Option<(i64, i64)> {
    let patents = doc.field("entities.patents")?.as_array()?;
    patents
        .iter()
        .filter_map(|p| p.get("year").and_then(integral))
        .fold(None, |bounds, year| match bounds {
            None => Some((year, year)),
            Some((lo, hi)) => Some((lo.min(year), hi.max(year))),
        })
}

impl DashboardFilters {
    /// These filters with the year window narrowed to the document's
    /// patent years, when it has any.
    pub fn seeded_from(mut self, doc: &RawTechDocument) -> Self {
        if let Some(bounds) = patent_year_bounds(doc) {
            self.patent_year_range = bounds;
        }
        self
    }
}

fn keep_if(enabled: bool, items: &[Value], pred: impl Fn(&Value) -> bool) -> Vec<Value> {
    if !enabled {
        return Vec::new();
    }
    items
        .iter()
        .filter(|item| item.is_object() && pred(item))
        .cloned()
        .collect()
}

/// Entries without a numeric year are never excluded by the window.
fn patent_in_range(patent: &Value, filters: &DashboardFilters) -> bool {
    patent
        .get("year")
        .and_then(Value::as_f64)
        .is_none_or(|year| filters.contains_year(year))
}

/// Whether `needle` occurs in `fields` of `item`. With `joined`, the fields
/// are searched as one space-joined string; otherwise any single field may
/// match. No needle always matches.
fn text_matches(needle: Option<&str>, item: &Value, fields: &[&str], joined: bool) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    let texts = fields
        .iter()
        .map(|f| item.get(*f).and_then(Value::as_str).unwrap_or_default().to_lowercase());
    if joined {
        texts.collect::<Vec<_>>().join(" ").contains(needle)
    } else {
        texts.into_iter().any(|t| t.contains(needle))
    }
}

/// Reduce a raw timeline, keeping the surviving raw entries intact.
fn filter_timeline(timeline: &Value, filters: &DashboardFilters) -> Vec<Value> {
    let Some(entries) = timeline.as_array() else {
        return Vec::new();
    };
    let (raw, points): (Vec<&Value>, Vec<TimelinePoint>) = entries
        .iter()
        .filter_map(|e| TimelinePoint::from_value(e).map(|p| (e, p)))
        .unzip();
    select(&points, filters.patent_year_range, &filters.patent_density)
        .into_iter()
        .map(|i| raw[i].clone())
        .collect()
}
