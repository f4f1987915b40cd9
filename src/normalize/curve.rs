//! Time-aligned curve tables: one row per time key, one column per technology.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use serde_json::Value;
use tracing::{debug, trace};

use super::shape::{classify_point_as, PointShape};
use super::AccumulateRule;
use crate::model::{TechDocuments, TimeKey, TimeSeriesRow};

/// Normalize `field_path` across every technology, overwriting on repeated
/// time keys (the last entry for a key wins). Used for curves whose points
/// are levels, such as adoption trends.
pub fn normalize_series(docs: &TechDocuments, field_path: &str) -> Vec<TimeSeriesRow> {
    normalize_series_with(docs, field_path, AccumulateRule::Overwrite)
}

/// Normalize `field_path` across every technology, summing entries that
/// share a time key. Used for event counts such as patent filings, where
/// each entry is one batch of events.
pub fn normalize_event_counts(docs: &TechDocuments, field_path: &str) -> Vec<TimeSeriesRow> {
    normalize_series_with(docs, field_path, AccumulateRule::Sum)
}

/// Normalize `field_path` with an explicit accumulation rule.
///
/// Technologies whose field is missing or not an array still get a column;
/// every cell of it is `None`.
pub fn normalize_series_with(
    docs: &TechDocuments,
    field_path: &str,
    rule: AccumulateRule,
) -> Vec<TimeSeriesRow> {
    let mut keys = BTreeSet::new();
    let per_tech: Vec<(&str, HashMap<TimeKey, f64>)> = docs
        .iter()
        .map(|(tech, doc)| {
            let observations = match doc.field(field_path).and_then(Value::as_array) {
                Some(points) => accumulate(tech, points, rule),
                None => {
                    trace!(tech, field_path, "field absent or not an array");
                    HashMap::new()
                }
            };
            keys.extend(observations.keys().copied());
            (tech, observations)
        })
        .collect();

    let rows: Vec<TimeSeriesRow> = keys
        .into_iter()
        .map(|time_key| TimeSeriesRow {
            time_key,
            cells: per_tech
                .iter()
                .map(|(tech, obs)| ((*tech).to_owned(), obs.get(&time_key).copied()))
                .collect(),
        })
        .collect();

    debug!(field_path, ?rule, techs = per_tech.len(), rows = rows.len(), "normalized series");
    rows
}

fn accumulate(tech: &str, points: &[Value], rule: AccumulateRule) -> HashMap<TimeKey, f64> {
    let mut observations = HashMap::new();
    for (position, point) in points.iter().enumerate() {
        let (key, magnitude) = match classify_point_as(point, position, rule) {
            PointShape::Timed { key, magnitude } => (key, magnitude.unwrap_or(rule.missing_magnitude())),
            PointShape::Inferred { key, magnitude } => (key, magnitude),
            PointShape::Unrecognized => {
                trace!(tech, position, "skipping unrecognized point");
                continue;
            }
        };
        match rule {
            AccumulateRule::Overwrite => {
                observations.insert(key, magnitude);
            }
            AccumulateRule::Sum => {
                *observations.entry(key).or_insert(0.0) += magnitude;
            }
        }
    }
    observations
}
