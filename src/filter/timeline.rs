//! Patent timeline reduction: year window, minimum density, top-N.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::config::DensityFilter;
use crate::normalize::shape::integral;

/// One year of filing activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub year: i64,
    pub count: f64,
}

impl TimelinePoint {
    pub fn new(year: i64, count: f64) -> Self {
        Self { year, count }
    }

    /// Tolerant read of one timeline entry. No integral `year` means no
    /// point; a missing count reads as 0.
    pub fn from_value(entry: &Value) -> Option<Self> {
        let year = entry.get("year").and_then(integral)?;
        let count = entry.get("count").and_then(Value::as_f64).unwrap_or(0.0);
        Some(Self { year, count })
    }
}

/// Every readable point of a raw timeline; non-arrays read as empty.
pub fn timeline_points(timeline: &Value) -> Vec<TimelinePoint> {
    timeline
        .as_array()
        .map(|entries| entries.iter().filter_map(TimelinePoint::from_value).collect())
        .unwrap_or_default()
}

/// Reduce `points` to those inside `year_range` (inclusive), then apply
/// the density rules. Top-N selection is re-sorted chronologically.
pub fn reduce_timeline(
    points: &[TimelinePoint],
    year_range: (i64, i64),
    density: &DensityFilter,
) -> Vec<TimelinePoint> {
    select(points, year_range, density)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Indices into `points` that survive the reduction, in output order.
pub(crate) fn select(
    points: &[TimelinePoint],
    (min_year, max_year): (i64, i64),
    density: &DensityFilter,
) -> Vec<usize> {
    let mut kept: Vec<usize> = (0..points.len())
        .filter(|&i| (min_year..=max_year).contains(&points[i].year))
        .collect();

    if density.min_count > 1.0 {
        kept.retain(|&i| points[i].count >= density.min_count);
    }

    if let Some(top_n) = density.top_n.filter(|&n| n > 0) {
        // Stable: equal counts keep their relative order.
        kept.sort_by(|&a, &b| points[b].count.total_cmp(&points[a].count));
        kept.truncate(top_n);
        kept.sort_by_key(|&i| points[i].year);
    }
    kept
}
