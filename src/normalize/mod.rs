//! # Metric Normalizer
//!
//! Turns a technology → document mapping into chart-ready tables, tolerating
//! every metric shape the pipeline has emitted.
//!
//! ```text
//! TechDocuments ──┬─ normalize_series        (levels, overwrite)  → Vec<TimeSeriesRow>
//!                 ├─ normalize_event_counts  (events, sum)        → Vec<TimeSeriesRow>
//!                 ├─ normalize_investment    (country bars)       → Vec<CountryRow>
//!                 └─ normalize_market        (parsed magnitudes)  → Vec<TechMarketSeries>
//! ```
//!
//! ## Accumulation per series
//!
//! | Series | Path | Rule |
//! |--------|------|------|
//! | Adoption trend | `trend_curve` | `Overwrite`: a point is a level; a repeat is a restatement |
//! | Patent activity | `patent_timeline` | `Sum`: a point is a batch of filings; repeats add up |

pub mod shape;
pub mod curve;
pub mod investment;
pub mod market;

use serde::{Deserialize, Serialize};

use crate::model::{CountryRow, TechDocuments, TechMarketSeries, TimeSeriesRow};

pub use shape::{classify_point, classify_point_as, PointShape, BASE_YEAR};
pub use curve::{normalize_series, normalize_event_counts, normalize_series_with};
pub use investment::{normalize_investment, canonical_country, USA_LABEL};
pub use market::{normalize_market, MARKET_REPORT_LOCATIONS};

/// Path of the adoption-trend curve.
pub const TREND_PATH: &str = "trend_curve";

/// Path of the patent filing timeline.
pub const PATENT_TIMELINE_PATH: &str = "patent_timeline";

// ============================================================================
// Accumulation rule
// ============================================================================

/// How repeated time keys within one technology combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccumulateRule {
    /// Last entry wins. A timed point without a magnitude counts as 0.
    Overwrite,
    /// Entries add up. A timed point without a magnitude counts as 1 event.
    Sum,
}

impl AccumulateRule {
    /// Value of a timed point that carries no numeric magnitude.
    pub fn missing_magnitude(self) -> f64 {
        match self {
            AccumulateRule::Overwrite => 0.0,
            AccumulateRule::Sum => 1.0,
        }
    }

    /// Magnitude fields of a timed point, first numeric wins. Levels read
    /// `value` first; event batches read `count` first.
    pub fn magnitude_fields(self) -> &'static [&'static str] {
        match self {
            AccumulateRule::Overwrite => &["value", "count"],
            AccumulateRule::Sum => &["count", "value"],
        }
    }
}

// ============================================================================
// Metric selection
// ============================================================================

/// The comparison views a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Trend,
    Market,
    Patents,
    Investment,
}

/// Output of [`Metric::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricTable {
    Series(Vec<TimeSeriesRow>),
    Countries(Vec<CountryRow>),
    Market(Vec<TechMarketSeries>),
}

impl Metric {
    pub fn normalize(self, docs: &TechDocuments) -> MetricTable {
        match self {
            Metric::Trend => MetricTable::Series(normalize_series(docs, TREND_PATH)),
            Metric::Patents => MetricTable::Series(normalize_event_counts(docs, PATENT_TIMELINE_PATH)),
            Metric::Investment => MetricTable::Countries(normalize_investment(docs)),
            Metric::Market => MetricTable::Market(normalize_market(docs)),
        }
    }
}

impl MetricTable {
    /// Nothing to chart. A market table whose series are all empty counts
    /// as empty even though it has one entry per technology.
    pub fn is_empty(&self) -> bool {
        match self {
            MetricTable::Series(rows) => rows.is_empty(),
            MetricTable::Countries(rows) => rows.is_empty(),
            MetricTable::Market(series) => series.iter().all(TechMarketSeries::is_empty),
        }
    }
}
