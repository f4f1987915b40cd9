//! Chart-ready outputs of the metric normalizers.
//!
//! Rows serialize flat (`{"year": 2020, "ai": 5, "quantum": null}`) because
//! that is the shape charting consumers key their series on.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::ser::{self, Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// One technology's cell in a row. `None` means "no observation", which
/// is distinct from an observed zero.
pub type Cell = (String, Option<f64>);

fn cell_value(cells: &[Cell], tech: &str) -> Option<f64> {
    cells.iter().find(|(t, _)| t == tech).and_then(|(_, v)| *v)
}

// ============================================================================
// TimeKey
// ============================================================================

/// A finite time key, ordered numerically. Usually a whole year, but
/// fractional keys (`2020.5`) are kept as reported.
#[derive(Debug, Clone, Copy)]
pub struct TimeKey(f64);

impl TimeKey {
    /// `None` for NaN and infinities. `-0.0` is stored as `0.0`.
    pub fn new(key: f64) -> Option<Self> {
        key.is_finite().then_some(Self(key + 0.0))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// The key as a whole year, if it has no fractional part.
    pub fn year(self) -> Option<i64> {
        (self.0.fract() == 0.0 && self.0.abs() < i64::MAX as f64).then_some(self.0 as i64)
    }
}

impl From<i64> for TimeKey {
    fn from(year: i64) -> Self {
        Self(year as f64)
    }
}

impl PartialEq for TimeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeKey {}

impl PartialOrd for TimeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for TimeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year() {
            Some(year) => write!(f, "{year}"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Whole years serialize as integers, anything else as a float.
impl Serialize for TimeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.year() {
            Some(year) => serializer.serialize_i64(year),
            None => serializer.serialize_f64(self.0),
        }
    }
}

// ============================================================================
// TimeSeriesRow
// ============================================================================

/// Column holding the time key in a serialized row.
pub const TIME_COLUMN: &str = "year";

/// Column holding the country label in a serialized country row.
pub const COUNTRY_COLUMN: &str = "country";

/// Write `cells` after the row's label entry. A technology named like the
/// label column is an error: it would shadow the label in the output map.
fn serialize_row<S: Serializer, K: Serialize>(
    serializer: S,
    label_column: &str,
    label: &K,
    cells: &[Cell],
) -> Result<S::Ok, S::Error> {
    if cells.iter().any(|(tech, _)| tech == label_column) {
        return Err(ser::Error::custom(format!(
            "technology column `{label_column}` collides with the row label"
        )));
    }
    let mut map = serializer.serialize_map(Some(cells.len() + 1))?;
    map.serialize_entry(label_column, label)?;
    for (tech, value) in cells {
        map.serialize_entry(tech, value)?;
    }
    map.end()
}

/// One time key across every technology of a normalization call.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRow {
    pub time_key: TimeKey,
    /// One cell per technology, in mapping order.
    pub cells: Vec<Cell>,
}

impl TimeSeriesRow {
    /// The observed value, or `None` for "no data" and unknown technologies.
    pub fn value(&self, tech: &str) -> Option<f64> {
        cell_value(&self.cells, tech)
    }

    pub fn has_column(&self, tech: &str) -> bool {
        self.cells.iter().any(|(t, _)| t == tech)
    }
}

impl Serialize for TimeSeriesRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_row(serializer, TIME_COLUMN, &self.time_key, &self.cells)
    }
}

// ============================================================================
// CountryRow
// ============================================================================

/// One canonical country across every technology of an investment call.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRow {
    pub country: String,
    pub cells: Vec<Cell>,
}

impl CountryRow {
    pub fn value(&self, tech: &str) -> Option<f64> {
        cell_value(&self.cells, tech)
    }
}

impl Serialize for CountryRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_row(serializer, COUNTRY_COLUMN, &self.country, &self.cells)
    }
}

// ============================================================================
// Market magnitudes
// ============================================================================

/// Default provenance label when a report names no source.
pub const DEFAULT_MARKET_SOURCE: &str = "Market Report";

/// A market size in billions of currency units, with provenance.
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct MagnitudeValue {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub source: String,
}

/// Every parseable market size reported for one technology.
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct TechMarketSeries {
    pub tech: String,
    pub points: Vec<MagnitudeValue>,
}

impl TechMarketSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
