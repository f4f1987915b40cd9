//! Filter presets: the user-selected predicate configuration.
//!
//! Both preset types are plain serde data with defaults matching the
//! dashboard's initial state, so a stored preset only needs the fields
//! that differ.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// First year of the default patent window.
pub const DEFAULT_FIRST_YEAR: i64 = 2010;

// ============================================================================
// Dashboard (tabular) filters
// ============================================================================

/// Predicates over a single technology's entity collections and timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardFilters {
    /// Inclusive `[min, max]` year window.
    pub patent_year_range: (i64, i64),
    /// Case-insensitive substring required in an entity's text fields.
    /// Stored presets call this `country`: it was introduced to narrow
    /// entities by country mention.
    #[serde(alias = "country")]
    pub text: Option<String>,
    pub entities: EntityToggles,
    pub market_reports: MarketReportFilters,
    pub patent_density: DensityFilter,
}

/// Which entity categories are shown at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityToggles {
    pub patents: bool,
    pub papers: bool,
    pub companies: bool,
}

/// Market report presentation options, carried for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketReportFilters {
    pub forecast_only: bool,
    pub cagr_only: bool,
    /// Billions, inclusive.
    pub market_size_range: (f64, f64),
}

/// Patent timeline density reduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DensityFilter {
    /// Rows below this count are dropped. Only applied above 1.
    pub min_count: f64,
    /// Keep only the N busiest rows. `None` and `Some(0)` disable it.
    pub top_n: Option<usize>,
}

impl Default for DashboardFilters {
    fn default() -> Self {
        Self {
            patent_year_range: (DEFAULT_FIRST_YEAR, i64::from(chrono::Utc::now().year())),
            text: None,
            entities: EntityToggles::default(),
            market_reports: MarketReportFilters::default(),
            patent_density: DensityFilter::default(),
        }
    }
}

impl Default for EntityToggles {
    fn default() -> Self {
        Self { patents: true, papers: true, companies: true }
    }
}

impl Default for MarketReportFilters {
    fn default() -> Self {
        Self { forecast_only: false, cagr_only: false, market_size_range: (0.0, 500.0) }
    }
}

impl Default for DensityFilter {
    fn default() -> Self {
        Self { min_count: 1.0, top_n: None }
    }
}

impl DashboardFilters {
    /// Parse and validate a stored preset.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let filters: Self = serde_json::from_str(text)?;
        filters.validate()?;
        Ok(filters)
    }

    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.patent_year_range;
        if min > max {
            return Err(Error::InvalidConfig(format!(
                "patent year range is inverted: {min} > {max}"
            )));
        }
        let min_count = self.patent_density.min_count;
        if !min_count.is_finite() || min_count < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "minimum count must be a non-negative number, got {min_count}"
            )));
        }
        Ok(())
    }

    /// Lower-cased text needle, `None` when unset or empty.
    pub fn needle(&self) -> Option<String> {
        active_text(self.text.as_deref())
    }

    pub fn contains_year(&self, year: f64) -> bool {
        let (min, max) = self.patent_year_range;
        year >= min as f64 && year <= max as f64
    }
}

// ============================================================================
// Knowledge-graph filters
// ============================================================================

/// Predicates for the graph visibility projection.
///
/// Types and relations absent from the maps count as disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KgFilters {
    pub node_types: BTreeMap<String, bool>,
    pub relations: BTreeMap<String, bool>,
    /// Carried for the presentation layer; the projection does not use it.
    pub min_degree: u32,
    /// Case-insensitive substring required in node ids.
    pub keyword: Option<String>,
}

impl Default for KgFilters {
    fn default() -> Self {
        let node_types = [
            ("technology", true),
            ("patent", true),
            ("paper", true),
            ("company", true),
            ("country", false),
        ];
        let relations = [
            ("HAS_PATENT", true),
            ("HAS_PAPER", true),
            ("INVOLVES_COMPANY", true),
            ("FILED_IN", false),
            ("LOCATED_IN", false),
        ];
        Self {
            node_types: node_types.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
            relations: relations.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
            min_degree: 1,
            keyword: None,
        }
    }
}

impl KgFilters {
    /// Parse a stored preset.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn node_type_enabled(&self, node_type: &str) -> bool {
        self.node_types.get(node_type).copied().unwrap_or(false)
    }

    pub fn relation_enabled(&self, relation: &str) -> bool {
        self.relations.get(relation).copied().unwrap_or(false)
    }

    /// Lower-cased keyword, `None` when unset or empty.
    pub fn needle(&self) -> Option<String> {
        active_text(self.keyword.as_deref())
    }

    pub fn with_node_type(mut self, node_type: impl Into<String>, enabled: bool) -> Self {
        self.node_types.insert(node_type.into(), enabled);
        self
    }

    pub fn with_relation(mut self, relation: impl Into<String>, enabled: bool) -> Self {
        self.relations.insert(relation.into(), enabled);
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }
}

fn active_text(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.is_empty()).map(str::to_lowercase)
}
