//! # techpulse: Cross-Technology Reconciliation Core
//!
//! Turns per-technology analysis documents (untyped JSON, shape drifting
//! across pipeline versions) into two consumable views:
//!
//! 1. aligned time-series tables, one row per time key, one column per technology
//! 2. a single deduplicated knowledge graph with per-node technology provenance
//!
//! ## Design Principles
//!
//! 1. **Total functions**: malformed input degrades to "no data", never to an error
//! 2. **Shape dispatch, not schema trust**: elements are classified by what they look like
//! 3. **Accumulators, not globals**: reconciliation is a fold over an explicit arena
//! 4. **Annotate, don't delete**: filters tag visibility so renderer state survives
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use techpulse::{normalize, RawTechDocument, TechDocuments};
//!
//! let mut docs = TechDocuments::new();
//! docs.insert("ai", RawTechDocument::new(json!({
//!     "trend_curve": [{"year": 2020, "value": 5}]
//! })));
//! docs.insert("quantum", RawTechDocument::new(json!({
//!     "trend_curve": [{"year": 2021, "value": 7}]
//! })));
//!
//! let rows = normalize::normalize_series(&docs, "trend_curve");
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0].value("ai"), Some(5.0));
//! assert_eq!(rows[0].value("quantum"), None);
//! ```
//!
//! ## Components
//!
//! | Module | Role |
//! |--------|------|
//! | `magnitude` | "$1.2 Trillion" → 1200.0 (billions) |
//! | `normalize` | documents → time-aligned rows, country bars, market points |
//! | `reconcile` | per-technology graphs → unified graph |
//! | `filter` | visibility projection, entity filters, timeline reduction |
//! | `text` | link extraction from publication titles |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod magnitude;
pub mod normalize;
pub mod reconcile;
pub mod filter;
pub mod text;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    RawTechDocument, TechDocuments,
    RawNode, RawEdge, RawKg,
    UnifiedNode, UnifiedEdge, UnifiedKg,
    TimeKey, TimeSeriesRow, CountryRow, MagnitudeValue, TechMarketSeries,
};

// ============================================================================
// Re-exports: Components
// ============================================================================

pub use normalize::{AccumulateRule, Metric, PointShape};
pub use reconcile::{reconcile, GraphAccumulator, TechGraph};
pub use filter::{
    project, apply_filters, reduce_timeline,
    DashboardFilters, KgFilters, Projection, Visible, TimelinePoint,
};

// ============================================================================
// Error Types
// ============================================================================

/// Errors surfaced by the text-parsing entry points.
///
/// The transformation functions themselves are total; only parsing a
/// document or a filter preset from a string can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid filter configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
