//! # Data Model
//!
//! Raw inputs (documents, per-technology graphs) and reconciled outputs
//! (unified graph, chart rows). These types cross every boundary:
//! caller ↔ normalizer ↔ reconciler ↔ filter ↔ presentation.
//!
//! Design rule: pure data with no I/O or async.

pub mod document;
pub mod node;
pub mod relationship;
pub mod graph;
pub mod series;

pub use document::{RawTechDocument, TechDocuments, resolve_path, first_array};
pub use node::{RawNode, UnifiedNode, TechList, TECHNOLOGY_TYPE};
pub use relationship::{RawEdge, UnifiedEdge};
pub use graph::{RawKg, UnifiedKg};
pub use series::{
    Cell, TimeKey, TimeSeriesRow, CountryRow, MagnitudeValue, TechMarketSeries,
    DEFAULT_MARKET_SOURCE, TIME_COLUMN, COUNTRY_COLUMN,
};
