//! # View Filter
//!
//! User-selected predicates applied to reconciled data.
//!
//! | Function | Input | Effect |
//! |----------|-------|--------|
//! | `project` | raw or unified graph | tags every node/edge `hidden`, removes nothing |
//! | `apply_filters` | one dashboard document | narrows entity collections and the patent timeline |
//! | `reduce_timeline` | timeline points | year window, minimum density, top-N |
//!
//! None of these fail: absent or malformed input reads as empty.

pub mod config;
pub mod graph;
pub mod entities;
pub mod timeline;

pub use config::{
    DashboardFilters, KgFilters, EntityToggles, MarketReportFilters, DensityFilter,
    DEFAULT_FIRST_YEAR,
};
pub use graph::{project, Projection, Visible, GraphView, GraphNodeView, GraphEdgeView};
pub use entities::{apply_filters, patent_year_bounds};
pub use timeline::{reduce_timeline, timeline_points, TimelinePoint};
