//! Market-size distributions: free-text report sizes per technology,
//! parsed to billions.

use serde_json::Value;
use tracing::{debug, trace};

use crate::magnitude;
use crate::model::{first_array, MagnitudeValue, TechDocuments, TechMarketSeries, DEFAULT_MARKET_SOURCE};

/// Where market reports have lived across pipeline versions, in the order
/// they are tried. The first location holding an array wins.
pub const MARKET_REPORT_LOCATIONS: &[&[&str]] = &[
    &["market_reports"],
    &["dashboard", "market_reports"],
    &["entities", "market_reports"],
];

/// One series per technology, in mapping order. Reports whose size does
/// not parse are dropped; a technology with none keeps an empty series.
pub fn normalize_market(docs: &TechDocuments) -> Vec<TechMarketSeries> {
    docs.iter()
        .map(|(tech, doc)| {
            let points: Vec<MagnitudeValue> = first_array(doc.dashboard(), MARKET_REPORT_LOCATIONS)
                .map(|reports| reports.iter().filter_map(|r| market_point(tech, r)).collect())
                .unwrap_or_default();
            debug!(tech, points = points.len(), "normalized market reports");
            TechMarketSeries { tech: tech.to_owned(), points }
        })
        .collect()
}

fn market_point(tech: &str, report: &Value) -> Option<MagnitudeValue> {
    let raw = report.get("market_size").and_then(Value::as_str);
    let Some(value) = magnitude::parse(raw) else {
        trace!(tech, market_size = ?raw, "dropping unparseable market size");
        return None;
    };
    Some(MagnitudeValue {
        value,
        title: report.get("title").and_then(Value::as_str).map(str::to_owned),
        source: report
            .get("source")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_MARKET_SOURCE)
            .to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawTechDocument;
    use serde_json::json;

    #[test]
    fn test_nested_location_fallback() {
        let docs: TechDocuments = [
            ("flat", RawTechDocument::new(json!({
                "market_reports": [{"market_size": "$2 billion", "title": "Flat"}]
            }))),
            ("nested", RawTechDocument::new(json!({
                "entities": {"market_reports": [
                    {"market_size": "$1.5 Trillion", "source": "Analyst Co"},
                    {"market_size": "unknown"}
                ]}
            }))),
            ("none", RawTechDocument::new(json!({}))),
        ]
        .into_iter()
        .collect();

        let series = normalize_market(&docs);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].points[0].value, 2.0);
        assert_eq!(series[0].points[0].source, "Market Report");
        assert_eq!(series[1].points.len(), 1);
        assert_eq!(series[1].points[0].value, 1500.0);
        assert_eq!(series[1].points[0].source, "Analyst Co");
        assert!(series[2].is_empty());
    }
}
