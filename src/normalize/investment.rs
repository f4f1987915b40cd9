//! Country investment bars, with country labels canonicalized across
//! technologies so "United States" and "USA" land on one row.

use hashbrown::HashMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::model::{CountryRow, TechDocuments};

/// Location of the per-country values within the dashboard view.
pub const INVESTMENT_PATH: &str = "country_investment.values";

/// Canonical label for the United States.
pub const USA_LABEL: &str = "USA";

/// Field names accepted for the amount in record-form investment arrays.
const AMOUNT_FIELDS: &[&str] = &["value", "amount"];

/// Canonicalize a country label.
///
/// Any label containing "united" (case-insensitive) or exactly "usa"
/// (case-insensitive) becomes [`USA_LABEL`]. Everything else is kept
/// verbatim. The rule is coarse: "United Kingdom" contains "united" and
/// maps to USA as well, while "UK" is untouched.
pub fn canonical_country(label: &str) -> String {
    let lower = label.to_lowercase();
    if lower.contains("united") || lower == "usa" {
        USA_LABEL.to_owned()
    } else {
        label.to_owned()
    }
}

/// Build one row per canonical country, in first-seen order.
///
/// Every technology gets a cell in every row (`None` where it reported
/// nothing). A technology that reports two labels mapping to the same
/// canonical country keeps the later value.
pub fn normalize_investment(docs: &TechDocuments) -> Vec<CountryRow> {
    let techs: Vec<&str> = docs.technologies().collect();
    let mut order: Vec<String> = Vec::new();
    let mut table: HashMap<String, HashMap<&str, f64>> = HashMap::new();

    for (tech, doc) in docs.iter() {
        for (country, value) in country_values(tech, doc.field(INVESTMENT_PATH)) {
            let canonical = canonical_country(&country);
            let row = table.entry(canonical.clone()).or_insert_with(|| {
                order.push(canonical);
                HashMap::new()
            });
            row.insert(tech, value);
        }
    }

    let rows: Vec<CountryRow> = order
        .into_iter()
        .map(|country| {
            let row = table.remove(&country).unwrap_or_default();
            CountryRow {
                cells: techs
                    .iter()
                    .map(|tech| ((*tech).to_owned(), row.get(tech).copied()))
                    .collect(),
                country,
            }
        })
        .collect();

    debug!(techs = techs.len(), countries = rows.len(), "normalized investment");
    rows
}

/// Read `(country, amount)` pairs from either an object map
/// (`{"USA": 12}`) or an array of records (`[{"country": "USA", "value": 12}]`).
fn country_values(tech: &str, values: Option<&Value>) -> Vec<(String, f64)> {
    match values {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(country, v)| match v.as_f64() {
                Some(amount) => Some((country.clone(), amount)),
                None => {
                    trace!(tech, country = %country, "skipping non-numeric investment");
                    None
                }
            })
            .collect(),
        Some(Value::Array(records)) => records
            .iter()
            .filter_map(|record| {
                let country = record.get("country")?.as_str()?;
                let amount = AMOUNT_FIELDS
                    .iter()
                    .find_map(|f| record.get(*f).and_then(Value::as_f64));
                if amount.is_none() {
                    trace!(tech, country, "skipping investment record without amount");
                }
                Some((country.to_owned(), amount?))
            })
            .collect(),
        _ => Vec::new(),
    }
}
