//! Per-element shape dispatch for metric arrays.
//!
//! Pipeline versions emit either object-per-point arrays
//! (`[{"year": 2021, "value": 3}]`) or bare magnitudes (`[3, 5, 8]`), with
//! no version tag saying which. Each element is classified on its own.

use serde_json::Value;

use super::AccumulateRule;
use crate::model::TimeKey;

/// Time key assigned to position 0 of a bare-number array.
pub const BASE_YEAR: i64 = 2020;

/// Field carrying the time key on object-per-point elements.
const TIME_FIELD: &str = "year";

/// What one metric-array element turned out to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointShape {
    /// Object with an explicit numeric year, fractional or not. `magnitude`
    /// is `None` when neither magnitude field is numeric; the accumulation
    /// rule decides what that counts as.
    Timed { key: TimeKey, magnitude: Option<f64> },
    /// Bare number; the key was inferred from array position.
    Inferred { key: TimeKey, magnitude: f64 },
    /// Anything else. Skipped.
    Unrecognized,
}

impl PointShape {
    pub fn key(&self) -> Option<TimeKey> {
        match self {
            PointShape::Timed { key, .. } | PointShape::Inferred { key, .. } => Some(*key),
            PointShape::Unrecognized => None,
        }
    }
}

/// Classify `element`, found at `position` in its array, reading `value`
/// before `count`.
pub fn classify_point(element: &Value, position: usize) -> PointShape {
    classify_point_as(element, position, AccumulateRule::Overwrite)
}

/// Classify `element` with the magnitude field order of `rule`.
pub fn classify_point_as(element: &Value, position: usize, rule: AccumulateRule) -> PointShape {
    match element {
        Value::Object(fields) => {
            let Some(key) = fields
                .get(TIME_FIELD)
                .and_then(Value::as_f64)
                .and_then(TimeKey::new)
            else {
                return PointShape::Unrecognized;
            };
            let magnitude = rule
                .magnitude_fields()
                .iter()
                .find_map(|f| fields.get(*f).and_then(Value::as_f64));
            PointShape::Timed { key, magnitude }
        }
        Value::Number(n) => match (n.as_f64(), i64::try_from(position)) {
            (Some(magnitude), Ok(offset)) => PointShape::Inferred {
                key: TimeKey::from(BASE_YEAR.saturating_add(offset)),
                magnitude,
            },
            _ => PointShape::Unrecognized,
        },
        _ => PointShape::Unrecognized,
    }
}

/// A JSON number with no fractional part, as a whole year.
pub(crate) fn integral(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64).then_some(f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timed_prefers_value_then_count() {
        assert_eq!(
            classify_point(&json!({"year": 2021, "value": 3, "count": 9}), 0),
            PointShape::Timed { key: TimeKey::from(2021), magnitude: Some(3.0) }
        );
        assert_eq!(
            classify_point(&json!({"year": 2021, "count": 9}), 0),
            PointShape::Timed { key: TimeKey::from(2021), magnitude: Some(9.0) }
        );
        assert_eq!(
            classify_point(&json!({"year": 2021.0, "value": null}), 0),
            PointShape::Timed { key: TimeKey::from(2021), magnitude: None }
        );
    }

    #[test]
    fn test_event_batches_prefer_count() {
        let point = json!({"year": 2020, "value": 9, "count": 2});
        assert_eq!(
            classify_point_as(&point, 0, AccumulateRule::Sum),
            PointShape::Timed { key: TimeKey::from(2020), magnitude: Some(2.0) }
        );
        assert_eq!(
            classify_point_as(&json!({"year": 2020, "value": 9}), 0, AccumulateRule::Sum),
            PointShape::Timed { key: TimeKey::from(2020), magnitude: Some(9.0) }
        );
    }

    #[test]
    fn test_fractional_year_is_timed() {
        let shape = classify_point(&json!({"year": 2020.5, "value": 3}), 0);
        assert_eq!(
            shape,
            PointShape::Timed { key: TimeKey::new(2020.5).unwrap(), magnitude: Some(3.0) }
        );
        assert_eq!(shape.key().map(TimeKey::get), Some(2020.5));
    }

    #[test]
    fn test_inferred_from_position() {
        assert_eq!(
            classify_point(&json!(7.5), 3),
            PointShape::Inferred { key: TimeKey::from(2023), magnitude: 7.5 }
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify_point(&json!({"year": "2021", "value": 1}), 0), PointShape::Unrecognized);
        assert_eq!(classify_point(&json!("12"), 0), PointShape::Unrecognized);
        assert_eq!(classify_point(&json!(null), 0), PointShape::Unrecognized);
        assert_eq!(classify_point(&json!([2020, 1]), 0), PointShape::Unrecognized);
        assert_eq!(PointShape::Unrecognized.key(), None);
    }
}
