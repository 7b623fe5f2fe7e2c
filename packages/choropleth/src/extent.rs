//! Numeric coercion of feature properties and attribute extents.
//!
//! Property values arrive in whatever shape the analysis service or the
//! uploaded dataset produced: numbers, numeric strings with units or
//! thousands separators, single-element arrays, or `{ "value": ... }`
//! wrappers. Anything that does not yield a finite number is skipped.

use lisa_map_choropleth_models::AttributeDomain;
use lisa_map_payload_models::{FeatureCollection, feature_property};
use serde_json::Value;

/// Coerces a property value to a finite number.
///
/// - numbers pass through when finite
/// - strings are stripped down to digits, signs, `.` and exponent
///   markers, then the longest leading number is parsed
///   (`"1,234.5 %"` -> `1234.5`, `"2020-01"` -> `2020`)
/// - arrays yield their first element that coerces
/// - objects recurse into `value`, then `Value`
///
/// Returns `None` for everything else, including empty strings.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_numeric_str(s),
        Value::Array(items) => items.iter().find_map(coerce_number),
        Value::Object(map) => map
            .get("value")
            .or_else(|| map.get("Value"))
            .and_then(coerce_number),
        Value::Null | Value::Bool(_) => None,
    }
}

fn parse_numeric_str(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .collect();
    let end = numeric_prefix_len(cleaned.as_bytes());
    if end == 0 {
        return None;
    }
    cleaned[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Length of the longest leading `[sign] digits [. digits] [e [sign] digits]`
/// run, or 0 when no digit starts the mantissa.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(i);
    let mut mantissa_digits = int_end > i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        mantissa_digits |= frac_end > i + 1;
        i = frac_end;
    }
    if !mantissa_digits {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    i
}

/// Reads and coerces `attribute` from a single feature.
#[must_use]
pub fn feature_value(feature: &Value, attribute: &str) -> Option<f64> {
    feature_property(feature, attribute).and_then(coerce_number)
}

/// Computes the finite `[min, max]` of `attribute` across `collection`.
///
/// Features whose value does not coerce are ignored. When no feature
/// yields a finite value the domain collapses to [`AttributeDomain::EMPTY`].
#[must_use]
pub fn compute_extent(collection: &FeatureCollection, attribute: &str) -> AttributeDomain {
    let mut bounds: Option<(f64, f64)> = None;
    let mut skipped = 0_usize;

    for feature in &collection.features {
        let Some(v) = feature_value(feature, attribute) else {
            skipped += 1;
            continue;
        };
        bounds = Some(bounds.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))));
    }

    if skipped > 0 {
        log::debug!(
            "Skipped {skipped} of {} features with no numeric '{attribute}'",
            collection.len()
        );
    }

    bounds.map_or(AttributeDomain::EMPTY, |(min, max)| {
        AttributeDomain::new(min, max)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(values: Vec<Value>) -> FeatureCollection {
        FeatureCollection::new(
            values
                .into_iter()
                .map(|v| json!({"type": "Feature", "geometry": null, "properties": {"rate": v}}))
                .collect(),
        )
    }

    #[test]
    fn coerces_plain_numbers() {
        assert_eq!(coerce_number(&json!(3.5)), Some(3.5));
        assert_eq!(coerce_number(&json!(-2)), Some(-2.0));
    }

    #[test]
    fn coerces_decorated_strings() {
        assert_eq!(coerce_number(&json!("1,234.5")), Some(1234.5));
        assert_eq!(coerce_number(&json!("12 %")), Some(12.0));
        assert_eq!(coerce_number(&json!("-3.2e2")), Some(-320.0));
        assert_eq!(coerce_number(&json!("$ 7")), Some(7.0));
    }

    #[test]
    fn rejects_non_numeric_strings() {
        assert_eq!(coerce_number(&json!("n/a")), None);
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!("Infinity")), None);
    }

    #[test]
    fn parses_leading_number_of_ranges_and_dates() {
        assert_eq!(coerce_number(&json!("12.5-13")), Some(12.5));
        assert_eq!(coerce_number(&json!("2020-01")), Some(2020.0));
        assert_eq!(coerce_number(&json!("1.2.3")), Some(1.2));
        assert_eq!(coerce_number(&json!("5e")), Some(5.0));
        assert_eq!(coerce_number(&json!("-")), None);
        assert_eq!(coerce_number(&json!("e5")), None);
    }

    #[test]
    fn coerces_first_finite_array_element() {
        assert_eq!(coerce_number(&json!(["x", null, "4", 9])), Some(4.0));
        assert_eq!(coerce_number(&json!([])), None);
    }

    #[test]
    fn coerces_wrapped_values() {
        assert_eq!(coerce_number(&json!({"value": "8"})), Some(8.0));
        assert_eq!(coerce_number(&json!({"Value": 1.5})), Some(1.5));
        assert_eq!(coerce_number(&json!({"value": [null, {"Value": -1}]})), Some(-1.0));
        assert_eq!(coerce_number(&json!({"other": 2})), None);
    }

    #[test]
    fn rejects_null_and_bool() {
        assert_eq!(coerce_number(&Value::Null), None);
        assert_eq!(coerce_number(&json!(true)), None);
    }

    #[test]
    fn extent_over_mixed_values() {
        let fc = collection(vec![json!(3), json!("-10"), json!("bad"), json!(null), json!(20.0)]);
        assert_eq!(compute_extent(&fc, "rate"), AttributeDomain::new(-10.0, 20.0));
    }

    #[test]
    fn extent_without_finite_values_is_zero() {
        let fc = collection(vec![json!("bad"), json!(null), json!({})]);
        assert_eq!(compute_extent(&fc, "rate"), AttributeDomain::EMPTY);
        assert_eq!(
            compute_extent(&FeatureCollection::default(), "rate"),
            AttributeDomain::EMPTY
        );
    }

    #[test]
    fn extent_ignores_features_without_properties() {
        let mut fc = collection(vec![json!(5)]);
        fc.features.push(json!({"type": "Feature"}));
        fc.features.push(json!("not a feature"));
        assert_eq!(compute_extent(&fc, "rate"), AttributeDomain::new(5.0, 5.0));
    }

    #[test]
    fn extent_of_missing_attribute_is_zero() {
        let fc = collection(vec![json!(1), json!(2)]);
        assert_eq!(compute_extent(&fc, "other"), AttributeDomain::EMPTY);
    }
}
