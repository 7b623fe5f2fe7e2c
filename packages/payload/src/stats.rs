//! LISA cluster counts for a result collection.

use lisa_map_payload_models::{ClusterSummary, FeatureCollection, feature_property};
use serde_json::Value;

/// Property the analysis service writes each feature's cluster label to.
pub const CLUSTER_LABEL_KEY: &str = "cluster_label";

/// Counts features by cluster label.
///
/// Returns `None` for an empty collection.
#[must_use]
pub fn cluster_summary(collection: &FeatureCollection) -> Option<ClusterSummary> {
    if collection.is_empty() {
        return None;
    }

    let mut summary = ClusterSummary {
        total: collection.len(),
        ..ClusterSummary::default()
    };

    for feature in &collection.features {
        match feature_property(feature, CLUSTER_LABEL_KEY).and_then(Value::as_str) {
            Some("HH") => summary.high_high += 1,
            Some("LL") => summary.low_low += 1,
            Some("HL") => summary.high_low += 1,
            Some("LH") => summary.low_high += 1,
            _ => summary.ns += 1,
        }
    }

    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_each_label() {
        let labels = ["HH", "HH", "LL", "HL", "LH", "ns", "other"];
        let mut features: Vec<Value> = labels
            .iter()
            .map(|l| json!({"properties": {"cluster_label": l}}))
            .collect();
        features.push(json!({"properties": {}}));
        let summary = cluster_summary(&FeatureCollection::new(features)).unwrap();
        assert_eq!(
            summary,
            ClusterSummary {
                total: 8,
                high_high: 2,
                low_low: 1,
                high_low: 1,
                low_high: 1,
                ns: 3,
            }
        );
    }

    #[test]
    fn empty_collection_has_no_summary() {
        assert!(cluster_summary(&FeatureCollection::default()).is_none());
    }

    #[test]
    fn serializes_with_label_keys() {
        let summary = ClusterSummary {
            total: 1,
            high_high: 1,
            ..ClusterSummary::default()
        };
        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(value["HH"], 1);
        assert_eq!(value["ns"], 0);
        assert_eq!(value["total"], 1);
    }
}
