//! Terminal output for results and legends.

use lisa_map_choropleth::{DivergingClassifier, LegendSegment, compute_extent, format::format_range};
use lisa_map_interaction::{InfoReadout, InteractionController};
use lisa_map_payload::cluster_summary;
use lisa_map_payload_models::FeatureCollection;
use serde_json::json;

pub fn print_legend(segments: &[LegendSegment]) {
    for line in legend_lines(segments) {
        println!("{line}");
    }
}

/// One `color range` row per legend segment.
#[must_use]
pub fn legend_lines(segments: &[LegendSegment]) -> Vec<String> {
    segments
        .iter()
        .map(|segment| {
            format!(
                "{:<12} {}",
                segment.color.as_str(),
                format_range(segment.from, segment.to)
            )
        })
        .collect()
}

/// Prints the feature count, cluster summary, and, when `variable` is
/// given, its extent and legend.
pub fn print_result(
    classifier: &DivergingClassifier,
    result: Option<&FeatureCollection>,
    variable: Option<&str>,
) {
    let Some(collection) = result else {
        println!("No features returned");
        return;
    };
    println!("Features: {}", collection.len());

    if let Some(summary) = cluster_summary(collection) {
        println!(
            "Clusters: HH {}  LL {}  HL {}  LH {}  ns {}",
            summary.high_high, summary.low_low, summary.high_low, summary.low_high, summary.ns
        );
    }

    if let Some(variable) = variable {
        let domain = compute_extent(collection, variable);
        println!("{variable}: {}", format_range(domain.min, domain.max));
        print_legend(&classifier.legend(domain));
    }
}

/// Prints one JSON line per feature with its label, value, and fill.
///
/// # Errors
///
/// Returns an error if a line cannot be serialized.
pub fn print_features(controller: &InteractionController) -> Result<(), serde_json::Error> {
    for line in feature_lines(controller)? {
        println!("{line}");
    }
    Ok(())
}

/// The JSON lines [`print_features`] prints, in feature order.
///
/// # Errors
///
/// Returns an error if a line cannot be serialized.
pub fn feature_lines(controller: &InteractionController) -> Result<Vec<String>, serde_json::Error> {
    let mut lines = Vec::with_capacity(controller.collection().len());
    for id in 0..controller.collection().len() {
        let Some(style) = controller.style_for(id) else {
            continue;
        };
        let (label, value) = match controller.info_for(id) {
            InfoReadout::Feature { label, value, .. } => (label, value),
            InfoReadout::Prompt => continue,
        };
        let line = json!({
            "id": id,
            "label": label,
            "value": value,
            "fill": style.fill_color,
        });
        lines.push(serde_json::to_string(&line)?);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lisa_map_choropleth::{AttributeDomain, PaletteSet};
    use serde_json::{Value, json};

    fn feature(name: &str, rate: &Value) -> Value {
        json!({"type": "Feature", "properties": {"county": name, "rate": rate}, "geometry": null})
    }

    fn controller() -> InteractionController {
        let collection = FeatureCollection::new(vec![
            feature("Low", &json!(-2)),
            feature("Mid", &json!("3")),
            feature("High", &json!(10)),
            json!({"type": "Feature", "properties": {"county": "Blank"}, "geometry": null}),
        ]);
        InteractionController::new(
            DivergingClassifier::new(PaletteSet::default()),
            collection,
            "rate",
            None,
        )
    }

    fn parsed(lines: &[String]) -> Vec<Value> {
        lines
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn feature_lines_carry_label_value_and_fill() {
        let palettes = PaletteSet::default();
        let lines = parsed(&feature_lines(&controller()).unwrap());
        assert_eq!(lines.len(), 4);

        assert_eq!(lines[0]["id"], json!(0));
        assert_eq!(lines[0]["label"], json!("Low"));
        assert_eq!(lines[0]["value"], json!("-2.00"));
        assert_eq!(
            lines[0]["fill"],
            json!(palettes.negative.first().unwrap().as_str())
        );

        assert_eq!(
            lines[2]["fill"],
            json!(palettes.positive_terminal().as_str())
        );

        assert_eq!(lines[3]["label"], json!("Blank"));
        assert_eq!(lines[3]["value"], json!("\u{2014}"));
        assert_eq!(lines[3]["fill"], json!(palettes.default_color.as_str()));
    }

    #[test]
    fn legend_lines_pad_color_before_range() {
        let classifier = DivergingClassifier::new(PaletteSet::default());
        let lines = legend_lines(&classifier.legend(AttributeDomain::new(-10.0, 0.0)));
        assert!(!lines.is_empty());
        let first = &lines[0];
        let (color, range) = first.split_at(12);
        assert!(color.starts_with('#'));
        assert_eq!(range, " -10\u{2013}-7.5");
    }

    #[test]
    fn empty_legend_prints_nothing() {
        assert!(legend_lines(&[]).is_empty());
    }
}
