use geo::BoundingRect;
use lisa_map_payload_models::feature_geometry;
use serde_json::Value;

/// The bounding rectangle of a feature's geometry.
///
/// `None` when the feature has no geometry or it is not valid `GeoJSON`.
#[must_use]
pub fn feature_bounds(feature: &Value) -> Option<geo::Rect<f64>> {
    let geometry = feature_geometry(feature)?;
    let geometry: geojson::Geometry = match serde_json::from_value(geometry.clone()) {
        Ok(geometry) => geometry,
        Err(e) => {
            log::debug!("Feature geometry is not GeoJSON: {e}");
            return None;
        }
    };
    let geometry: geo::Geometry<f64> = geometry.try_into().ok()?;
    geometry.bounding_rect()
}
