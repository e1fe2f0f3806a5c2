//! Boundary mapping from upstream catalog payloads into [`EarthquakeEvent`].
//!
//! Upstream services deliver loosely typed GeoJSON in which almost every field
//! may be `null`. Features are mapped eagerly here so the analysis crates only
//! ever see strict values. A feature that cannot be mapped is skipped and counted.

use crate::error::CoreError;
use crate::structs::EarthquakeEvent;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    id: Option<String>,
    properties: Option<Properties>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    mag: Option<f64>,
    place: Option<String>,
    /// Milliseconds since the Unix epoch.
    time: Option<i64>,
    #[serde(rename = "magType")]
    mag_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[longitude, latitude, depth_km]`
    #[serde(default)]
    coordinates: Vec<Option<f64>>,
}

/// The outcome of mapping a catalog payload.
#[derive(Debug, Clone, Default)]
pub struct ParsedCatalog {
    pub events: Vec<EarthquakeEvent>,
    /// Number of features that were missing a required field.
    pub skipped: usize,
}

/// Maps a USGS-style GeoJSON `FeatureCollection` into strict events.
///
/// Only a payload that is not a feature collection at all is an error.
pub fn parse_geojson(payload: &str) -> Result<ParsedCatalog, CoreError> {
    let collection: FeatureCollection =
        serde_json::from_str(payload).map_err(|e| CoreError::Catalog(e.to_string()))?;

    let mut parsed = ParsedCatalog::default();
    for (index, feature) in collection.features.into_iter().enumerate() {
        match map_feature(index, feature) {
            Some(event) => parsed.events.push(event),
            None => parsed.skipped += 1,
        }
    }

    tracing::debug!(
        events = parsed.events.len(),
        skipped = parsed.skipped,
        "Mapped catalog payload."
    );
    Ok(parsed)
}

fn map_feature(index: usize, feature: Feature) -> Option<EarthquakeEvent> {
    let properties = feature.properties?;
    let geometry = feature.geometry?;

    let magnitude = properties.mag?;
    let timestamp = DateTime::<Utc>::from_timestamp_millis(properties.time?)?;
    let longitude = geometry.coordinates.first().copied().flatten()?;
    let latitude = geometry.coordinates.get(1).copied().flatten()?;
    // Depth is measured from the geoid, so events under high terrain are
    // reported slightly above it. Those are pinned to the surface.
    let depth_km = geometry.coordinates.get(2).copied().flatten().unwrap_or(0.0).max(0.0);

    let id = feature.id.unwrap_or_else(|| format!("feature-{index}"));
    let mut event = EarthquakeEvent::new(id, timestamp, latitude, longitude, depth_km, magnitude);
    if let Some(mag_type) = properties.mag_type {
        event = event.with_magnitude_type(mag_type);
    }
    if let Some(place) = properties.place {
        event = event.with_place(place);
    }
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "nc73912345",
                "properties": { "mag": 3.4, "place": "5km N of Ridgecrest, CA", "time": 1717200000000, "magType": "md" },
                "geometry": { "type": "Point", "coordinates": [-117.67, 35.67, 7.8] }
            },
            {
                "type": "Feature",
                "id": "ci40000001",
                "properties": { "mag": null, "place": "nowhere", "time": 1717200000000, "magType": "ml" },
                "geometry": { "type": "Point", "coordinates": [-117.0, 35.0, 3.0] }
            },
            {
                "type": "Feature",
                "id": "hv1",
                "properties": { "mag": 1.9, "place": null, "time": 1717200500000, "magType": null },
                "geometry": { "type": "Point", "coordinates": [-155.2, 19.4, -0.9] }
            }
        ]
    }"#;

    #[test]
    fn maps_features_and_skips_incomplete_ones() {
        let parsed = parse_geojson(PAYLOAD).unwrap();
        assert_eq!(parsed.events.len(), 2);
        assert_eq!(parsed.skipped, 1);

        let first = &parsed.events[0];
        assert_eq!(first.id, "nc73912345");
        assert_eq!(first.magnitude_type, "md");
        assert_eq!(first.latitude, 35.67);
        assert_eq!(first.longitude, -117.67);
        assert_eq!(first.place.as_deref(), Some("5km N of Ridgecrest, CA"));
        assert_eq!(first.timestamp.timestamp_millis(), 1_717_200_000_000);
    }

    #[test]
    fn negative_depth_is_pinned_to_surface() {
        let parsed = parse_geojson(PAYLOAD).unwrap();
        let hawaii = parsed.events.iter().find(|e| e.id == "hv1").unwrap();
        assert_eq!(hawaii.depth_km, 0.0);
        assert!(hawaii.is_well_formed());
    }

    #[test]
    fn rejects_non_json_payload() {
        assert!(matches!(parse_geojson("not json"), Err(CoreError::Catalog(_))));
    }

    #[test]
    fn empty_collection_is_fine() {
        let parsed = parse_geojson(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(parsed.events.is_empty());
        assert_eq!(parsed.skipped, 0);
    }
}
