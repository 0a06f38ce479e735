//! Loading of the sightings GeoJSON layer used by the map.

use std::path::Path;

use geojson::Feature;
use geojson::feature::Id;
use serde_json::Value;
use tracing::info;

use squirrel_model::{
    Activity, ActivitySet, AgeGroup, FurColor, GeoPoint, RecordId, SightingFeature,
};

use crate::error::{IngestError, Result};
use crate::normalize::{census_date, count_value, flag_value, text_value};
use crate::records::{json_kind, read_text};
use crate::report::LoadReport;
use crate::sanitize::sanitize_json;

const ID_KEYS: [&str; 2] = ["id", "Unique Squirrel ID"];
const AGE_KEYS: [&str; 2] = ["age", "Age"];
const FUR_COLOR_KEYS: [&str; 3] = ["furColor", "fur_color", "Primary Fur Color"];
const DATE_KEYS: [&str; 2] = ["date", "Date"];
const DOGS_KEYS: [&str; 2] = ["dogs", "Dogs"];

/// Parse a GeoJSON `FeatureCollection` of sighting points.
///
/// Features are converted one at a time so that a feature with a broken
/// geometry (for example a `NaN` coordinate) only drops that feature.
pub fn parse_features(text: &str) -> Result<LoadReport<SightingFeature>> {
    let cleaned = sanitize_json(text);
    let value: Value = serde_json::from_str(&cleaned)?;
    let features = match value {
        Value::Object(mut object) => {
            let kind = object.get("type").and_then(Value::as_str).unwrap_or("");
            if kind != "FeatureCollection" {
                return Err(IngestError::NotFeatureCollection {
                    found: format!("type '{kind}'"),
                });
            }
            match object.remove("features") {
                Some(Value::Array(features)) => features,
                other => {
                    return Err(IngestError::NotFeatureCollection {
                        found: format!(
                            "'features' as {}",
                            other.as_ref().map_or("nothing", json_kind)
                        ),
                    });
                }
            }
        }
        other => {
            return Err(IngestError::NotFeatureCollection {
                found: json_kind(&other).to_string(),
            });
        }
    };

    let mut report = LoadReport::default();
    for (index, raw) in features.into_iter().enumerate() {
        let converted = Feature::from_json_value(raw)
            .map_err(|error| format!("invalid feature: {error}"))
            .and_then(|feature| sighting_from_feature(&feature));
        match converted {
            Ok(sighting) => report.push(sighting),
            Err(reason) => report.skip(index, reason),
        }
    }
    Ok(report)
}

/// Read and parse a sightings GeoJSON file.
pub fn load_features(path: &Path) -> Result<LoadReport<SightingFeature>> {
    let text = read_text(path)?;
    let report = parse_features(&text)?;
    info!(
        path = %path.display(),
        features = report.items.len(),
        skipped = report.skipped.len(),
        "features loaded"
    );
    Ok(report)
}

fn sighting_from_feature(feature: &Feature) -> std::result::Result<SightingFeature, String> {
    let position = point_position(feature)?;
    let id = feature_id(feature).ok_or_else(|| "missing sighting id".to_string())?;
    let id = RecordId::new(id).map_err(|error| error.to_string())?;

    let mut activities = ActivitySet::new();
    if let Some(properties) = &feature.properties {
        for (key, value) in properties {
            if let Ok(activity) = key.parse::<Activity>()
                && flag_value(value)
            {
                activities.insert(activity);
            }
        }
    }

    Ok(SightingFeature {
        id,
        position,
        date: property(feature, &DATE_KEYS).and_then(census_date),
        age: AgeGroup::from_census(property(feature, &AGE_KEYS).and_then(Value::as_str)),
        fur_color: FurColor::from_census(
            property(feature, &FUR_COLOR_KEYS).and_then(Value::as_str),
        ),
        activities,
        dogs: property(feature, &DOGS_KEYS).and_then(count_value),
    })
}

fn point_position(feature: &Feature) -> std::result::Result<GeoPoint, String> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| "feature has no geometry".to_string())?;
    let geojson::Value::Point(coordinates) = &geometry.value else {
        return Err("geometry is not a Point".to_string());
    };
    match coordinates.as_slice() {
        [lon, lat, ..] => GeoPoint::new(*lon, *lat).map_err(|error| error.to_string()),
        _ => Err("point has fewer than two coordinates".to_string()),
    }
}

fn feature_id(feature: &Feature) -> Option<String> {
    property(feature, &ID_KEYS)
        .and_then(text_value)
        .or_else(|| match &feature.id {
            Some(Id::String(id)) => Some(id.clone()),
            Some(Id::Number(id)) => Some(id.to_string()),
            None => None,
        })
}

fn property<'a>(feature: &'a Feature, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| feature.property(key))
        .filter(|value| !value.is_null())
}
