//! GeoJSON output for terminator polygons.
//!
//! Coordinates are `[lng, lat]`, the reverse of [`TerminatorPolygon::lat_lngs`].

use aether_astro::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TerminatorError;
use crate::polygon::TerminatorPolygon;

/// GeoJSON geometry. Only polygons are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<GeoPoint>> },
}

/// A GeoJSON `Feature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

/// Controls what goes into a feature's `properties`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOptions {
    /// Add `instant`, `declination_deg`, `resolution` and `closing_pole`.
    /// Off by default, leaving `properties` as `{}`.
    pub include_metadata: bool,
}

impl TerminatorPolygon {
    /// The polygon as a GeoJSON feature with empty properties.
    pub fn to_feature(&self) -> Feature {
        self.to_feature_with(&FeatureOptions::default())
    }

    pub fn to_feature_with(&self, options: &FeatureOptions) -> Feature {
        let mut properties = Map::new();
        if options.include_metadata {
            properties.insert("instant".into(), Value::String(self.instant.to_string()));
            properties.insert("declination_deg".into(), Value::from(self.declination_deg));
            properties.insert("resolution".into(), Value::from(self.resolution));
            properties.insert(
                "closing_pole".into(),
                Value::String(self.closing_pole.as_str().to_string()),
            );
        }

        Feature {
            properties,
            geometry: Geometry::Polygon {
                coordinates: vec![self.ring()],
            },
        }
    }

    /// Serialize straight to a GeoJSON string.
    pub fn to_geojson_string(
        &self,
        options: &FeatureOptions,
        pretty: bool,
    ) -> Result<String, TerminatorError> {
        let feature = self.to_feature_with(options);
        let out = if pretty {
            serde_json::to_string_pretty(&feature)?
        } else {
            serde_json::to_string(&feature)?
        };
        Ok(out)
    }
}
