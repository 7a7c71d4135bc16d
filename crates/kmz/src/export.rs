//! GeoJSON export.
//!
//! GeoJSON positions are `[lng, lat(, alt)]`, the reverse of the
//! [`Coordinate`] record order used everywhere else in this crate.

use crate::model::{ArchiveDocument, Geometry, Placemark, Properties};
use fieldmap_geo::Coordinate;
use serde::{Deserialize, Serialize};

/// A GeoJSON position: `[lng, lat]` or `[lng, lat, alt]`.
pub type Position = Vec<f64>;

/// A GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum GeoJsonGeometry {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
}

/// A GeoJSON feature carrying one placemark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    pub id: String,
    pub properties: Properties,
    pub geometry: GeoJsonGeometry,
}

/// A GeoJSON feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// Convert every placemark of `doc`, in flatten order, into a GeoJSON feature.
///
/// Properties hold `name`, `description` and `styleUrl` (when present)
/// followed by the placemark's extra properties, which win on key clashes.
pub fn to_geojson(doc: &ArchiveDocument) -> FeatureCollection {
    FeatureCollection {
        features: doc.flatten().into_iter().map(Feature::from).collect(),
    }
}

impl From<&Placemark> for Feature {
    fn from(placemark: &Placemark) -> Self {
        let mut properties = Properties::new();
        properties.insert("name".to_string(), placemark.name.clone().into());
        if let Some(description) = &placemark.description {
            properties.insert("description".to_string(), description.clone().into());
        }
        if let Some(style_url) = &placemark.style_url {
            properties.insert("styleUrl".to_string(), style_url.clone().into());
        }
        properties.extend(placemark.extra_properties.clone());

        Feature {
            id: placemark.id.clone(),
            properties,
            geometry: GeoJsonGeometry::from(&placemark.geometry),
        }
    }
}

impl From<&Geometry> for GeoJsonGeometry {
    fn from(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(c) => GeoJsonGeometry::Point(to_position(c)),
            Geometry::LineString(coords) => GeoJsonGeometry::LineString(coords.iter().map(to_position).collect()),
            Geometry::Polygon(rings) => GeoJsonGeometry::Polygon(
                rings
                    .iter()
                    .map(|ring| ring.iter().map(to_position).collect())
                    .collect(),
            ),
        }
    }
}

fn to_position(c: &Coordinate) -> Position {
    let [lng, lat] = c.to_lng_lat();
    match c.alt {
        Some(alt) => vec![lng, lat, alt],
        None => vec![lng, lat],
    }
}

/// Positions with fewer than two values are skipped.
fn from_position(p: &[f64]) -> Option<Coordinate> {
    match *p {
        [lng, lat] => Some(Coordinate::new(lat, lng)),
        [lng, lat, alt, ..] => Some(Coordinate::new(lat, lng).with_altitude(alt)),
        _ => None,
    }
}

impl GeoJsonGeometry {
    /// All positions converted back to (lat, lng) coordinates, rings flattened
    /// in order.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        match self {
            GeoJsonGeometry::Point(p) => from_position(p).into_iter().collect(),
            GeoJsonGeometry::LineString(line) => line.iter().filter_map(|p| from_position(p)).collect(),
            GeoJsonGeometry::Polygon(rings) => rings
                .iter()
                .flatten()
                .filter_map(|p| from_position(p))
                .collect(),
        }
    }
}

impl FeatureCollection {
    /// Per-feature coordinates in (lat, lng) record order.
    pub fn coordinates_lat_lng(&self) -> Vec<Vec<Coordinate>> {
        self.features.iter().map(|f| f.geometry.coordinates()).collect()
    }

    /// Pretty-printed JSON, the form offered for download.
    ///
    /// # Errors
    ///
    /// Fails only if a property value cannot be serialized.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `<document name>.geojson`, whitespace runs replaced by `_`.
pub fn export_file_name(doc: &ArchiveDocument) -> String {
    format!("{}.geojson", file_stem(&doc.name))
}

/// `<document name>_analytics.json`, whitespace runs replaced by `_`.
pub fn analytics_file_name(doc: &ArchiveDocument) -> String {
    format!("{}_analytics.json", file_stem(&doc.name))
}

fn file_stem(name: &str) -> String {
    let stem = name.split_whitespace().collect::<Vec<_>>().join("_");
    if stem.is_empty() { "export".to_string() } else { stem }
}
