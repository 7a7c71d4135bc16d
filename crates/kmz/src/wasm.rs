//! WASM bindings for the kmz crate.
//!
//! These bindings let the browser import page hand the uploaded file bytes to
//! Rust (ideally from a web worker) and receive JSON back.

use crate::{analyze_with_options, parse, to_geojson, AnalysisOptions};
use fieldmap_geo::{haversine_distance, Coordinate};
use wasm_bindgen::prelude::*;

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse KMZ bytes and return the placemark tree as JSON.
#[wasm_bindgen]
pub fn parse_kmz(bytes: &[u8]) -> Result<String, JsValue> {
    let doc = parse(bytes).map_err(to_js_error)?;
    serde_json::to_string(&doc).map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Parse KMZ bytes and return location statistics as JSON.
///
/// # Arguments
/// * `bytes` - The uploaded `.kmz` file
/// * `max_distance_km` - Clustering radius; `0` or less uses the default
#[wasm_bindgen]
pub fn analyze_kmz(bytes: &[u8], max_distance_km: f64) -> Result<String, JsValue> {
    let doc = parse(bytes).map_err(to_js_error)?;

    let mut options = AnalysisOptions::default();
    if max_distance_km.is_finite() && max_distance_km > 0.0 {
        options.cluster_max_distance_km = max_distance_km;
    }

    let stats = analyze_with_options(&doc, &options);
    serde_json::to_string(&stats).map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Parse KMZ bytes and return a pretty-printed GeoJSON FeatureCollection.
#[wasm_bindgen]
pub fn export_geojson(bytes: &[u8]) -> Result<String, JsValue> {
    let doc = parse(bytes).map_err(to_js_error)?;
    to_geojson(&doc)
        .to_json_pretty()
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Great-circle distance between two points in kilometers.
#[wasm_bindgen]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine_distance(&Coordinate::new(lat1, lng1), &Coordinate::new(lat2, lng2))
}
