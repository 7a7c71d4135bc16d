//! KMZ placemark extraction and analytics.
//!
//! This crate provides:
//! - Parsing of KMZ archives (and bare KML) into an owned folder/placemark tree
//! - Location statistics: geometry counts, bounds, weighted average position
//! - Greedy proximity clustering of point placemarks
//! - Route distance and bounds for line placemarks
//! - GeoJSON export
//! - WASM bindings for browser usage
//!
//! Parsing is lenient: only an unreadable archive, a missing `.kml` entry or
//! malformed XML fail; a placemark without usable geometry is skipped and a
//! malformed coordinate tuple is dropped.
//!
//! # Example
//!
//! ```
//! use fieldmap_kmz::{analyze, parse_kml, to_geojson};
//!
//! let kml = r#"<kml><Document><name>Walk</name>
//!   <Placemark><name>Start</name><Point><coordinates>20.0,10.0</coordinates></Point></Placemark>
//!   <Placemark><name>Path</name><LineString><coordinates>0,0 1,0 1,1</coordinates></LineString></Placemark>
//! </Document></kml>"#;
//!
//! let doc = parse_kml(kml)?;
//! let stats = analyze(&doc);
//! assert_eq!(stats.point_count, 1);
//! assert_eq!(stats.routes[0].waypoint_count, 3);
//!
//! let geojson = to_geojson(&doc);
//! assert_eq!(geojson.features.len(), 2);
//! # Ok::<(), fieldmap_kmz::KmzError>(())
//! ```

pub mod analytics;
mod archive;
mod coordinates;
mod error;
pub mod export;
mod model;
mod parser;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "wasm")]
mod wasm;

pub use analytics::{
    analyze, analyze_with_options, AnalysisOptions, LocationCluster, LocationStats, RouteAnalysis,
};
pub use archive::{extract_markup, ExtractedMarkup};
pub use coordinates::parse_coordinates;
pub use error::{KmzError, KmzErrorCode, Result};
pub use export::{analytics_file_name, export_file_name, to_geojson, FeatureCollection};
pub use model::{
    ArchiveDocument, EmbeddedResource, Folder, Geometry, GeometryKind, Placemark, Properties,
    ResourceKind,
};
pub use parser::{parse, parse_kml, parse_kml_with_options, parse_path, parse_with_options, ParseOptions};

pub use fieldmap_geo::{haversine_distance, BoundingBox, Coordinate};
