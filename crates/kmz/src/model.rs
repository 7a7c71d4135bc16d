//! Typed placemark tree produced by the parser.
//!
//! The tree is owned top-down: the document owns its root placemarks and
//! folders, and every folder owns its own children.

use fieldmap_geo::Coordinate;
use serde::{Deserialize, Serialize};

/// Extra key/value data attached to a placemark.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Geometry of a placemark.
///
/// Serializes as `{"type": "...", "coordinates": ...}` with coordinates in
/// (lat, lng) record form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Coordinate),
    LineString(Vec<Coordinate>),
    /// Rings in document order; the parser only fills the outer ring.
    Polygon(Vec<Vec<Coordinate>>),
}

/// Discriminant of [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Coordinates that count toward statistics: the point, every line
    /// vertex, or the outer ring of a polygon.
    pub fn primary_coordinates(&self) -> &[Coordinate] {
        match self {
            Geometry::Point(c) => std::slice::from_ref(c),
            Geometry::LineString(coords) => coords,
            Geometry::Polygon(rings) => rings.first().map(Vec::as_slice).unwrap_or(&[]),
        }
    }
}

/// A single named geographic feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placemark {
    /// Source `id` attribute, or a generated identifier
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_url: Option<String>,
    pub geometry: Geometry,
    #[serde(default, rename = "properties", skip_serializing_if = "Properties::is_empty")]
    pub extra_properties: Properties,
}

/// A named container of placemarks and nested folders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub placemarks: Vec<Placemark>,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

/// A non-markup entry found inside a KMZ archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmbeddedResource {
    /// Path within the archive
    pub path: String,
    /// Uncompressed size in bytes
    pub size: u64,
    pub kind: ResourceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Model,
    Document,
    Other,
}

impl ResourceKind {
    /// Classify a resource file by its extension.
    pub fn from_path(path: &str) -> Self {
        let extension = std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "tif" | "tiff" => Self::Image,
            "dae" | "obj" | "gltf" | "glb" => Self::Model,
            "xml" | "txt" | "html" | "htm" => Self::Document,
            _ => Self::Other,
        }
    }
}

/// Root of a parsed archive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Placemarks directly under the root container
    #[serde(default)]
    pub placemarks: Vec<Placemark>,
    /// Folders directly under the root container
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<EmbeddedResource>,
}

impl ArchiveDocument {
    /// Every placemark in the tree, depth-first pre-order.
    ///
    /// Root placemarks come first, then each folder's own placemarks before
    /// those of its subfolders, recursively, preserving document order.
    pub fn flatten(&self) -> Vec<&Placemark> {
        let mut out: Vec<&Placemark> = self.placemarks.iter().collect();
        for folder in &self.folders {
            folder.collect_into(&mut out);
        }
        out
    }

    /// Total number of placemarks in the tree.
    pub fn placemark_count(&self) -> usize {
        self.placemarks.len() + self.folders.iter().map(Folder::placemark_count).sum::<usize>()
    }
}

impl Folder {
    fn collect_into<'a>(&'a self, out: &mut Vec<&'a Placemark>) {
        out.extend(self.placemarks.iter());
        for sub in &self.folders {
            sub.collect_into(out);
        }
    }

    /// Number of placemarks in this folder and all of its subfolders.
    pub fn placemark_count(&self) -> usize {
        self.placemarks.len() + self.folders.iter().map(Folder::placemark_count).sum::<usize>()
    }
}
