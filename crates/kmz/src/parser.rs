//! KML document parsing.
//!
//! Walks the XML tree and builds the owned [`ArchiveDocument`] hierarchy.
//! Only failures of the container or of XML well-formedness abort a parse;
//! a placemark without usable geometry is logged and skipped.

use crate::archive::{decode_text, extract_markup};
use crate::coordinates::parse_coordinates;
use crate::error::{KmzError, Result};
use crate::model::{ArchiveDocument, Folder, Geometry, Placemark, Properties};
use roxmltree::Node;
use serde::{Deserialize, Serialize};
use std::path::Path;

const UNTITLED_DOCUMENT: &str = "Untitled";
const UNTITLED_FOLDER: &str = "Untitled Folder";
const UNTITLED_PLACEMARK: &str = "Untitled Placemark";

/// Tuning for the lenient parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Store each placemark's raw markup under the `originalElement` property
    pub keep_source_markup: bool,
    /// Copy `ExtendedData` name/value pairs into the placemark properties
    pub extended_data: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            keep_source_markup: false,
            extended_data: true,
        }
    }
}

/// Parse an in-memory KMZ archive with default options.
///
/// # Errors
///
/// See [`parse_with_options`].
pub fn parse(bytes: &[u8]) -> Result<ArchiveDocument> {
    parse_with_options(bytes, &ParseOptions::default())
}

/// Parse an in-memory KMZ archive.
///
/// # Errors
///
/// - [`KmzError::Archive`] if the bytes are not a zip archive
/// - [`KmzError::NoMarkupFound`] if the archive holds no `.kml` entry
/// - [`KmzError::MalformedMarkup`] if that entry is not well-formed XML
pub fn parse_with_options(bytes: &[u8], options: &ParseOptions) -> Result<ArchiveDocument> {
    let markup = extract_markup(bytes)?;
    let mut doc = parse_kml_with_options(&markup.text, options)?;
    doc.resources = markup.resources;
    Ok(doc)
}

/// Parse a bare KML document with default options.
///
/// # Errors
///
/// Returns [`KmzError::MalformedMarkup`] if the text is not well-formed XML.
pub fn parse_kml(text: &str) -> Result<ArchiveDocument> {
    parse_kml_with_options(text, &ParseOptions::default())
}

/// Parse a bare KML document.
///
/// # Errors
///
/// Returns [`KmzError::MalformedMarkup`] if the text is not well-formed XML.
pub fn parse_kml_with_options(text: &str, options: &ParseOptions) -> Result<ArchiveDocument> {
    let parsing = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let xml = roxmltree::Document::parse_with_options(text, parsing)
        .map_err(|e| KmzError::MalformedMarkup(e.to_string()))?;

    let root = xml.root_element();
    let container = first_descendant(root, "Document")
        .or_else(|| first_descendant(root, "Folder"))
        .unwrap_or(root);

    let walker = Walker { source: text, options };
    let doc = ArchiveDocument {
        name: child_text(container, "name").unwrap_or_else(|| UNTITLED_DOCUMENT.to_string()),
        description: child_text(container, "description"),
        placemarks: walker.placemarks(container),
        folders: walker.folders(container),
        resources: Vec::new(),
    };

    tracing::debug!(
        name = %doc.name,
        placemarks = doc.placemark_count(),
        folders = doc.folders.len(),
        "Parsed KML document"
    );

    Ok(doc)
}

/// Read a `.kmz` or `.kml` file from disk, dispatching on the extension.
///
/// Files without a `.kml` extension are treated as archives.
///
/// # Errors
///
/// Returns [`KmzError::Io`] if the file cannot be read, otherwise the errors
/// of [`parse_with_options`] or [`parse_kml_with_options`].
pub fn parse_path<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<ArchiveDocument> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;

    let is_kml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("kml"));

    if is_kml {
        parse_kml_with_options(&decode_text(&bytes), options)
    } else {
        parse_with_options(&bytes, options)
    }
}

struct Walker<'s, 'o> {
    source: &'s str,
    options: &'o ParseOptions,
}

impl Walker<'_, '_> {
    fn placemarks(&self, parent: Node<'_, '_>) -> Vec<Placemark> {
        element_children(parent, "Placemark")
            .filter_map(|node| self.placemark(node))
            .collect()
    }

    fn folders(&self, parent: Node<'_, '_>) -> Vec<Folder> {
        element_children(parent, "Folder")
            .map(|node| Folder {
                name: child_text(node, "name").unwrap_or_else(|| UNTITLED_FOLDER.to_string()),
                description: child_text(node, "description"),
                placemarks: self.placemarks(node),
                folders: self.folders(node),
            })
            .collect()
    }

    fn placemark(&self, node: Node<'_, '_>) -> Option<Placemark> {
        let name = child_text(node, "name").unwrap_or_else(|| UNTITLED_PLACEMARK.to_string());

        let Some(geometry) = extract_geometry(node) else {
            tracing::warn!(placemark = %name, "No valid geometry found for placemark");
            return None;
        };

        let mut extra_properties = Properties::new();
        if self.options.extended_data {
            collect_extended_data(node, &mut extra_properties);
        }
        if self.options.keep_source_markup {
            extra_properties.insert(
                "originalElement".to_string(),
                self.source[node.range()].into(),
            );
        }

        Some(Placemark {
            id: node
                .attribute("id")
                .filter(|id| !id.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(generate_id),
            name,
            description: child_text(node, "description"),
            style_url: child_text(node, "styleUrl"),
            geometry,
            extra_properties,
        })
    }
}

/// Point, then LineString, then Polygon; the first one with coordinates wins.
fn extract_geometry(placemark: Node<'_, '_>) -> Option<Geometry> {
    let point = first_descendant(placemark, "Point")
        .and_then(|p| coordinates_of(p).into_iter().next())
        .map(Geometry::Point);
    if point.is_some() {
        return point;
    }

    let line = first_descendant(placemark, "LineString")
        .map(coordinates_of)
        .filter(|coords| !coords.is_empty())
        .map(Geometry::LineString);
    if line.is_some() {
        return line;
    }

    first_descendant(placemark, "Polygon")
        .and_then(|polygon| first_descendant(polygon, "outerBoundaryIs"))
        .and_then(|outer| first_descendant(outer, "LinearRing"))
        .map(coordinates_of)
        .filter(|coords| !coords.is_empty())
        .map(|ring| Geometry::Polygon(vec![ring]))
}

fn coordinates_of(geometry: Node<'_, '_>) -> Vec<fieldmap_geo::Coordinate> {
    first_descendant(geometry, "coordinates")
        .map(|node| parse_coordinates(&text_content(node)))
        .unwrap_or_default()
}

/// `<Data name="k"><value>v</value></Data>` and `<SimpleData name="k">v</SimpleData>`.
fn collect_extended_data(placemark: Node<'_, '_>, out: &mut Properties) {
    for extended in element_children(placemark, "ExtendedData") {
        for data in element_children(extended, "Data") {
            if let (Some(key), Some(value)) = (data.attribute("name"), child_text(data, "value")) {
                out.insert(key.to_string(), value.into());
            }
        }
        for schema in element_children(extended, "SchemaData") {
            for simple in element_children(schema, "SimpleData") {
                if let Some(key) = simple.attribute("name") {
                    out.insert(key.to_string(), text_content(simple).trim().into());
                }
            }
        }
    }
}

/// Identifier for placemarks without an `id` attribute. Unique per process,
/// not stable across parses.
fn generate_id() -> String {
    format!("placemark_{}", uuid::Uuid::new_v4().simple())
}

fn element_children<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent
        .children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

fn first_descendant<'a, 'input: 'a>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

/// Trimmed text of a direct child element; `None` when absent or blank.
fn child_text(parent: Node<'_, '_>, tag: &str) -> Option<String> {
    parent
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
        .map(|n| text_content(n).trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Concatenated text of all descendant text nodes (CDATA included).
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}
