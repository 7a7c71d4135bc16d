//! In-memory archives for tests.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip `(name, content)` pairs into a KMZ-shaped byte buffer.
pub(crate) fn build_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

/// A KML document holding one placemark per `(name, geometry markup)` pair.
pub(crate) fn kml_document(placemarks: &[(&str, &str)]) -> String {
    let body: String = placemarks
        .iter()
        .map(|(name, geometry)| format!("<Placemark><name>{name}</name>{geometry}</Placemark>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><kml xmlns="http://www.opengis.net/kml/2.2"><Document><name>Fixture</name>{body}</Document></kml>"#
    )
}
