//! KMZ container handling.
//!
//! A KMZ file is a zip archive holding one primary KML document (by
//! convention `doc.kml`) plus optional icons, overlays and models.

use crate::error::{KmzError, Result};
use crate::model::{EmbeddedResource, ResourceKind};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Conventional name of the primary markup entry.
const PRIMARY_ENTRY: &str = "doc.kml";

/// Markup extracted from an archive, with its entry name and the other entries.
#[derive(Debug, Clone)]
pub struct ExtractedMarkup {
    /// Name of the selected entry inside the archive
    pub entry_name: String,
    /// Decoded entry text
    pub text: String,
    /// Every other file entry
    pub resources: Vec<EmbeddedResource>,
}

/// Open an in-memory KMZ archive and read its primary KML entry.
///
/// An entry named `doc.kml` wins; otherwise the first entry with a `.kml`
/// extension is used. Directory entries are ignored.
///
/// # Errors
///
/// Returns [`KmzError::Archive`] if the bytes are not a readable zip archive
/// and [`KmzError::NoMarkupFound`] if it contains no `.kml` entry.
pub fn extract_markup(bytes: &[u8]) -> Result<ExtractedMarkup> {
    let mut zip = ZipArchive::new(Cursor::new(bytes)).map_err(|e| KmzError::Archive(e.to_string()))?;

    let mut entries = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let file = zip
            .by_index(i)
            .map_err(|e| KmzError::Archive(format!("Failed to read archive entry: {e}")))?;
        if file.is_dir() {
            continue;
        }
        entries.push((i, file.name().to_string(), file.size()));
    }

    let selected = entries
        .iter()
        .position(|(_, name, _)| name.eq_ignore_ascii_case(PRIMARY_ENTRY))
        .or_else(|| entries.iter().position(|(_, name, _)| is_markup(name)))
        .ok_or(KmzError::NoMarkupFound)?;

    let (index, entry_name, _) = entries.remove(selected);
    tracing::debug!(entry = %entry_name, entries = entries.len() + 1, "Selected KML entry");

    let mut buf = Vec::new();
    zip.by_index(index)
        .and_then(|mut file| file.read_to_end(&mut buf).map_err(Into::into))
        .map_err(|e| KmzError::Archive(format!("Failed to read KML from KMZ: {e}")))?;

    let resources = entries
        .into_iter()
        .map(|(_, path, size)| {
            let kind = ResourceKind::from_path(&path);
            EmbeddedResource { path, size, kind }
        })
        .collect();

    Ok(ExtractedMarkup {
        entry_name,
        text: decode_text(&buf),
        resources,
    })
}

/// Whether an entry name carries the `.kml` extension.
fn is_markup(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("kml"))
}

/// Decode entry bytes as UTF-8, replacing invalid sequences and dropping a BOM.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}
