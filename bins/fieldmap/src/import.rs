//! Reading archives from disk with the configured parse options

use fieldmap_cli::output::Status;
use fieldmap_cli::progress;
use fieldmap_core::config::Config;
use fieldmap_core::{Error, ErrorCode, ResultExt};
use fieldmap_kmz::{parse_path, ArchiveDocument, KmzError, KmzErrorCode, ParseOptions};
use fieldmap_telemetry::metrics;
use std::path::Path;

/// Parse a `.kmz` archive or `.kml` file
///
/// `interactive` shows a spinner on stderr while the archive is read.
pub fn load(path: &Path, config: &Config, interactive: bool) -> fieldmap_core::Result<ArchiveDocument> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    let options = ParseOptions {
        keep_source_markup: config.schema.parse.keep_source_markup,
        extended_data: config.schema.parse.extended_data,
    };

    let spinner = if interactive {
        progress::spinner(&format!("Reading {}", path.display()))
    } else {
        progress::hidden()
    };

    let parsed = {
        fieldmap_telemetry::timed_span!("import", path = %path.display());
        parse_path(path, &options)
    };

    match parsed {
        Ok(doc) => {
            if interactive {
                progress::finish_success(&spinner, &format!("Read {}", path.display()));
                if doc.placemark_count() == 0 {
                    Status::warning("No placemarks with usable geometry found");
                }
            }
            metrics().increment("archives_imported");
            metrics().increment_by("placemarks_imported", doc.placemark_count() as u64);
            tracing::debug!(
                name = %doc.name,
                placemarks = doc.placemark_count(),
                folders = doc.folders.len(),
                resources = doc.resources.len(),
                "Imported archive"
            );
            Ok(doc)
        }
        Err(e) => {
            progress::finish_error(&spinner);
            metrics().increment("import_failures");
            Err(import_error(e)).context(format!("While importing {}", path.display()))
        }
    }
}

/// Lift a parser error into the host error type
pub fn import_error(err: KmzError) -> Error {
    let code = match err.code() {
        KmzErrorCode::Archive => ErrorCode::InvalidArchive,
        KmzErrorCode::NoMarkupFound => ErrorCode::NoMarkupFound,
        KmzErrorCode::MalformedMarkup => ErrorCode::MalformedMarkup,
        KmzErrorCode::Io => {
            return match err {
                KmzError::Io(io) => Error::from(io),
                other => Error::io(other.to_string()),
            };
        }
    };
    Error::import(code, err.to_string()).with_source(err)
}
