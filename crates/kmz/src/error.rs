//! Error types for the kmz crate.

use thiserror::Error;

/// Result type alias for kmz operations.
pub type Result<T> = std::result::Result<T, KmzError>;

/// Errors that abort a whole parse.
///
/// Problems local to one placemark or one coordinate group are not errors:
/// the offending element is dropped and parsing continues.
#[derive(Debug, Error)]
pub enum KmzError {
    /// The input is not a readable zip container
    #[error("Failed to open KMZ archive: {0}")]
    Archive(String),

    /// The archive holds no `.kml` entry
    #[error("No KML file found in KMZ archive")]
    NoMarkupFound,

    /// The markup entry is not well-formed XML
    #[error("Invalid XML content in KML file: {0}")]
    MalformedMarkup(String),

    /// Reading the input from disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error code for integration with fieldmap-core error handling.
/// Range: 11xxx for kmz errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KmzErrorCode {
    /// Archive could not be opened
    Archive = 11001,
    /// No markup entry in the archive
    NoMarkupFound = 11002,
    /// Markup is not well-formed
    MalformedMarkup = 11003,
    /// IO failure
    Io = 11004,
}

impl KmzError {
    /// Returns the error code for this error.
    pub fn code(&self) -> KmzErrorCode {
        match self {
            KmzError::Archive(_) => KmzErrorCode::Archive,
            KmzError::NoMarkupFound => KmzErrorCode::NoMarkupFound,
            KmzError::MalformedMarkup(_) => KmzErrorCode::MalformedMarkup,
            KmzError::Io(_) => KmzErrorCode::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(KmzError::Archive("x".into()).code() as u32, 11001);
        assert_eq!(KmzError::NoMarkupFound.code() as u32, 11002);
        assert_eq!(KmzError::MalformedMarkup("x".into()).code() as u32, 11003);
    }

    #[test]
    fn test_messages_are_human_readable() {
        let err = KmzError::Archive("invalid Zip archive".into());
        assert_eq!(err.to_string(), "Failed to open KMZ archive: invalid Zip archive");
        assert_eq!(KmzError::NoMarkupFound.to_string(), "No KML file found in KMZ archive");
    }
}
