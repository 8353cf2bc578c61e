//! Internal error types for KML parsing.
//!
//! They convert to `GridParseError` from `sds-core` for the port API.

use std::io;

use sds_core::GridParseError;

/// Internal errors that can occur during KML parsing.
#[derive(Debug)]
pub enum KmlInternalError {
    /// The file does not exist.
    FileNotFound(String),

    /// An I/O error occurred while reading the file.
    Io(io::Error),

    /// The document is not well-formed XML.
    Xml { position: u64, message: String },

    /// A coordinate tuple could not be read.
    Coordinates { placemark: String, tuple: String },

    /// The document ended inside a placemark.
    Truncated,

    /// The document has no placemark with a polygon.
    NoCells,
}

impl std::fmt::Display for KmlInternalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "File not found: {path}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Xml { position, message } => {
                write!(f, "Malformed XML at byte {position}: {message}")
            }
            Self::Coordinates { placemark, tuple } => {
                write!(f, "Invalid coordinate tuple '{tuple}' in placemark '{placemark}'")
            }
            Self::Truncated => write!(f, "Document ended inside a placemark"),
            Self::NoCells => write!(f, "Document contains no placemark with a polygon"),
        }
    }
}

impl std::error::Error for KmlInternalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Convert internal errors to the domain-facing port error.
impl From<KmlInternalError> for GridParseError {
    fn from(err: KmlInternalError) -> Self {
        match err {
            KmlInternalError::FileNotFound(path) => Self::NotFound(path),
            KmlInternalError::Io(e) => Self::Io(e.to_string()),
            other => Self::InvalidFormat(other.to_string()),
        }
    }
}

/// Result type for internal KML operations.
pub type KmlResult<T> = Result<T, KmlInternalError>;
