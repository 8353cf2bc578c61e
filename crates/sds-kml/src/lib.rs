//! KML reader for the Sentinel-2 tiling grid.
//!
//! [`KmlGridParser`] implements [`GridParserPort`] from `sds-core`.
#![deny(unused_crate_dependencies)]

mod coordinates;
mod error;
mod parser;

/// The KML parser implementation.
pub use parser::KmlGridParser;

// Re-export domain types and port from core for convenience
pub use sds_core::{Grid, GridCell, GridParseError, GridParserPort};

#[cfg(test)]
use tempfile as _;
