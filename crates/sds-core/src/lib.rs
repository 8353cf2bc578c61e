//! Core domain, ports and services of the satellite data service.
//!
//! Everything here is free of transport and storage details: adapters
//! (`sds-kml`, `sds-download`, `sds-copernicus`, `sds-scheduler`, `sds-axum`,
//! `sds-cli`) implement the ports and map the port errors to their surfaces.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;

pub use domain::{
    BoundingBox, Credentials, Feature, FeatureCollection, Footprint, GeoJsonError, GeoPoint,
    Geometry, GeometryError, Grid, GridCell, LocationCells, Polygon, ProductMetadata,
    ProductRequest, ProductSummary, QueryState, Ring, SpectralResolutions, file_band_name,
    meta_band_name,
};
pub use ports::{
    CatalogError, DownloadError, GridParseError, GridParserPort, ProductCatalogPort,
    ProgressCallback, RepositoryError, ResourceFetcher, Schedule, ScheduleRepository,
};
pub use services::{GridError, GridService};

pub use paths::{
    DirectoryCreationStrategy, PathError, ResolvedPaths, data_root, ensure_directory,
    grid_file_path, grid_url, products_dir, schedule_path, verify_writable,
};

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
