//! Domain types shared by every adapter.

pub mod bands;
pub mod geojson;
pub mod geometry;
pub mod grid;
pub mod product;

pub use bands::{SpectralResolutions, file_band_name, meta_band_name};
pub use geojson::{
    Feature, FeatureCollection, FeatureCollectionType, FeatureType, GeoJsonError, Geometry,
};
pub use geometry::{
    BoundingBox, Footprint, GeoPoint, GeometryError, Polygon, Ring, centroid_of, dedup_points,
};
pub use grid::{Grid, GridCell, LocationCells};
pub use product::{Credentials, ProductMetadata, ProductRequest, ProductSummary, QueryState};
