//! The GeoJSON subset spoken by the HTTP service.
//!
//! Requests carry location points; responses carry grid cells as polygons.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::geometry::{GeoPoint, Polygon, Ring};
use super::grid::GridCell;

/// `[longitude, latitude]` with an optional trailing altitude.
pub type Position = Vec<f64>;

/// Errors raised when extracting domain values from GeoJSON.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeoJsonError {
    /// A feature has `"geometry": null`.
    #[error("Feature {index} has no geometry")]
    MissingGeometry { index: usize },

    /// A feature's geometry is not made of points.
    #[error("Feature {index} has geometry of type {kind}, only Point and MultiPoint are supported")]
    UnsupportedGeometry { index: usize, kind: &'static str },

    /// A position has fewer than two elements or a non-finite number.
    #[error("Feature {index} has an invalid position")]
    InvalidPosition { index: usize },
}

/// GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

impl Geometry {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Point { .. } => "Point",
            Self::MultiPoint { .. } => "MultiPoint",
            Self::Polygon { .. } => "Polygon",
            Self::MultiPolygon { .. } => "MultiPolygon",
        }
    }

    /// `Polygon` for a single polygon, `MultiPolygon` otherwise.
    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        match polygons {
            [single] => Self::Polygon {
                coordinates: polygon_rings(single),
            },
            many => Self::MultiPolygon {
                coordinates: many.iter().map(polygon_rings).collect(),
            },
        }
    }
}

fn ring_positions(ring: &Ring) -> Vec<Position> {
    ring.points().iter().map(|p| vec![p.lon, p.lat]).collect()
}

fn polygon_rings(polygon: &Polygon) -> Vec<Vec<Position>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.holes())
        .map(ring_positions)
        .collect()
}

fn to_point(position: &[f64], index: usize) -> Result<GeoPoint, GeoJsonError> {
    match position {
        [lon, lat, ..] => {
            GeoPoint::checked(*lon, *lat).map_err(|_| GeoJsonError::InvalidPosition { index })
        }
        _ => Err(GeoJsonError::InvalidPosition { index }),
    }
}

/// The `"type"` member of a [`Feature`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

/// The `"type"` member of a [`FeatureCollection`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
    #[default]
    FeatureCollection,
}

/// GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl Feature {
    /// A grid cell as an id-less feature with `Name` and `Description` properties.
    pub fn from_cell(cell: &GridCell) -> Self {
        let mut properties = Map::new();
        properties.insert("Name".to_string(), Value::String(cell.name().to_string()));
        properties.insert(
            "Description".to_string(),
            Value::String(cell.description().to_string()),
        );
        Self {
            kind: FeatureType::Feature,
            id: None,
            geometry: Some(Geometry::from_polygons(cell.polygons())),
            properties: Some(properties),
        }
    }
}

/// GeoJSON feature collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: FeatureCollectionType,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a GridCell>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features: cells.into_iter().map(Feature::from_cell).collect(),
        }
    }

    /// All points of all features, in order. Duplicates are kept.
    pub fn points(&self) -> Result<Vec<GeoPoint>, GeoJsonError> {
        let mut points = Vec::with_capacity(self.features.len());
        for (index, feature) in self.features.iter().enumerate() {
            match &feature.geometry {
                None => return Err(GeoJsonError::MissingGeometry { index }),
                Some(Geometry::Point { coordinates }) => {
                    points.push(to_point(coordinates, index)?);
                }
                Some(Geometry::MultiPoint { coordinates }) => {
                    for position in coordinates {
                        points.push(to_point(position, index)?);
                    }
                }
                Some(other) => {
                    return Err(GeoJsonError::UnsupportedGeometry {
                        index,
                        kind: other.kind(),
                    });
                }
            }
        }
        Ok(points)
    }
}
