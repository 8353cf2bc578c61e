//! Planar geometry on WGS84 longitude/latitude pairs.
//!
//! Grid tiles are small enough that treating degrees as planar coordinates
//! gives the same containment answers as the reference tooling. Tiles that
//! cross the antimeridian are published as separate polygons per side, so no
//! wrap-around handling is needed here.

use std::collections::HashSet;
use std::fmt::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance used when deciding whether a point lies on a ring edge.
const EDGE_EPSILON: f64 = 1e-12;

/// Errors raised while constructing geometry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// A ring needs at least three distinct vertices.
    #[error("Ring has {0} distinct vertices, at least 3 are required")]
    DegenerateRing(usize),

    /// A coordinate was NaN or infinite.
    #[error("Coordinate is not a finite number")]
    NonFiniteCoordinate,
}

/// A location as (longitude, latitude) in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Build a point, rejecting NaN and infinities.
    pub fn checked(lon: f64, lat: f64) -> Result<Self, GeometryError> {
        if lon.is_finite() && lat.is_finite() {
            Ok(Self { lon, lat })
        } else {
            Err(GeometryError::NonFiniteCoordinate)
        }
    }

    /// Bit-exact identity used for de-duplication (`-0.0` and `0.0` are equal).
    fn identity(self) -> (u64, u64) {
        ((self.lon + 0.0).to_bits(), (self.lat + 0.0).to_bits())
    }

    /// Well-known-text representation, e.g. `POINT(7.1 51.4)`.
    pub fn to_wkt(&self) -> String {
        format!("POINT({} {})", self.lon, self.lat)
    }
}

/// Drop repeated points while keeping the order of first occurrence.
pub fn dedup_points<I>(points: I) -> Vec<GeoPoint>
where
    I: IntoIterator<Item = GeoPoint>,
{
    let mut seen = HashSet::new();
    points
        .into_iter()
        .filter(|p| seen.insert(p.identity()))
        .collect()
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    fn around(points: &[GeoPoint]) -> Self {
        let mut bbox = Self {
            min_lon: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
        };
        for p in points {
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lon = bbox.max_lon.max(p.lon);
            bbox.max_lat = bbox.max_lat.max(p.lat);
        }
        bbox
    }

    /// Smallest box covering both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    /// Inclusive containment test, used as a cheap prefilter.
    pub fn covers(&self, p: &GeoPoint) -> bool {
        p.lon >= self.min_lon && p.lon <= self.max_lon && p.lat >= self.min_lat && p.lat <= self.max_lat
    }
}

/// A closed linear ring. The closing vertex is stored explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<GeoPoint>,
}

impl Ring {
    /// Build a ring, closing it if the last vertex differs from the first.
    pub fn new(mut points: Vec<GeoPoint>) -> Result<Self, GeometryError> {
        if points.iter().any(|p| !p.lon.is_finite() || !p.lat.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate);
        }
        let distinct = dedup_points(points.iter().copied()).len();
        if distinct < 3 {
            return Err(GeometryError::DegenerateRing(distinct));
        }
        if points.first() != points.last() {
            points.push(points[0]);
        }
        Ok(Self { points })
    }

    /// Vertices including the closing one.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    fn edges(&self) -> impl Iterator<Item = (&GeoPoint, &GeoPoint)> {
        self.points.iter().zip(self.points.iter().skip(1))
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::around(&self.points)
    }

    /// True if `p` lies on one of the ring's edges.
    pub fn touches(&self, p: &GeoPoint) -> bool {
        self.edges().any(|(a, b)| on_segment(a, b, p))
    }

    /// Even-odd ray casting. Boundary points give an unspecified answer; use
    /// [`Ring::touches`] first when that matters.
    fn winds_around(&self, p: &GeoPoint) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.lat > p.lat) != (b.lat > p.lat) {
                let x = a.lon + (p.lat - a.lat) * (b.lon - a.lon) / (b.lat - a.lat);
                if p.lon < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Signed area (shoelace) and first moments, for centroid computation.
    fn area_moments(&self) -> (f64, f64, f64) {
        let mut area = 0.0;
        let mut mx = 0.0;
        let mut my = 0.0;
        for (a, b) in self.edges() {
            let cross = a.lon * b.lat - b.lon * a.lat;
            area += cross;
            mx += (a.lon + b.lon) * cross;
            my += (a.lat + b.lat) * cross;
        }
        (area / 2.0, mx / 6.0, my / 6.0)
    }

    fn vertex_mean(&self) -> GeoPoint {
        // closing vertex excluded so it is not counted twice
        let open = &self.points[..self.points.len() - 1];
        #[allow(clippy::cast_precision_loss)]
        let n = open.len() as f64;
        GeoPoint::new(
            open.iter().map(|p| p.lon).sum::<f64>() / n,
            open.iter().map(|p| p.lat).sum::<f64>() / n,
        )
    }

    fn write_wkt(&self, out: &mut String) {
        out.push('(');
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{} {}", p.lon, p.lat);
        }
        out.push(')');
    }
}

fn on_segment(a: &GeoPoint, b: &GeoPoint, p: &GeoPoint) -> bool {
    let cross = (b.lon - a.lon) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lon - a.lon);
    let scale = (b.lon - a.lon).abs().max((b.lat - a.lat).abs()).max(1.0);
    if cross.abs() > EDGE_EPSILON * scale {
        return false;
    }
    p.lon >= a.lon.min(b.lon) - EDGE_EPSILON
        && p.lon <= a.lon.max(b.lon) + EDGE_EPSILON
        && p.lat >= a.lat.min(b.lat) - EDGE_EPSILON
        && p.lat <= a.lat.max(b.lat) + EDGE_EPSILON
}

/// A polygon with one exterior ring and optional holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Ring,
    holes: Vec<Ring>,
}

impl Polygon {
    pub const fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    pub const fn exterior(&self) -> &Ring {
        &self.exterior
    }

    pub fn holes(&self) -> &[Ring] {
        &self.holes
    }

    pub fn bbox(&self) -> BoundingBox {
        self.exterior.bbox()
    }

    /// Strict interior containment: boundary points (of the exterior or of a
    /// hole) are not contained, neither are points inside a hole.
    pub fn contains(&self, p: &GeoPoint) -> bool {
        if self.exterior.touches(p) || !self.exterior.winds_around(p) {
            return false;
        }
        !self
            .holes
            .iter()
            .any(|hole| hole.touches(p) || hole.winds_around(p))
    }

    /// Unsigned area (exterior minus holes), in square degrees.
    pub fn area(&self) -> f64 {
        self.area_moments().0
    }

    /// Unsigned area and first moments with holes subtracted.
    fn area_moments(&self) -> (f64, f64, f64) {
        let oriented = |ring: &Ring| {
            let (a, mx, my) = ring.area_moments();
            if a < 0.0 { (-a, -mx, -my) } else { (a, mx, my) }
        };
        let (mut area, mut mx, mut my) = oriented(&self.exterior);
        for hole in &self.holes {
            let (ha, hx, hy) = oriented(hole);
            area -= ha;
            mx -= hx;
            my -= hy;
        }
        (area, mx, my)
    }

    /// Area-weighted centroid.
    pub fn centroid(&self) -> GeoPoint {
        centroid_of(std::slice::from_ref(self))
    }

    /// Well-known-text representation.
    pub fn to_wkt(&self) -> String {
        let mut out = String::from("POLYGON(");
        self.exterior.write_wkt(&mut out);
        for hole in &self.holes {
            out.push_str(", ");
            hole.write_wkt(&mut out);
        }
        out.push(')');
        out
    }
}

/// Area-weighted centroid of several polygons.
///
/// Falls back to the mean of the exterior vertices when the total area is zero.
pub fn centroid_of(polygons: &[Polygon]) -> GeoPoint {
    let (mut area, mut mx, mut my) = (0.0, 0.0, 0.0);
    for polygon in polygons {
        let (a, x, y) = polygon.area_moments();
        area += a;
        mx += x;
        my += y;
    }
    if area.abs() < f64::EPSILON {
        #[allow(clippy::cast_precision_loss)]
        let n = polygons.len().max(1) as f64;
        let (lon, lat) = polygons
            .iter()
            .map(|p| p.exterior.vertex_mean())
            .fold((0.0, 0.0), |(lon, lat), c| (lon + c.lon, lat + c.lat));
        return GeoPoint::new(lon / n, lat / n);
    }
    GeoPoint::new(mx / area, my / area)
}

/// Search area for catalogue queries.
#[derive(Debug, Clone, PartialEq)]
pub enum Footprint {
    Point(GeoPoint),
    Polygon(Polygon),
}

impl Footprint {
    pub fn to_wkt(&self) -> String {
        match self {
            Self::Point(p) => p.to_wkt(),
            Self::Polygon(p) => p.to_wkt(),
        }
    }
}
