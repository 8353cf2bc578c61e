//! Sentinel-2 tiling grid.
//!
//! The grid is a list of named cells (tiles such as `32UMA`), each covering a
//! part of the planet with one or more polygons.

use std::collections::HashMap;

use serde::Serialize;

use super::geometry::{BoundingBox, GeoPoint, Polygon, centroid_of, dedup_points};

/// One tile of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    name: String,
    description: String,
    polygons: Vec<Polygon>,
    bbox: BoundingBox,
}

impl GridCell {
    /// Build a cell. Returns `None` when no polygon is given.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        polygons: Vec<Polygon>,
    ) -> Option<Self> {
        let bbox = polygons
            .iter()
            .map(Polygon::bbox)
            .reduce(|a, b| a.union(&b))?;
        Some(Self {
            name: name.into(),
            description: description.into(),
            polygons,
            bbox,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub const fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// True when any of the cell's polygons strictly contains `p`.
    pub fn contains(&self, p: &GeoPoint) -> bool {
        self.bbox.covers(p) && self.polygons.iter().any(|polygon| polygon.contains(p))
    }

    /// Area-weighted centroid over all polygons.
    pub fn centroid(&self) -> GeoPoint {
        centroid_of(&self.polygons)
    }
}

/// The cells containing one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationCells {
    pub longitude: f64,
    pub latitude: f64,
    pub cells: Vec<String>,
}

/// The full tiling grid, in source order.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    cells: Vec<GridCell>,
    by_name: HashMap<String, usize>,
}

impl Grid {
    /// Build a grid. When names repeat, lookups by name return the first cell.
    pub fn new(cells: Vec<GridCell>) -> Self {
        let mut by_name = HashMap::with_capacity(cells.len());
        for (index, cell) in cells.iter().enumerate() {
            by_name.entry(cell.name.clone()).or_insert(index);
        }
        Self { cells, by_name }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Look up a cell by its name.
    pub fn cell(&self, name: &str) -> Option<&GridCell> {
        self.by_name.get(name).map(|&index| &self.cells[index])
    }

    /// Cells containing at least one of the locations, in grid order.
    ///
    /// Every cell is checked against every distinct location, so the cost
    /// grows with both; the bounding-box prefilter keeps it cheap in practice.
    pub fn select_containing(&self, locations: &[GeoPoint]) -> Vec<&GridCell> {
        let locations = dedup_points(locations.iter().copied());
        self.cells
            .iter()
            .filter(|cell| locations.iter().any(|p| cell.contains(p)))
            .collect()
    }

    /// For each distinct location, the names of all cells containing it.
    pub fn map_locations(&self, locations: &[GeoPoint]) -> Vec<LocationCells> {
        dedup_points(locations.iter().copied())
            .into_iter()
            .map(|p| LocationCells {
                longitude: p.lon,
                latitude: p.lat,
                cells: self
                    .cells
                    .iter()
                    .filter(|cell| cell.contains(&p))
                    .map(|cell| cell.name.clone())
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Ring;

    fn rect(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Polygon {
        Polygon::new(
            Ring::new(vec![
                GeoPoint::new(min_lon, min_lat),
                GeoPoint::new(max_lon, min_lat),
                GeoPoint::new(max_lon, max_lat),
                GeoPoint::new(min_lon, max_lat),
            ])
            .unwrap(),
            vec![],
        )
    }

    /// Three overlapping tiles plus one split across the antimeridian.
    fn sample_grid() -> Grid {
        Grid::new(vec![
            GridCell::new("32UMA", "a", vec![rect(6.0, 50.0, 8.0, 52.0)]).unwrap(),
            GridCell::new("32UNA", "b", vec![rect(7.5, 50.0, 9.5, 52.0)]).unwrap(),
            GridCell::new("33UUP", "c", vec![rect(20.0, 50.0, 22.0, 52.0)]).unwrap(),
            GridCell::new(
                "01CCV",
                "d",
                vec![rect(179.0, -60.0, 180.0, -59.0), rect(-180.0, -60.0, -179.0, -59.0)],
            )
            .unwrap(),
        ])
    }

    #[test]
    fn cell_without_polygons_is_rejected() {
        assert!(GridCell::new("X", "", vec![]).is_none());
    }

    #[test]
    fn lookup_by_name() {
        let grid = sample_grid();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.cell("33UUP").unwrap().description(), "c");
        assert!(grid.cell("99ZZZ").is_none());
    }

    #[test]
    fn select_keeps_grid_order_without_duplicates() {
        let grid = sample_grid();
        let locations = [
            GeoPoint::new(21.0, 51.0),
            GeoPoint::new(7.8, 51.0), // inside both 32UMA and 32UNA
            GeoPoint::new(7.8, 51.0),
        ];

        let names: Vec<_> = grid
            .select_containing(&locations)
            .iter()
            .map(|c| c.name())
            .collect();

        assert_eq!(names, vec!["32UMA", "32UNA", "33UUP"]);
    }

    #[test]
    fn select_with_no_hits_is_empty() {
        let grid = sample_grid();
        assert!(grid.select_containing(&[GeoPoint::new(0.0, 0.0)]).is_empty());
        assert!(grid.select_containing(&[]).is_empty());
    }

    #[test]
    fn split_cell_matches_on_both_sides() {
        let grid = sample_grid();
        let east = grid.select_containing(&[GeoPoint::new(179.5, -59.5)]);
        let west = grid.select_containing(&[GeoPoint::new(-179.5, -59.5)]);
        assert_eq!(east[0].name(), "01CCV");
        assert_eq!(west[0].name(), "01CCV");
    }

    #[test]
    fn map_locations_lists_every_containing_cell() {
        let grid = sample_grid();
        let mapping = grid.map_locations(&[
            GeoPoint::new(7.8, 51.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(7.8, 51.0),
        ]);

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping[0].cells, vec!["32UMA", "32UNA"]);
        assert!(mapping[1].cells.is_empty());
    }

    #[test]
    fn centroid_of_split_cell_uses_both_parts() {
        let grid = sample_grid();
        let c = grid.cell("01CCV").unwrap().centroid();
        assert!((c.lat + 59.5).abs() < 1e-9);
    }
}
