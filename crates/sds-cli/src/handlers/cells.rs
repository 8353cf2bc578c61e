//! Grid cell lookups.

use sds_core::{Feature, FeatureCollection, GeoPoint, GridService};

use crate::error::CliError;

fn print_json(value: &impl serde::Serialize) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::Core(e.to_string()))?;
    println!("{json}");
    Ok(())
}

/// Cells containing `points`: the union, per-location lists, or GeoJSON.
pub async fn cells(
    grid: &GridService,
    points: &[GeoPoint],
    map: bool,
    geojson: bool,
) -> Result<(), CliError> {
    if map {
        for location in grid.map_locations_to_cell_names(points).await? {
            let names = if location.cells.is_empty() {
                "-".to_string()
            } else {
                location.cells.join(" ")
            };
            println!("{},{}\t{names}", location.longitude, location.latitude);
        }
        return Ok(());
    }

    let cells = grid.select_containing_cells(points).await?;
    if geojson {
        return print_json(&FeatureCollection::from_cells(&cells));
    }
    for cell in &cells {
        println!("{}", cell.name());
    }
    Ok(())
}

/// One cell with its centroid and bounds.
pub async fn cell(grid: &GridService, name: &str, geojson: bool) -> Result<(), CliError> {
    let cell = grid.cell(name).await?;
    if geojson {
        return print_json(&Feature::from_cell(&cell));
    }

    let centroid = cell.centroid();
    let bbox = cell.bbox();
    println!("Name:        {}", cell.name());
    println!("Polygons:    {}", cell.polygons().len());
    println!("Centroid:    {:.6},{:.6}", centroid.lon, centroid.lat);
    println!(
        "Bounds:      {:.6},{:.6} .. {:.6},{:.6}",
        bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat
    );
    println!("Description: {}", cell.description());
    Ok(())
}
