//! Grid handlers - cells containing locations.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use sds_core::{Feature, FeatureCollection, LocationCells};
use tracing::{debug, info};

use crate::dto::parse_locations;
use crate::error::HttpError;
use crate::state::AppState;

/// Cells containing any of the posted locations, as GeoJSON.
pub async fn query_containing_geometry(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FeatureCollection>, HttpError> {
    info!("Querying for geometry");
    let locations = parse_locations(&body)?;
    debug!(locations = locations.len(), "Parsed locations");

    let cells = state.grid.select_containing_cells(&locations).await?;
    info!(cells = cells.len(), "Query for geometry complete");
    Ok(Json(FeatureCollection::from_cells(&cells)))
}

/// Names of the cells containing each posted location.
pub async fn map_locations(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<LocationCells>>, HttpError> {
    let locations = parse_locations(&body)?;
    Ok(Json(state.grid.map_locations_to_cell_names(&locations).await?))
}

/// A single cell by name.
pub async fn cell(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Feature>, HttpError> {
    let cell = state.grid.cell(&name).await?;
    Ok(Json(Feature::from_cell(&cell)))
}
