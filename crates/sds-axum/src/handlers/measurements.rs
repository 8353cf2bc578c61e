//! Measurement handlers.

use axum::body::Bytes;
use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use tracing::info;

use crate::dto::{MeasurementQuery, parse_locations};
use crate::error::HttpError;

/// Validates the request; measurement data is not served yet.
pub async fn query_measurements(
    query: Result<Query<MeasurementQuery>, QueryRejection>,
    body: Bytes,
) -> Result<(), HttpError> {
    let Query(query) = query.map_err(|e| HttpError::BadRequest(e.body_text()))?;
    let range = query.time_range()?;
    let locations = parse_locations(&body)?;
    info!(
        from = %range.from,
        to = %range.to,
        locations = locations.len(),
        "Querying for measurements"
    );
    Err(HttpError::NotImplemented(
        "Data access is not available yet!".to_string(),
    ))
}
