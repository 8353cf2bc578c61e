//! Copernicus product commands.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sds_core::{Footprint, GeoPoint, GridCell, GridService, QueryState, file_band_name};
use tracing::info;

use crate::bootstrap::CliContext;
use crate::commands::CredentialArgs;
use crate::error::CliError;
use crate::presentation::{format_optional, print_separator, truncate_string};

const WAIT_POLL: Duration = Duration::from_secs(1);

/// Request a product, optionally staying alive while it is retried.
pub async fn request(
    ctx: &CliContext,
    id: &str,
    credentials: CredentialArgs,
    wait: bool,
) -> Result<(), CliError> {
    let credentials = credentials.into_credentials()?;
    let mut state = ctx.scheduler.request(id, &credentials).await?;

    if wait && state.should_download() {
        info!(id, interval = ?ctx.scheduler.config().retry_interval, "Waiting for retries, Ctrl-C to stop");
        while state.should_download() && ctx.scheduler.has_retry_job(id).await {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                () = tokio::time::sleep(WAIT_POLL) => {}
            }
            state = ctx.scheduler.state(id).await?;
        }
    }
    ctx.scheduler.shutdown().await;

    println!("{id}\t{state}");
    if state == QueryState::Invalid {
        return Err(CliError::Unavailable(format!("Unknown product id {id}")));
    }
    Ok(())
}

/// List recorded requests.
pub async fn status(ctx: &CliContext, id: Option<&str>) -> Result<(), CliError> {
    if let Some(id) = id {
        println!("{id}\t{}", ctx.scheduler.state(id).await?);
        return Ok(());
    }

    let requests = ctx.scheduler.requests().await;
    if requests.is_empty() {
        println!("No product requests recorded.");
        return Ok(());
    }

    println!("{:<36}  {:<11}  {:<20}  TITLE", "ID", "STATE", "LAST QUERY");
    print_separator(110);
    for request in requests {
        let last_query = request
            .last_query
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string());
        println!(
            "{:<36}  {:<11}  {:<20}  {}",
            request.id,
            request.state,
            format_optional(last_query.as_ref(), "never"),
            truncate_string(&request.title, 60)
        );
    }
    Ok(())
}

fn parse_time(field: &str, value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::Arguments(format!("{field}: {e}")))
}

/// Search products intersecting a grid cell or covering a point.
pub async fn search(
    ctx: &CliContext,
    grid: &GridService,
    cell: Option<&str>,
    point: Option<GeoPoint>,
    from: &str,
    to: &str,
    credentials: CredentialArgs,
) -> Result<(), CliError> {
    let from = parse_time("--from", from)?;
    let to = parse_time("--to", to)?;
    if from > to {
        return Err(CliError::Arguments("--from must not be after --to".to_string()));
    }
    let credentials = credentials.into_credentials()?;

    let footprint = match (cell, point) {
        (Some(name), _) => cell_footprint(&grid.cell(name).await?),
        (None, Some(point)) => Footprint::Point(point),
        (None, None) => {
            return Err(CliError::Arguments("--cell or --point is required".to_string()));
        }
    };

    let products = ctx
        .catalog
        .search(&footprint, from, to, &credentials)
        .await?;

    println!("{:<36}  {:<20}  {:>6}  TITLE", "ID", "SENSING START", "CLOUD");
    print_separator(130);
    for product in &products {
        let sensing = product
            .sensing_start
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string());
        let cloud = product.cloud_cover.map(|c| format!("{c:.1}"));
        println!(
            "{:<36}  {:<20}  {:>6}  {}",
            product.id,
            format_optional(sensing.as_ref(), "-"),
            format_optional(cloud.as_ref(), "-"),
            product.title
        );
    }
    println!("{} products", products.len());
    Ok(())
}

/// The cell's polygon, or its centroid when the cell is split into several.
fn cell_footprint(cell: &GridCell) -> Footprint {
    match cell.polygons() {
        [polygon] => Footprint::Polygon(polygon.clone()),
        _ => Footprint::Point(cell.centroid()),
    }
}

/// Print the archive path, or the extracted `.SAFE` directory.
pub async fn product(ctx: &CliContext, id: &str, prepare: bool) -> Result<(), CliError> {
    let path = if prepare {
        ctx.scheduler.prepare_product(id).await?
    } else {
        ctx.scheduler.raw_product_path(id).await?
    };
    println!("{}", path.display());
    Ok(())
}

/// Print the spectral resolution of every band.
pub async fn bands(ctx: &CliContext, id: &str) -> Result<(), CliError> {
    println!("{:<6}  {:<6}  RESOLUTION", "BAND", "FILE");
    for (band, metres) in ctx.scheduler.product_bands(id).await? {
        println!("{band:<6}  {:<6}  {metres} m", file_band_name(&band));
    }
    Ok(())
}
