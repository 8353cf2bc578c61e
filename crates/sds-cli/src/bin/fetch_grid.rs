//! Fetch the Sentinel-2 tiling grid into the data directory.
//!
//! Takes no flags; the location and URL come from `SDS_DATA_DIR` and
//! `SDS_GRID_URL`. Exits non-zero when the grid cannot be fetched.

use sds_cli::{handlers, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging(false);

    if let Err(e) = handlers::fetch_grid::execute(None, None).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
    Ok(())
}
