//! CLI entry point - the composition root.

use clap::{CommandFactory, Parser};

use sds_cli::{Cli, CliContext, CliError, Commands, bootstrap, handlers, init_logging};

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Paths => handlers::paths::execute(),
        Commands::FetchGrid { url, dir } => handlers::fetch_grid::execute(url, dir)
            .await
            .map(|_| ()),
        Commands::Serve {
            port,
            grid,
            allowed_origins,
        } => handlers::serve::execute(port, grid, allowed_origins).await,
        Commands::Cells {
            points,
            map,
            geojson,
        } => {
            let grid = bootstrap::grid_service(None)?;
            handlers::cells::cells(&grid, &points, map, geojson).await
        }
        Commands::Cell { name, geojson } => {
            let grid = bootstrap::grid_service(None)?;
            handlers::cells::cell(&grid, &name, geojson).await
        }
        Commands::Request {
            id,
            credentials,
            wait,
        } => {
            let ctx = CliContext::open().await?;
            handlers::products::request(&ctx, &id, credentials, wait).await
        }
        Commands::Status { id } => {
            let ctx = CliContext::open().await?;
            handlers::products::status(&ctx, id.as_deref()).await
        }
        Commands::Search {
            cell,
            point,
            from,
            to,
            credentials,
        } => {
            let ctx = CliContext::open().await?;
            let grid = bootstrap::grid_service(None)?;
            handlers::products::search(
                &ctx,
                &grid,
                cell.as_deref(),
                point,
                &from,
                &to,
                credentials,
            )
            .await
        }
        Commands::Product { id, prepare } => {
            let ctx = CliContext::open().await?;
            handlers::products::product(&ctx, &id, prepare).await
        }
        Commands::Bands { id } => {
            let ctx = CliContext::open().await?;
            handlers::products::bands(&ctx, &id).await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Err(e) = run(command).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
    Ok(())
}
