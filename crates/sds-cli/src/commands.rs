//! Main commands enum and shared argument groups.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Subcommand};
use sds_axum::DEFAULT_PORT;
use sds_core::{Credentials, GeoPoint};

use crate::error::CliError;

/// Copernicus hub account, from flags or the environment.
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Copernicus hub user name
    #[arg(long, env = "SDS_COPERNICUS_USER")]
    pub username: Option<String>,
    /// Copernicus hub password
    #[arg(long, env = "SDS_COPERNICUS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl CredentialArgs {
    pub fn into_credentials(self) -> Result<Credentials, CliError> {
        match (self.username, self.password) {
            (Some(user), Some(password)) if !user.is_empty() => Ok(Credentials::new(user, password)),
            _ => Err(CliError::Arguments(
                "Copernicus credentials required: pass --username/--password or set \
                 SDS_COPERNICUS_USER/SDS_COPERNICUS_PASSWORD"
                    .to_string(),
            )),
        }
    }
}

/// Parse `lon,lat`.
pub fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lon, lat) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LON,LAT, got '{s}'"))?;
    let lon: f64 = lon.trim().parse().map_err(|_| format!("invalid longitude '{lon}'"))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude '{lat}'"))?;
    GeoPoint::checked(lon, lat).map_err(|e| e.to_string())
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show resolved paths for all data locations
    Paths,

    /// Download the Sentinel-2 tiling grid unless it is already present
    FetchGrid {
        /// Grid URL (defaults to SDS_GRID_URL or the ESA grid)
        #[arg(long)]
        url: Option<String>,
        /// Directory to store the grid in
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Run the HTTP service
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "SDS_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Grid file to serve
        #[arg(long)]
        grid: Option<PathBuf>,
        /// Allowed CORS origin (repeatable); all origins when omitted
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },

    /// Grid cells containing the given locations
    Cells {
        /// Locations as LON,LAT; put `--` before them when a longitude is negative
        #[arg(required = true, value_parser = parse_point)]
        points: Vec<GeoPoint>,
        /// List the cells of each location instead of the union
        #[arg(long)]
        map: bool,
        /// Print GeoJSON
        #[arg(long, conflicts_with = "map")]
        geojson: bool,
    },

    /// Show a single grid cell
    Cell {
        /// Cell name, e.g. 32UMA
        name: String,
        /// Print GeoJSON
        #[arg(long)]
        geojson: bool,
    },

    /// Request a Copernicus product and try to download it
    Request {
        /// Product id
        id: String,
        #[command(flatten)]
        credentials: CredentialArgs,
        /// Keep retrying until the product is settled
        #[arg(long)]
        wait: bool,
    },

    /// Show recorded product requests
    Status {
        /// Only this product id
        id: Option<String>,
    },

    /// Search Sentinel-2 Level-1C products
    #[command(group(ArgGroup::new("area").required(true).args(["cell", "point"])))]
    Search {
        /// Search products intersecting a grid cell
        #[arg(long)]
        cell: Option<String>,
        /// Search at a location given as LON,LAT
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        point: Option<GeoPoint>,
        /// Sensing start lower bound (RFC 3339)
        #[arg(long)]
        from: String,
        /// Sensing start upper bound (RFC 3339)
        #[arg(long)]
        to: String,
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Path of a downloaded product
    Product {
        /// Product id
        id: String,
        /// Extract the archive and print the .SAFE directory
        #[arg(long)]
        prepare: bool,
    },

    /// Band resolutions of a downloaded product
    Bands {
        /// Product id
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse() {
        assert_eq!(parse_point("7.5, 51").unwrap(), GeoPoint::new(7.5, 51.0));
        assert_eq!(parse_point("-3,-40").unwrap(), GeoPoint::new(-3.0, -40.0));
        assert!(parse_point("7.5").is_err());
        assert!(parse_point("x,1").is_err());
        assert!(parse_point("NaN,1").is_err());
    }

    #[test]
    fn missing_credentials_are_argument_errors() {
        let args = CredentialArgs {
            username: Some("alice".into()),
            password: None,
        };
        assert!(matches!(
            args.into_credentials(),
            Err(CliError::Arguments(_))
        ));
    }
}
