//! KML `<coordinates>` text.
//!
//! Tuples are `lon,lat[,alt]`, separated by whitespace. Altitude is dropped.

use sds_core::GeoPoint;

/// Parse a coordinate list. On failure returns the offending tuple.
pub fn parse_coordinates(text: &str) -> Result<Vec<GeoPoint>, String> {
    text.split_whitespace().map(parse_tuple).collect()
}

fn parse_tuple(tuple: &str) -> Result<GeoPoint, String> {
    let mut parts = tuple.split(',');
    let (Some(lon), Some(lat)) = (parts.next(), parts.next()) else {
        return Err(tuple.to_string());
    };
    if let Some(alt) = parts.next() {
        if alt.trim().parse::<f64>().is_err() || parts.next().is_some() {
            return Err(tuple.to_string());
        }
    }
    let lon: f64 = lon.trim().parse().map_err(|_| tuple.to_string())?;
    let lat: f64 = lat.trim().parse().map_err(|_| tuple.to_string())?;
    GeoPoint::checked(lon, lat).map_err(|_| tuple.to_string())
}
