//! Request and response bodies.

use chrono::{DateTime, NaiveDateTime, Utc};
use sds_core::{FeatureCollection, GeoPoint};
use serde::Deserialize;

use crate::error::HttpError;

/// Query string of `POST /queryMeasurements`.
#[derive(Debug, Default, Deserialize)]
pub struct MeasurementQuery {
    pub datetime_from: Option<String>,
    pub datetime_to: Option<String>,
}

/// A validated measurement time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl MeasurementQuery {
    pub fn time_range(&self) -> Result<TimeRange, HttpError> {
        let from = parse_timestamp("datetime_from", self.datetime_from.as_deref())?;
        let to = parse_timestamp("datetime_to", self.datetime_to.as_deref())?;
        if from > to {
            return Err(HttpError::BadRequest(
                "datetime_from must not be after datetime_to".to_string(),
            ));
        }
        Ok(TimeRange { from, to })
    }
}

/// RFC 3339, or an ISO 8601 timestamp without offset taken as UTC.
fn parse_timestamp(field: &str, value: Option<&str>) -> Result<DateTime<Utc>, HttpError> {
    let value = value.ok_or_else(|| HttpError::BadRequest(format!("Missing query parameter {field}")))?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| HttpError::BadRequest(format!("Invalid timestamp for {field}: {value}")))
}

/// Location points from a GeoJSON feature collection body.
pub fn parse_locations(body: &[u8]) -> Result<Vec<GeoPoint>, HttpError> {
    let collection: FeatureCollection = serde_json::from_slice(body)
        .map_err(|e| HttpError::BadRequest(format!("Invalid GeoJSON: {e}")))?;
    Ok(collection.points()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(from: Option<&str>, to: Option<&str>) -> MeasurementQuery {
        MeasurementQuery {
            datetime_from: from.map(str::to_string),
            datetime_to: to.map(str::to_string),
        }
    }

    #[test]
    fn accepts_offsets_and_naive_timestamps() {
        let range = query(Some("2022-01-01T01:00:00+01:00"), Some("2022-01-31T00:00:00"))
            .time_range()
            .unwrap();
        assert_eq!(range.from.to_rfc3339(), "2022-01-01T00:00:00+00:00");
        assert_eq!(range.to.to_rfc3339(), "2022-01-31T00:00:00+00:00");
    }

    #[test]
    fn rejects_missing_garbled_and_reversed() {
        assert!(query(None, Some("2022-01-01T00:00:00Z")).time_range().is_err());
        assert!(query(Some("yesterday"), Some("2022-01-01T00:00:00Z")).time_range().is_err());
        assert!(
            query(Some("2022-02-01T00:00:00Z"), Some("2022-01-01T00:00:00Z"))
                .time_range()
                .is_err()
        );
    }

    #[test]
    fn locations_must_be_a_feature_collection() {
        assert!(matches!(
            parse_locations(b"{\"type\": \"Point\"}"),
            Err(HttpError::BadRequest(_))
        ));
        assert!(matches!(parse_locations(b"not json"), Err(HttpError::BadRequest(_))));
        let points = parse_locations(
            br#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[7.0,51.0]}}]}"#,
        )
        .unwrap();
        assert_eq!(points, vec![GeoPoint::new(7.0, 51.0)]);
    }
}
