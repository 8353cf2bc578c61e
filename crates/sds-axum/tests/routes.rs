//! Integration tests for the Axum web server.
//!
//! These tests verify that routes are correctly wired to handlers.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use sds_axum::bootstrap::{CorsConfig, ServerConfig, bootstrap};
use sds_axum::routes::create_router;

/// Two neighbouring tiles overlapping between 7.5 and 8.0 degrees east.
const GRID: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2"><Document><Folder>
<Placemark><name>32UMA</name><description><![CDATA[<b>TILE_ID</b> 32UMA]]></description>
<MultiGeometry><Polygon><outerBoundaryIs><LinearRing>
<coordinates>6,50,0 8,50,0 8,52,0 6,52,0 6,50,0</coordinates>
</LinearRing></outerBoundaryIs></Polygon></MultiGeometry></Placemark>
<Placemark><name>32UNA</name><description>east</description>
<MultiGeometry><Polygon><outerBoundaryIs><LinearRing>
<coordinates>7.5,50,0 9.5,50,0 9.5,52,0 7.5,52,0 7.5,50,0</coordinates>
</LinearRing></outerBoundaryIs></Polygon></MultiGeometry></Placemark>
</Folder></Document></kml>"#;

async fn app_with_grid(dir: &TempDir, grid: Option<&str>) -> Router {
    let path = dir.path().join("sentinel_2_level_1c_tiling_grid.kml");
    if let Some(contents) = grid {
        std::fs::write(&path, contents).unwrap();
    }
    let config = ServerConfig {
        port: 0,
        grid_path: path,
        cors: CorsConfig::AllowAll,
    };
    let ctx = bootstrap(&config).await.unwrap();
    create_router(ctx, &config.cors)
}

fn points(coords: &[[f64; 2]]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": coords.iter().map(|c| json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Point", "coordinates": c}
        })).collect::<Vec<_>>()
    })
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, Some(GRID)).await;

    let (status, body) = send(app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn containing_geometry_returns_cells_without_ids() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, Some(GRID)).await;

    let (status, body) = send(
        app,
        Method::POST,
        "/queryContainingGeometry",
        Some(points(&[[7.8, 51.0], [7.8, 51.0], [0.0, 0.0]])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["type"], "FeatureCollection");
    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["properties"]["Name"], "32UMA");
    assert_eq!(
        features[0]["properties"]["Description"],
        "<b>TILE_ID</b> 32UMA"
    );
    assert_eq!(features[1]["properties"]["Name"], "32UNA");
    assert_eq!(features[0]["geometry"]["type"], "Polygon");
    assert!(features[0].get("id").is_none());
}

#[tokio::test]
async fn containing_geometry_without_hits_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, Some(GRID)).await;

    let (status, body) = send(
        app,
        Method::POST,
        "/queryContainingGeometry",
        Some(points(&[[100.0, -10.0]])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["features"], json!([]));
}

#[tokio::test]
async fn map_locations_lists_cells_per_point() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, Some(GRID)).await;

    let (status, body) = send(
        app,
        Method::POST,
        "/mapLocations",
        Some(points(&[[6.5, 51.0], [7.8, 51.0]])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_body(&body),
        json!([
            {"longitude": 6.5, "latitude": 51.0, "cells": ["32UMA"]},
            {"longitude": 7.8, "latitude": 51.0, "cells": ["32UMA", "32UNA"]}
        ])
    );
}

#[tokio::test]
async fn polygon_input_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, Some(GRID)).await;
    let body = json!({
        "type": "FeatureCollection",
        "features": [{"type": "Feature", "properties": {}, "geometry": {
            "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        }}]
    });

    let (status, body) = send(app, Method::POST, "/queryContainingGeometry", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json_body(&body);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("Polygon"));
}

#[tokio::test]
async fn wrong_geojson_type_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, Some(GRID)).await;
    let body = json!({
        "type": "Point",
        "features": [{"type": "Banana", "properties": {}, "geometry": {
            "type": "Point", "coordinates": [7.8, 51.0]
        }}]
    });

    let (status, body) = send(app, Method::POST, "/queryContainingGeometry", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["status"], 400);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, Some(GRID)).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/mapLocations")
        .body(Body::from("{\"features\": ["))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cell_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, Some(GRID)).await;

    let (status, body) = send(app.clone(), Method::GET, "/cells/32UNA", None).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["type"], "Feature");
    assert_eq!(body["properties"]["Description"], "east");

    let (status, body) = send(app, Method::GET, "/cells/99ZZZ", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["status"], 404);
}

#[tokio::test]
async fn missing_grid_is_service_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, None).await;

    let (status, body) = send(
        app,
        Method::POST,
        "/queryContainingGeometry",
        Some(points(&[[7.0, 51.0]])),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json_body(&body)["error"].as_str().unwrap().contains("fetch-grid"));
}

#[tokio::test]
async fn measurements_are_not_implemented() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, Some(GRID)).await;

    let (status, body) = send(
        app,
        Method::POST,
        "/queryMeasurements?datetime_from=2022-01-01T00:00:00Z&datetime_to=2022-02-01T00:00:00Z",
        Some(points(&[[7.0, 51.0]])),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(
        json_body(&body),
        json!({"error": "Data access is not available yet!", "status": 501})
    );
}

#[tokio::test]
async fn measurements_validate_the_time_range() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, Some(GRID)).await;

    let (status, _) = send(
        app.clone(),
        Method::POST,
        "/queryMeasurements?datetime_from=2022-03-01T00:00:00Z&datetime_to=2022-02-01T00:00:00Z",
        Some(points(&[[7.0, 51.0]])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app,
        Method::POST,
        "/queryMeasurements",
        Some(points(&[[7.0, 51.0]])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cors_headers_are_present() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_grid(&dir, Some(GRID)).await;

    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
