//! Copernicus Open Access Hub client.
//!
//! [`CopernicusClient`] implements [`ProductCatalogPort`](sds_core::ProductCatalogPort):
//! product metadata over OData, archive downloads with MD5 verification,
//! long-term-archive triggering for offline products, and paged OpenSearch
//! footprint queries for Sentinel-2 Level-1C products.
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;
mod http;
mod parsing;
mod port;

// Client
pub use client::{CopernicusClient, build_query};

// Configuration
pub use config::{COPERNICUS_URL_ENV, CopernicusConfig, DEFAULT_API_URL};

// Silence unused dev-dependency warnings
#[cfg(test)]
use axum as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
