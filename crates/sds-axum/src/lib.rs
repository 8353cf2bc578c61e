//! HTTP adapter for the satellite data service.
//!
//! Exposes the tiling grid queries over HTTP. [`bootstrap`] wires the KML
//! parser into a [`GridService`](sds_core::GridService); [`create_router`]
//! builds the routes on top of it.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{AxumContext, CorsConfig, DEFAULT_PORT, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;
