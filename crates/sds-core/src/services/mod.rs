//! Core services.

mod grid_service;

pub use grid_service::{GridError, GridService};
