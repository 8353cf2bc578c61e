//! HTTP handlers, one module per concern.

pub mod grid;
pub mod measurements;
