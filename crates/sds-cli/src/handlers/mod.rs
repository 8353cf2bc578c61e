//! Command handlers.
//!
//! Handlers are thin wrappers that:
//! 1. Parse/validate CLI-specific input
//! 2. Call the services wired up in bootstrap
//! 3. Format output for the terminal

pub mod cells;
pub mod fetch_grid;
pub mod paths;
pub mod products;
pub mod serve;
