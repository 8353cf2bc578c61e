//! Command-line interface of the satellite data service.
//!
//! Two binaries share this library: `sds` with its subcommands, and the
//! flag-less `fetch-grid` used when building a container image.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;

// Used by the binaries only
use anyhow as _;
use dotenvy as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

pub use bootstrap::{CliContext, init_logging};
pub use commands::{Commands, CredentialArgs};
pub use error::CliError;
pub use parser::Cli;
