//! Library exports for yconf-cli.
//!
//! This module exports the command definition and its helpers so they can
//! be exercised from tests without spawning the binary.

pub mod cli;
pub mod error;
pub mod utils;

pub use cli::{run, ShowCommand, ShowConfiguration};
pub use error::CliError;
