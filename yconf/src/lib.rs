#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # yconf
//!
//! A library for layered application configuration.
//!
//! Settings are read from YAML files organized by deployment environment
//! (`production`, `staging`, `development`) and then overridden from the
//! command line. The result is a [`PathTree`]: a nested mapping addressed by
//! dotted paths such as `"server.http.port"`.
//!
//! ## Core Types
//!
//! - [`PathTree`] and [`Value`]: The nested configuration tree
//! - [`ConfigParser`] and [`Configuration`]: Two-phase command-line parsing
//! - [`ConfigLoader`] and [`EnvironmentResolver`]: Tiered file loading
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use yconf::PathTree;
//!
//! let tree = PathTree::new();
//! tree.set("server.host", "localhost");
//! tree.set("server.port", 8080);
//!
//! assert_eq!(tree.get("server.port").unwrap().as_i64(), Some(8080));
//! assert_eq!(tree.to_string(), r#"{server: {host: "localhost", port: 8080}}"#);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod tree;

// Re-export key types at crate root for convenience
pub use config::{
    BaseConfiguration, ConfigLoader, ConfigParser, Configuration, Environment,
    EnvironmentResolver, Tier,
};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use tree::{PathTree, Value};
