//! Configuration loading for yconf.
//!
//! Configuration comes from two places, applied in this order:
//!
//! 1. YAML files organized by environment tier, either one file with a
//!    top-level section per tier or a directory with one `<tier>.yml` file
//!    per tier
//! 2. Command-line arguments
//!
//! Tiers are ordered from most restrictive (`production`) to most permissive
//! (`development`). In merge mode, selecting a tier layers every tier up to
//! and including it, so `development` inherits from `staging`, which inherits
//! from `production`.
//!
//! # Examples
//!
//! Loading a tiered file directly:
//!
//! ```no_run
//! use std::path::Path;
//! use yconf::config::{ConfigLoader, EnvironmentResolver};
//! use yconf::tree::PathTree;
//!
//! let resolver = EnvironmentResolver::default();
//! let tree = PathTree::new();
//! ConfigLoader::new(&resolver)
//!     .load_into(&tree, Path::new("app.yml"), "staging", true)
//!     .unwrap();
//! ```
//!
//! Parsing a command line on top of it:
//!
//! ```no_run
//! use clap::{Arg, Command};
//! use yconf::config::{ConfigParser, Configuration};
//!
//! struct App;
//!
//! impl Configuration for App {
//!     fn extend_parser(&self, command: Command) -> Command {
//!         command.arg(Arg::new("server.port").long("port").default_value("8080"))
//!     }
//! }
//!
//! let mut parser = ConfigParser::new(App);
//! let tree = parser.parse(["-c", "app.yml", "-e", "development"]).unwrap();
//! println!("port: {}", tree.get("server.port").unwrap());
//! ```

pub mod binding;
pub mod environment;
pub mod loader;
pub mod normalize;
pub mod parser;

// Re-export key types at module root
pub use binding::{bind_matches, store_const};
pub use environment::{Environment, EnvironmentResolver, Tier};
pub use loader::{ConfigLoader, DocumentSet};
pub use normalize::parse_document;
pub use parser::{BaseConfiguration, ConfigParser, Configuration};
