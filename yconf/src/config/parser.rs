//! Two-phase command-line parsing on top of tiered configuration files.
//!
//! Parsing runs in two passes over the same argument list:
//!
//! 1. `-c/--config` and `-e/--environment` are picked out and validated. The
//!    configuration source they name is loaded into the tree.
//! 2. The remaining arguments go through the full command built by the
//!    [`Configuration`]. Explicit values overwrite the loaded configuration;
//!    defaults only fill gaps.
//!
//! # Examples
//!
//! ```
//! use yconf::config::{BaseConfiguration, ConfigParser};
//!
//! let mut parser = ConfigParser::new(BaseConfiguration::default());
//! let tree = parser.parse(["-e", "staging"]).unwrap();
//! assert_eq!(tree.get("environment").unwrap().as_str(), Some("staging"));
//! assert!(parser.config_path().is_none());
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::builder::PossibleValuesParser;
use clap::{value_parser, Arg, ArgMatches, Command};

use crate::config::binding::bind_matches;
use crate::config::environment::EnvironmentResolver;
use crate::config::loader::ConfigLoader;
use crate::error::Result;
use crate::tree::PathTree;

/// Argument id, and tree key, of the configuration source.
pub const CONFIG_ARG: &str = "config";
/// Argument id, and tree key, of the selected environment.
pub const ENVIRONMENT_ARG: &str = "environment";

/// Describes an application's command line and tier layout.
///
/// Every method has a default, so an empty `impl` accepts only `-c` and `-e`.
pub trait Configuration {
    /// Program name shown in usage and help output.
    fn name(&self) -> &str {
        "yconf"
    }

    /// One-line description shown in help output.
    fn about(&self) -> Option<&str> {
        None
    }

    /// Adds application arguments to the main command.
    ///
    /// `command` already carries `-c/--config` and `-e/--environment`. Each
    /// added argument's id is the dotted path its value is stored at.
    fn extend_parser(&self, command: Command) -> Command {
        command
    }

    /// Whether all tiers up to the selected one are layered, or only the
    /// selected tier is loaded.
    fn merge_tiers(&self) -> bool {
        true
    }

    /// The environment tiers configuration files are organized by.
    fn environments(&self) -> EnvironmentResolver {
        EnvironmentResolver::default()
    }
}

/// A [`Configuration`] with no application arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseConfiguration {
    /// See [`Configuration::merge_tiers`].
    pub merge: bool,
}

impl BaseConfiguration {
    /// A configuration that loads only the selected tier.
    #[must_use]
    pub const fn without_merge() -> Self {
        Self { merge: false }
    }
}

impl Default for BaseConfiguration {
    fn default() -> Self {
        Self { merge: true }
    }
}

impl Configuration for BaseConfiguration {
    fn merge_tiers(&self) -> bool {
        self.merge
    }
}

/// Parses command-line arguments into a [`PathTree`] seeded from
/// configuration files.
#[derive(Debug)]
pub struct ConfigParser<C> {
    configuration: C,
    resolver: EnvironmentResolver,
    tree: PathTree,
    config_path: Option<PathBuf>,
    environment: String,
}

impl<C: Configuration> ConfigParser<C> {
    /// Creates a parser with an empty tree.
    pub fn new(configuration: C) -> Self {
        let resolver = configuration.environments();
        let environment = resolver.most_restrictive().name().to_string();
        Self {
            configuration,
            resolver,
            tree: PathTree::new(),
            config_path: None,
            environment,
        }
    }

    /// Parses `args`, which must not include the program name.
    ///
    /// Returns a handle to the populated tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cli`](crate::Error::Cli) for invalid arguments and
    /// for help or version requests, and any loader error for the
    /// configuration source. Application arguments are not bound when
    /// loading fails.
    pub fn parse<I, T>(&mut self, args: I) -> Result<PathTree>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let (config_args, remaining) = split_config_args(args);
        let name = OsString::from(self.configuration.name());

        let mut config_command = self.config_command();
        let matches = config_command
            .try_get_matches_from_mut(std::iter::once(name.clone()).chain(config_args))?;
        self.select_source(&matches);

        if let Some(path) = &self.config_path {
            log::debug!(
                "Loading configuration from {} for environment {}",
                path.display(),
                self.environment
            );
            ConfigLoader::new(&self.resolver).load_into(
                &self.tree,
                path,
                self.environment.as_str(),
                self.configuration.merge_tiers(),
            )?;
        }

        let mut command = self.command();
        let matches =
            command.try_get_matches_from_mut(std::iter::once(name).chain(remaining))?;
        let bound = bind_matches(&self.tree, &command, &matches);
        log::debug!("Bound {bound} command-line values");

        Ok(self.tree.clone())
    }

    /// The full command: `-c`, `-e` and the application's arguments.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut command = Command::new(self.configuration.name().to_string())
            .args(source_args(&self.resolver));
        if let Some(about) = self.configuration.about() {
            command = command.about(about.to_string());
        }
        self.configuration.extend_parser(command)
    }

    /// The configuration tree.
    #[must_use]
    pub fn tree(&self) -> &PathTree {
        &self.tree
    }

    /// Consumes the parser, returning its tree.
    #[must_use]
    pub fn into_tree(self) -> PathTree {
        self.tree
    }

    /// The configuration source of the last parse, if one was given.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// The environment of the last parse, or the most restrictive tier.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// The tier set in use.
    #[must_use]
    pub fn resolver(&self) -> &EnvironmentResolver {
        &self.resolver
    }

    /// The application configuration.
    #[must_use]
    pub fn configuration(&self) -> &C {
        &self.configuration
    }

    fn config_command(&self) -> Command {
        Command::new(self.configuration.name().to_string())
            .disable_help_flag(true)
            .args_override_self(true)
            .args(source_args(&self.resolver))
    }

    /// Records the selected source on the parser and in the tree.
    ///
    /// The tree always mirrors the source being loaded, including a default
    /// environment on a later parse.
    fn select_source(&mut self, matches: &ArgMatches) {
        self.config_path = matches.get_one::<PathBuf>(CONFIG_ARG).cloned();
        if let Some(environment) = matches.get_one::<String>(ENVIRONMENT_ARG) {
            self.environment.clone_from(environment);
        }

        match &self.config_path {
            Some(path) => self
                .tree
                .set(CONFIG_ARG, path.to_string_lossy().into_owned()),
            None => {
                // Left over from an earlier parse.
                let _ = self.tree.delete(CONFIG_ARG);
            }
        }
        self.tree.set(ENVIRONMENT_ARG, self.environment.as_str());
    }
}

fn source_args(resolver: &EnvironmentResolver) -> [Arg; 2] {
    let names: Vec<String> = resolver
        .names()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    [
        Arg::new(CONFIG_ARG)
            .short('c')
            .long("config")
            .value_name("PATH")
            .value_parser(value_parser!(PathBuf))
            .help("Configuration file, or directory of per-environment files"),
        Arg::new(ENVIRONMENT_ARG)
            .short('e')
            .long("environment")
            .value_name("ENV")
            .value_parser(PossibleValuesParser::new(names))
            .default_value(resolver.most_restrictive().name().to_string())
            .help("Environment whose configuration is loaded"),
    ]
}

/// Separates `-c` and `-e` options from everything else.
///
/// Recognized forms are `-c PATH`, `-cPATH`, `--config PATH` and
/// `--config=PATH`, likewise for `-e`. Nothing after `--` is taken.
fn split_config_args(args: Vec<OsString>) -> (Vec<OsString>, Vec<OsString>) {
    let mut taken = Vec::new();
    let mut remaining = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            remaining.push(arg);
            continue;
        };
        match text {
            "--" => {
                remaining.push(arg);
                remaining.extend(args);
                break;
            }
            "-c" | "--config" | "-e" | "--environment" => {
                taken.push(arg);
                taken.extend(args.next());
            }
            _ if text.starts_with("--config=") || text.starts_with("--environment=") => {
                taken.push(arg);
            }
            _ if !text.starts_with("--")
                && text.len() > 2
                && (text.starts_with("-c") || text.starts_with("-e")) =>
            {
                taken.push(arg);
            }
            _ => remaining.push(arg),
        }
    }
    (taken, remaining)
}
