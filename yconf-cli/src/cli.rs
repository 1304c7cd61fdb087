//! CLI structure and the `yconf` command.
//!
//! The command line is declared through [`yconf::Configuration`], so the
//! binary resolves its own options the same way applications do: every
//! option lands in the configuration tree under `yconf.*`, and that subtree
//! is removed before the configuration is printed.

use crate::error::CliError;
use crate::utils::{apply_assignment, parse_assignment, render, OutputFormat};
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command};
use serde::Deserialize;
use std::ffi::OsString;
use yconf::{ConfigParser, Configuration, PathTree, Value};

/// Tree key holding the CLI's own options.
pub const OPTIONS_KEY: &str = "yconf";

const SET_ARG: &str = "yconf.set";
const FORMAT_ARG: &str = "yconf.format";
const VERBOSE_ARG: &str = "yconf.verbose";
const QUIET_ARG: &str = "yconf.quiet";
const QUERY_ARG: &str = "yconf.query";

/// Command line of the `yconf` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowConfiguration;

impl Configuration for ShowConfiguration {
    fn name(&self) -> &str {
        "yconf"
    }

    fn about(&self) -> Option<&str> {
        Some("Resolve layered YAML configuration")
    }

    fn extend_parser(&self, command: Command) -> Command {
        command
            .version(env!("CARGO_PKG_VERSION"))
            .arg(
                Arg::new(SET_ARG)
                    .long("set")
                    .value_name("KEY=VALUE")
                    .help("Override a value after loading; VALUE is read as YAML")
                    .action(ArgAction::Append)
                    .value_parser(parse_assignment),
            )
            .arg(
                Arg::new(FORMAT_ARG)
                    .long("format")
                    .value_name("FORMAT")
                    .help("Output format")
                    .value_parser(PossibleValuesParser::new(OutputFormat::NAMES))
                    .default_value("yaml"),
            )
            .arg(
                Arg::new(VERBOSE_ARG)
                    .long("verbose")
                    .help("Enable verbose output")
                    .action(ArgAction::SetTrue)
                    .conflicts_with(QUIET_ARG),
            )
            .arg(
                Arg::new(QUIET_ARG)
                    .long("quiet")
                    .help("Suppress non-essential output")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new(QUERY_ARG)
                    .value_name("QUERY")
                    .help("Dotted path of the value to print; prints everything if omitted"),
            )
    }
}

/// Options of one `yconf` invocation, taken out of the resolved tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShowCommand {
    /// `KEY=VALUE` overrides in the order given.
    #[serde(default)]
    pub set: Vec<String>,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Dotted path to print.
    #[serde(default)]
    pub query: Option<String>,
}

impl ShowCommand {
    /// Removes the `yconf` subtree from `tree` and reads the options in it.
    pub fn take_from(tree: &PathTree) -> Result<Self, CliError> {
        match tree.delete(OPTIONS_KEY) {
            Ok(Value::Tree(options)) => Ok(options.extract()?),
            Ok(other) => {
                log::warn!("Ignoring non-mapping '{OPTIONS_KEY}' value {other}");
                Ok(Self::default())
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Applies the overrides and renders the selected value.
    pub fn execute(&self, tree: &PathTree) -> Result<String, CliError> {
        for assignment in &self.set {
            apply_assignment(tree, assignment)?;
        }

        let selected = match &self.query {
            Some(query) => tree
                .get(query)
                .ok_or_else(|| CliError::QueryNotFound(query.clone()))?,
            None => Value::Tree(tree.clone()),
        };
        render(&selected, self.format)
    }
}

/// Resolves the configuration for `args`, which exclude the program name,
/// and renders the result.
pub fn run<I, T>(args: I) -> Result<String, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut parser = ConfigParser::new(ShowConfiguration);
    let tree = parser.parse(args)?;
    log::debug!(
        "Resolved configuration for environment {}",
        parser.environment()
    );
    let command = ShowCommand::take_from(&tree)?;
    command.execute(&tree)
}
