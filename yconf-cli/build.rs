//! Build script for yconf-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs and the
/// `-c`/`-e` options added by the yconf library parser.
fn build_cli() -> Command {
    Command::new("yconf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve layered YAML configuration")
        .long_about(
            "Resolve configuration from environment-tiered YAML files and command-line overrides",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Configuration file, or directory of per-environment files"),
        )
        .arg(
            Arg::new("environment")
                .short('e')
                .long("environment")
                .value_name("ENV")
                .value_parser(["production", "staging", "development"])
                .default_value("production")
                .help("Environment whose configuration is loaded"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .value_name("KEY=VALUE")
                .help("Override a value after loading; VALUE is read as YAML")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .value_parser(["yaml", "json"])
                .default_value("yaml")
                .help("Output format"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("query")
                .value_name("QUERY")
                .help("Dotted path of the value to print; prints everything if omitted"),
        )
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("yconf.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
}
