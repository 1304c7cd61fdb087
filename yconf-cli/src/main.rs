//! Main entry point for the yconf CLI.
//!
//! Resolves a layered configuration from `-c/--config` and
//! `-e/--environment`, applies `--set` overrides and prints the result, or
//! the single value selected by a dotted query path.

use std::ffi::OsString;

use yconf_cli::utils::GlobalOptions;

fn main() {
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    // Initialize logging before any configuration file is read
    let global = GlobalOptions::scan(&args);
    let _logger = yconf::init_logger(global.verbose, global.quiet);

    match yconf_cli::run(args) {
        Ok(output) => {
            print!("{output}");
            std::process::exit(0);
        }
        Err(e) => {
            if let Some(clap_error) = e.as_clap() {
                clap_error.exit();
            }
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
