//! Writing parsed command-line arguments onto a [`PathTree`].
//!
//! Each argument's id is its destination: an argument created with
//! `Arg::new("db.host")` lands at `tree.get("db.host")`. Values given on the
//! command line always overwrite. Parser defaults only fill destinations that
//! do not resolve yet, so values loaded from configuration files beat
//! defaults that the user never asked for.
//!
//! # Examples
//!
//! ```
//! use clap::{Arg, Command};
//! use yconf::config::binding::bind_matches;
//! use yconf::tree::PathTree;
//!
//! let mut command = Command::new("app")
//!     .arg(Arg::new("db.host").long("host").default_value("localhost"))
//!     .arg(Arg::new("db.user").long("user").default_value("admin"));
//!
//! let tree = PathTree::from_entries([("db.host", "db.internal")]);
//! let matches = command
//!     .try_get_matches_from_mut(["app", "--user", "reader"])
//!     .unwrap();
//! bind_matches(&tree, &command, &matches);
//!
//! assert_eq!(tree.get("db.host").unwrap().as_str(), Some("db.internal"));
//! assert_eq!(tree.get("db.user").unwrap().as_str(), Some("reader"));
//! ```

use std::any::Any;
use std::ffi::OsString;
use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_yaml::Value as Yaml;

use crate::tree::{PathTree, Value};

/// Binds every matched argument of `command` onto `tree`.
///
/// `command` must be the command `matches` was produced from. Returns the
/// number of destinations written.
pub fn bind_matches(tree: &PathTree, command: &Command, matches: &ArgMatches) -> usize {
    let mut written = 0;
    for arg in command.get_arguments() {
        if is_meta(arg) {
            continue;
        }
        let dest = arg.get_id().as_str();
        let Some(source) = matches.value_source(dest) else {
            continue;
        };
        if source == ValueSource::DefaultValue && tree.get(dest).is_some() {
            log::debug!("Keeping configured value for '{dest}' over parser default");
            continue;
        }
        if let Some(value) = matched_value(matches, arg) {
            if source == ValueSource::DefaultValue {
                log::trace!("Applying parser default for '{dest}'");
            }
            tree.set(dest, value);
            written += 1;
        }
    }
    written
}

/// An argument that stores `constant` at `dest` when its flag is present.
///
/// Used bare, the flag stores `constant`; `--flag=value` stores `value`.
/// When it is absent, `default` is stored instead, subject to the usual
/// default rule.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use yconf::config::binding::{bind_matches, store_const};
/// use yconf::tree::PathTree;
///
/// let mut command = Command::new("app").arg(store_const("mode", "sum", Some("max")).long("sum"));
///
/// let tree = PathTree::new();
/// let matches = command.try_get_matches_from_mut(["app", "--sum"]).unwrap();
/// bind_matches(&tree, &command, &matches);
/// assert_eq!(tree.get("mode").unwrap().as_str(), Some("sum"));
/// ```
#[must_use]
pub fn store_const(dest: &'static str, constant: &'static str, default: Option<&'static str>) -> Arg {
    let arg = Arg::new(dest)
        .action(ArgAction::Set)
        .num_args(0..=1)
        .require_equals(true)
        .default_missing_value(constant);
    match default {
        Some(default) => arg.default_value(default),
        None => arg,
    }
}

fn is_meta(arg: &Arg) -> bool {
    matches!(
        arg.get_action(),
        ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong | ArgAction::Version
    )
}

fn is_multiple(arg: &Arg) -> bool {
    matches!(arg.get_action(), ArgAction::Append)
        || arg
            .get_num_args()
            .is_some_and(|range| range.max_values() > 1)
}

/// Reads the values of `arg` as YAML.
///
/// Strings, booleans, `char`, paths and the primitive numbers that fit a YAML
/// number keep their type. Anything else, including `i128`/`u128` and custom
/// value parsers, is stored as the text given on the command line.
fn matched_value(matches: &ArgMatches, arg: &Arg) -> Option<Value> {
    let id = arg.get_id().as_str();
    let mut values = typed::<String>(matches, id, Yaml::from)
        .or_else(|| typed::<bool>(matches, id, Yaml::from))
        .or_else(|| typed::<u8>(matches, id, Yaml::from))
        .or_else(|| typed::<i64>(matches, id, Yaml::from))
        .or_else(|| typed::<u64>(matches, id, Yaml::from))
        .or_else(|| typed::<i32>(matches, id, Yaml::from))
        .or_else(|| typed::<u32>(matches, id, Yaml::from))
        .or_else(|| typed::<i16>(matches, id, Yaml::from))
        .or_else(|| typed::<u16>(matches, id, Yaml::from))
        .or_else(|| typed::<i8>(matches, id, Yaml::from))
        .or_else(|| typed::<isize>(matches, id, Yaml::from))
        .or_else(|| typed::<usize>(matches, id, Yaml::from))
        .or_else(|| typed::<f64>(matches, id, Yaml::from))
        .or_else(|| typed::<f32>(matches, id, Yaml::from))
        .or_else(|| typed::<char>(matches, id, |c| Yaml::String(c.to_string())))
        .or_else(|| typed::<PathBuf>(matches, id, |path| lossy(path.into_os_string())))
        .or_else(|| typed::<OsString>(matches, id, lossy))
        .or_else(|| raw(matches, id))?;

    if is_multiple(arg) {
        Some(Value::Leaf(Yaml::Sequence(values)))
    } else if values.is_empty() {
        None
    } else {
        Some(Value::Leaf(values.swap_remove(0)))
    }
}

fn typed<T>(matches: &ArgMatches, id: &str, convert: impl Fn(T) -> Yaml) -> Option<Vec<Yaml>>
where
    T: Any + Clone + Send + Sync + 'static,
{
    match matches.try_get_many::<T>(id) {
        Ok(Some(values)) => Some(values.cloned().map(convert).collect()),
        _ => None,
    }
}

/// Values of custom value parsers, read back as strings.
fn raw(matches: &ArgMatches, id: &str) -> Option<Vec<Yaml>> {
    match matches.try_get_raw(id) {
        Ok(Some(values)) => Some(
            values
                .map(|value| Yaml::String(value.to_string_lossy().into_owned()))
                .collect(),
        ),
        _ => None,
    }
}

fn lossy(value: OsString) -> Yaml {
    Yaml::String(value.to_string_lossy().into_owned())
}
