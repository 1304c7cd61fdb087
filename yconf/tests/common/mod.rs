//! Common test utilities for integration tests.
//!
//! This module provides fixture builders for tiered configuration sources and
//! a configurable [`Configuration`] for exercising the parser.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Command;
use tempfile::TempDir;
use yconf::Configuration;

/// The standard three-tier document used across the tests.
///
/// `production` defines `a`, `b`, `c` and `e.f`; `staging` overrides `b`;
/// `development` overrides `c`.
pub const TIERED_CONFIG: &str = "\
production:
  a: a
  b: b
  c: c
  e:
    f: g
staging:
  b: B
development:
  c: C
";

/// Per-tier documents matching [`TIERED_CONFIG`].
pub const TIER_DOCUMENTS: [(&str, &str); 3] = [
    ("production", "a: a\nb: b\nc: c\ne:\n  f: g\n"),
    ("staging", "b: B\n"),
    ("development", "c: C\n"),
];

/// A temporary configuration source that is removed on drop.
pub struct ConfigFixture {
    dir: TempDir,
    path: PathBuf,
    arg: String,
}

impl ConfigFixture {
    /// A single file holding every tier under its own top-level key.
    pub fn file(contents: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, contents).unwrap();
        Self::at(dir, path)
    }

    /// The standard tiers as a single file.
    pub fn tiered_file() -> Self {
        Self::file(TIERED_CONFIG)
    }

    /// A directory with one `<tier>.yml` file per entry.
    pub fn directory(documents: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for (tier, contents) in documents {
            fs::write(dir.path().join(format!("{tier}.yml")), contents).unwrap();
        }
        let path = dir.path().to_path_buf();
        Self::at(dir, path)
    }

    fn at(dir: TempDir, path: PathBuf) -> Self {
        let arg = path.display().to_string();
        Self { dir, path, arg }
    }

    /// The standard tiers as a directory.
    pub fn tiered_directory() -> Self {
        Self::directory(&TIER_DOCUMENTS)
    }

    /// The configuration source to pass to `-c`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The source path as a command-line argument.
    pub fn arg(&self) -> &str {
        &self.arg
    }

    /// The temporary directory backing the fixture.
    #[allow(dead_code)]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// A [`Configuration`] whose arguments are supplied by the test.
pub struct TestConfiguration {
    merge: bool,
    extend: fn(Command) -> Command,
}

impl TestConfiguration {
    /// Layered tiers with the given arguments.
    pub fn new(extend: fn(Command) -> Command) -> Self {
        Self {
            merge: true,
            extend,
        }
    }

    /// Only the selected tier, with the given arguments.
    #[allow(dead_code)]
    pub fn without_merge(extend: fn(Command) -> Command) -> Self {
        Self {
            merge: false,
            extend,
        }
    }
}

impl Configuration for TestConfiguration {
    fn name(&self) -> &str {
        "test"
    }

    fn extend_parser(&self, command: Command) -> Command {
        (self.extend)(command)
    }

    fn merge_tiers(&self) -> bool {
        self.merge
    }
}
