//! Configuration source discovery and environment-tiered merging.
//!
//! A configuration source is either a single YAML file whose top-level keys
//! are environment names, or a directory holding one `<environment>.yml` file
//! per tier. Tiers are layered into a [`PathTree`] in ascending ordinal order,
//! so more permissive tiers override more restrictive ones.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde_yaml::{Mapping, Value as Yaml};

use crate::config::environment::{Environment, EnvironmentResolver};
use crate::config::normalize::parse_document;
use crate::error::{Error, Result};
use crate::tree::PathTree;

/// File extension of per-tier files in directory sources.
pub const TIER_FILE_EXTENSION: &str = "yml";

/// Parsed per-tier documents, keyed by tier name.
///
/// Only known tiers are kept; tiers without a document are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSet {
    documents: BTreeMap<String, Mapping>,
}

impl DocumentSet {
    /// Creates an empty document set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the document for a tier.
    pub fn insert(&mut self, tier: impl Into<String>, document: Mapping) {
        self.documents.insert(tier.into(), document);
    }

    /// The document for a tier, if one was loaded.
    #[must_use]
    pub fn get(&self, tier: &str) -> Option<&Mapping> {
        self.documents.get(tier)
    }

    /// Names of the tiers that have a document.
    #[must_use]
    pub fn tiers(&self) -> Vec<&str> {
        self.documents.keys().map(String::as_str).collect()
    }

    /// Number of tiers with a document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no tier has a document.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Loads configuration sources and merges their tiers.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use yconf::config::{ConfigLoader, EnvironmentResolver};
/// use yconf::tree::PathTree;
///
/// let resolver = EnvironmentResolver::default();
/// let tree = PathTree::new();
/// ConfigLoader::new(&resolver)
///     .load_into(&tree, Path::new("config.yml"), "staging", true)
///     .unwrap();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader<'a> {
    resolver: &'a EnvironmentResolver,
}

impl<'a> ConfigLoader<'a> {
    /// Creates a loader for the given tier set.
    #[must_use]
    pub const fn new(resolver: &'a EnvironmentResolver) -> Self {
        Self { resolver }
    }

    /// Reads and parses one YAML file, normalizing hyphenated keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, [`Error::Yaml`] if
    /// it is not valid YAML and [`Error::KeyConflict`] on ambiguous keys.
    pub fn load_file(path: &Path) -> Result<Yaml> {
        log::debug!("Reading configuration file {}", path.display());
        let text = fs::read_to_string(path)?;
        parse_document(&text)
    }

    /// Discovers and parses the tier documents under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if `path` is neither a file nor a directory or a
    /// file cannot be read, [`Error::InvalidDocument`] if a tier document is
    /// not a mapping, and any parse error from [`load_file`](Self::load_file).
    pub fn load_documents(&self, path: &Path) -> Result<DocumentSet> {
        if path.is_file() {
            self.load_single_file(path)
        } else if path.is_dir() {
            self.load_directory(path)
        } else {
            Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("configuration source not found: {}", path.display()),
            )))
        }
    }

    /// Loads `path` and merges the selected tiers into `tree`.
    ///
    /// See [`apply`](Self::apply) for the layering rules.
    ///
    /// # Errors
    ///
    /// Any error from [`load_documents`](Self::load_documents) or
    /// [`apply`](Self::apply). Nothing is merged when loading fails.
    pub fn load_into(
        &self,
        tree: &PathTree,
        path: &Path,
        environment: impl Into<Environment>,
        merge: bool,
    ) -> Result<()> {
        let documents = self.load_documents(path)?;
        self.apply(tree, &documents, environment, merge)
    }

    /// Merges tier documents into `tree`.
    ///
    /// In merge mode every tier whose ordinal is less than or equal to the
    /// target's is merged, most restrictive first. Otherwise only the exact
    /// target tier is merged, and a missing document merges nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEnvironment`] for an unknown environment name
    /// and [`Error::InvalidKey`] for non-string keys. All selected documents
    /// are converted before the tree is touched.
    pub fn apply(
        &self,
        tree: &PathTree,
        documents: &DocumentSet,
        environment: impl Into<Environment>,
        merge: bool,
    ) -> Result<()> {
        let environment = environment.into();
        let selected: Vec<&str> = if merge {
            let target = self.resolver.ordinal(&environment)?;
            self.resolver
                .tiers()
                .iter()
                .take_while(|tier| tier.ordinal() <= target)
                .map(|tier| tier.name())
                .collect()
        } else {
            self.resolver
                .tier(&environment)?
                .map(|tier| vec![tier.name()])
                .unwrap_or_default()
        };

        let layers = selected
            .into_iter()
            .filter_map(|name| documents.get(name).map(|document| (name, document)))
            .map(|(name, document)| -> Result<_> {
                Ok((name, PathTree::from_yaml(document)?))
            })
            .collect::<Result<Vec<_>>>()?;

        for (name, layer) in layers {
            log::debug!("Merging '{name}' tier for environment {environment}");
            tree.merge(&layer);
        }
        Ok(())
    }

    fn load_single_file(&self, path: &Path) -> Result<DocumentSet> {
        let mut documents = DocumentSet::new();
        let root = match Self::load_file(path)? {
            Yaml::Null => return Ok(documents),
            Yaml::Mapping(root) => root,
            _ => {
                return Err(Error::InvalidDocument {
                    source_name: path.display().to_string(),
                    reason: "expected a mapping of environment names".to_string(),
                })
            }
        };

        for (key, value) in root {
            match key.as_str() {
                Some(name) if self.resolver.names().contains(&name) => {
                    let document = tier_document(name, value)?;
                    documents.insert(name, document);
                }
                _ => log::debug!("Ignoring non-tier key {key:?} in {}", path.display()),
            }
        }
        Ok(documents)
    }

    fn load_directory(&self, path: &Path) -> Result<DocumentSet> {
        let mut documents = DocumentSet::new();
        for tier in self.resolver.tiers() {
            let file = path.join(format!("{}.{TIER_FILE_EXTENSION}", tier.name()));
            if !file.is_file() {
                continue;
            }
            let document = tier_document(tier.name(), Self::load_file(&file)?)?;
            documents.insert(tier.name(), document);
        }
        Ok(documents)
    }
}

fn tier_document(tier: &str, value: Yaml) -> Result<Mapping> {
    match value {
        Yaml::Null => Ok(Mapping::new()),
        Yaml::Mapping(mapping) => Ok(mapping),
        _ => Err(Error::InvalidDocument {
            source_name: tier.to_string(),
            reason: "expected a mapping".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Value;
    use tempfile::TempDir;

    const TIERED: &str = "\
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

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn load(path: &Path, environment: &str, merge: bool) -> PathTree {
        let resolver = EnvironmentResolver::default();
        let tree = PathTree::new();
        ConfigLoader::new(&resolver)
            .load_into(&tree, path, environment, merge)
            .unwrap();
        tree
    }

    fn text(tree: &PathTree, path: &str) -> Option<String> {
        tree.get(path).and_then(|v| v.as_str().map(str::to_string))
    }

    #[test]
    fn test_load_nonexistent_source() {
        let resolver = EnvironmentResolver::default();
        let result =
            ConfigLoader::new(&resolver).load_documents(Path::new("/nonexistent/config.yml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "bad.yml", "production: [");
        let resolver = EnvironmentResolver::default();
        let result = ConfigLoader::new(&resolver).load_documents(&path);
        assert!(matches!(result, Err(Error::Yaml(_))));
    }

    #[test]
    fn test_merge_mode_layers_tiers() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "config.yml", TIERED);

        let tree = load(&path, "production", true);
        assert_eq!(text(&tree, "a").as_deref(), Some("a"));
        assert_eq!(text(&tree, "b").as_deref(), Some("b"));
        assert_eq!(text(&tree, "c").as_deref(), Some("c"));

        let tree = load(&path, "staging", true);
        assert_eq!(text(&tree, "a").as_deref(), Some("a"));
        assert_eq!(text(&tree, "b").as_deref(), Some("B"));
        assert_eq!(text(&tree, "c").as_deref(), Some("c"));

        let tree = load(&path, "development", true);
        assert_eq!(text(&tree, "a").as_deref(), Some("a"));
        assert_eq!(text(&tree, "b").as_deref(), Some("B"));
        assert_eq!(text(&tree, "c").as_deref(), Some("C"));
        assert_eq!(text(&tree, "e.f").as_deref(), Some("g"));
    }

    #[test]
    fn test_exact_mode_uses_single_tier() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "config.yml", TIERED);

        let tree = load(&path, "staging", false);
        assert!(!tree.has("a"));
        assert_eq!(text(&tree, "b").as_deref(), Some("B"));
        assert!(!tree.has("c"));
        assert_eq!(tree.len(), 1);

        let tree = load(&path, "development", false);
        assert!(!tree.has("a"));
        assert!(!tree.has("b"));
        assert_eq!(text(&tree, "c").as_deref(), Some("C"));
    }

    #[test]
    fn test_exact_mode_missing_tier_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "config.yml", "production:\n  a: 1\n");
        assert!(load(&path, "staging", false).is_empty());
    }

    #[test]
    fn test_directory_source() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "production.yml", "a: a\nb: b\nc: c\n");
        write_file(&temp_dir, "development.yml", "c: C\n");

        let resolver = EnvironmentResolver::default();
        let documents = ConfigLoader::new(&resolver)
            .load_documents(temp_dir.path())
            .unwrap();
        assert_eq!(documents.tiers(), vec!["development", "production"]);

        let tree = load(temp_dir.path(), "staging", true);
        assert_eq!(text(&tree, "c").as_deref(), Some("c"));

        let tree = load(temp_dir.path(), "development", true);
        assert_eq!(text(&tree, "c").as_deref(), Some("C"));
    }

    #[test]
    fn test_empty_tier_file_is_empty_mapping() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "production.yml", "a: 1\n");
        write_file(&temp_dir, "staging.yml", "");
        let tree = load(temp_dir.path(), "staging", true);
        assert_eq!(tree.get("a"), Some(Value::from(1)));
    }

    #[test]
    fn test_non_mapping_tier_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "config.yml", "staging: 5\n");
        let resolver = EnvironmentResolver::default();
        let err = ConfigLoader::new(&resolver).load_documents(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument { ref source_name, .. } if source_name == "staging"));
    }

    #[test]
    fn test_unknown_top_level_keys_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "config.yml", "version: 2\nproduction:\n  a: 1\n");
        let resolver = EnvironmentResolver::default();
        let documents = ConfigLoader::new(&resolver).load_documents(&path).unwrap();
        assert_eq!(documents.tiers(), vec!["production"]);
    }

    #[test]
    fn test_key_conflict_aborts_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(
            &temp_dir,
            "config.yml",
            "production:\n  log-level: 1\n  log_level: 2\n",
        );
        let resolver = EnvironmentResolver::default();
        let tree = PathTree::new();
        let err = ConfigLoader::new(&resolver)
            .load_into(&tree, &path, "production", true)
            .unwrap_err();
        assert!(matches!(err, Error::KeyConflict { .. }));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_hyphenated_keys_reach_tree() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "config.yml", "production:\n  log-level: debug\n");
        let tree = load(&path, "production", true);
        assert_eq!(text(&tree, "log-level").as_deref(), Some("debug"));
        assert_eq!(text(&tree, "log_level").as_deref(), Some("debug"));
    }

    #[test]
    fn test_apply_unknown_environment() {
        let resolver = EnvironmentResolver::default();
        let err = ConfigLoader::new(&resolver)
            .apply(&PathTree::new(), &DocumentSet::new(), "qa", true)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownEnvironment { .. }));
    }

    #[test]
    fn test_apply_by_ordinal() {
        let resolver = EnvironmentResolver::default();
        let mut documents = DocumentSet::new();
        let production: Mapping = serde_yaml::from_str("a: 1\nb: 1\n").unwrap();
        let staging: Mapping = serde_yaml::from_str("b: 2\n").unwrap();
        documents.insert("production", production);
        documents.insert("staging", staging);

        let tree = PathTree::new();
        ConfigLoader::new(&resolver)
            .apply(&tree, &documents, 25, true)
            .unwrap();
        assert_eq!(tree.get("b"), Some(Value::from(2)));

        let tree = PathTree::new();
        ConfigLoader::new(&resolver)
            .apply(&tree, &documents, 25, false)
            .unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_apply_merges_into_existing_tree() {
        let resolver = EnvironmentResolver::default();
        let mut documents = DocumentSet::new();
        let production: Mapping = serde_yaml::from_str("db:\n  host: prod\n").unwrap();
        documents.insert("production", production);

        let tree = PathTree::from_entries([("db.port", 5432)]);
        ConfigLoader::new(&resolver)
            .apply(&tree, &documents, "production", true)
            .unwrap();
        assert_eq!(tree.get("db.port"), Some(Value::from(5432)));
        assert_eq!(text(&tree, "db.host").as_deref(), Some("prod"));
    }
}
