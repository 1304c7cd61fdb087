//! Hyphen-to-underscore key normalization for parsed YAML.
//!
//! Every mapping that has a key like `log-level` additionally exposes the
//! same value under `log_level`. Both spellings coexist. A mapping that
//! already spells both forms as distinct keys is ambiguous and rejected.

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Parses a YAML document and normalizes its keys.
///
/// An empty document parses to `Value::Null`.
///
/// # Errors
///
/// Returns [`Error::Yaml`] for malformed YAML and [`Error::KeyConflict`] when
/// a mapping contains both spellings of a key.
///
/// # Examples
///
/// ```
/// use yconf::config::normalize::parse_document;
///
/// let doc = parse_document("test-level: 1\n").unwrap();
/// assert_eq!(doc["test-level"], doc["test_level"]);
/// ```
pub fn parse_document(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_yaml::from_str(text)?;
    normalize_keys(value)
}

/// Normalizes hyphenated keys of every mapping in `value`, at any depth.
///
/// # Errors
///
/// Returns [`Error::KeyConflict`] when a mapping contains both `foo-bar` and
/// `foo_bar`; the error names both keys.
pub fn normalize_keys(value: Value) -> Result<Value> {
    match value {
        Value::Mapping(mapping) => normalize_mapping(mapping).map(Value::Mapping),
        Value::Sequence(items) => items
            .into_iter()
            .map(normalize_keys)
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        Value::Tagged(mut tagged) => {
            tagged.value = normalize_keys(tagged.value)?;
            Ok(Value::Tagged(tagged))
        }
        scalar => Ok(scalar),
    }
}

fn normalize_mapping(mapping: Mapping) -> Result<Mapping> {
    let mut result = Mapping::with_capacity(mapping.len());
    for (key, value) in &mapping {
        let value = normalize_keys(value.clone())?;
        if let Some(original) = key.as_str().filter(|k| k.contains('-')) {
            let normalized = original.replace('-', "_");
            if mapping.contains_key(normalized.as_str()) {
                return Err(Error::KeyConflict {
                    normalized,
                    original: original.to_string(),
                });
            }
            result.insert(Value::String(normalized), value.clone());
        }
        result.insert(key.clone(), value);
    }
    Ok(result)
}
