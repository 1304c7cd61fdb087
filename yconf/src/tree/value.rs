//! Values stored in a [`PathTree`].

use std::fmt;

use serde::de::DeserializeOwned;
use serde::ser::{Serialize, Serializer};

use super::PathTree;
use crate::error::{Error, Result};

/// A value held by a [`PathTree`] entry.
///
/// Leaves carry raw YAML values and are passed through unmodified; this
/// includes sequences and any other collection that is not a tree. Mappings
/// converted with [`TryFrom<serde_yaml::Value>`] always become trees.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// A scalar or opaque collection.
    Leaf(serde_yaml::Value),
    /// A nested tree, shared with whoever else holds the handle.
    Tree(PathTree),
}

impl Value {
    /// The null leaf.
    #[must_use]
    pub const fn null() -> Self {
        Self::Leaf(serde_yaml::Value::Null)
    }

    /// Returns the tree if this is a tree value.
    #[must_use]
    pub fn as_tree(&self) -> Option<&PathTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Leaf(_) => None,
        }
    }

    /// Converts into the tree handle if this is a tree value.
    #[must_use]
    pub fn into_tree(self) -> Option<PathTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Leaf(_) => None,
        }
    }

    /// Returns the raw YAML value if this is a leaf.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&serde_yaml::Value> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Tree(_) => None,
        }
    }

    /// Whether this is a tree value.
    #[must_use]
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree(_))
    }

    /// Whether this is a null leaf.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Leaf(serde_yaml::Value::Null))
    }

    /// Returns the string if this is a string leaf.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_leaf()?.as_str()
    }

    /// Returns the integer if this is an integer leaf that fits in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_leaf()?.as_i64()
    }

    /// Returns the number as `f64` if this is a numeric leaf.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_leaf()?.as_f64()
    }

    /// Returns the boolean if this is a boolean leaf.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_leaf()?.as_bool()
    }

    /// Returns the sequence if this is a sequence leaf.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&serde_yaml::Sequence> {
        self.as_leaf()?.as_sequence()
    }

    /// A detached plain-YAML copy of this value.
    #[must_use]
    pub fn to_yaml(&self) -> serde_yaml::Value {
        match self {
            Self::Leaf(value) => value.clone(),
            Self::Tree(tree) => serde_yaml::Value::Mapping(tree.to_mapping()),
        }
    }

    /// Deserializes this value into a typed view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] if the value does not match `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_yaml::from_value(self.to_yaml())?)
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = Error;

    fn try_from(value: serde_yaml::Value) -> Result<Self> {
        match value {
            serde_yaml::Value::Mapping(mapping) => Ok(Self::Tree(PathTree::from_yaml(&mapping)?)),
            other => Ok(Self::Leaf(other)),
        }
    }
}

impl From<PathTree> for Value {
    fn from(tree: PathTree) -> Self {
        Self::Tree(tree)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Leaf(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Leaf(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Leaf(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Leaf(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Leaf(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Leaf(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Leaf(value.into())
    }
}

impl<T: Into<serde_yaml::Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::Leaf(values.into())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(value) => value.serialize(serializer),
            Self::Tree(tree) => tree.serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(value) => fmt_leaf(value, f),
            Self::Tree(tree) => fmt::Display::fmt(tree, f),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(value) => fmt_leaf(value, f),
            Self::Tree(tree) => fmt::Debug::fmt(tree, f),
        }
    }
}

fn fmt_leaf(value: &serde_yaml::Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        serde_yaml::Value::Null => f.write_str("null"),
        serde_yaml::Value::Bool(b) => write!(f, "{b}"),
        serde_yaml::Value::Number(n) => write!(f, "{n}"),
        serde_yaml::Value::String(s) => write!(f, "{s:?}"),
        serde_yaml::Value::Sequence(items) => {
            f.write_str("[")?;
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                fmt_leaf(item, f)?;
            }
            f.write_str("]")
        }
        serde_yaml::Value::Mapping(mapping) => {
            f.write_str("{")?;
            for (index, (key, item)) in mapping.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                fmt_leaf(key, f)?;
                f.write_str(": ")?;
                fmt_leaf(item, f)?;
            }
            f.write_str("}")
        }
        serde_yaml::Value::Tagged(tagged) => {
            write!(f, "{} ", tagged.tag)?;
            fmt_leaf(&tagged.value, f)
        }
    }
}
