//! Nested, dotted-path-addressable configuration tree.
//!
//! A [`PathTree`] is a mapping from single-segment string keys to [`Value`]s,
//! where a value is either a raw YAML leaf or another tree. Dotted paths such
//! as `"server.http.port"` are accepted everywhere a key is written and are
//! split into a chain of nested trees before storage, so stored keys never
//! contain the separator.
//!
//! Trees are shared handles: cloning a `PathTree`, or reading a tree-valued
//! entry, yields a live reference into the same storage. Every child keeps a
//! weak link to the tree it was first fetched through.
//!
//! # Merging
//!
//! All writes go through one rule. For each incoming `(key, value)`:
//!
//! 1. a dotted key is rewrapped as `head -> {rest: value}` and the rule recurses;
//! 2. when both the stored and the incoming value are trees, the incoming one
//!    is merged into the stored one in place, keeping unrelated subkeys;
//! 3. otherwise the incoming value replaces the slot, discarding any subtree.
//!
//! # Examples
//!
//! ```
//! use yconf::tree::{PathTree, Value};
//!
//! let tree = PathTree::new();
//! tree.set("a.b.c", "d");
//! tree.set("a.e", "f");
//!
//! assert_eq!(tree.get("a.b.c"), Some(Value::from("d")));
//! assert!(tree.has("a"));
//! assert!(!tree.has("a.b"));
//!
//! tree.set("a", 2);
//! assert_eq!(tree.get("a.b"), None);
//! ```

mod value;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use value::Value;

use std::cell::{OnceCell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, Result};

/// Separator between path segments.
pub const SEPARATOR: char = '.';

struct Node {
    data: RefCell<BTreeMap<String, Value>>,
    parent: OnceCell<Weak<Node>>,
}

/// A shared, mutable node in a tree of configuration values.
///
/// See the [module documentation](self) for the merge rule.
#[derive(Clone)]
pub struct PathTree {
    node: Rc<Node>,
}

impl PathTree {
    /// Creates an empty, parentless tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            node: Rc::new(Node {
                data: RefCell::new(BTreeMap::new()),
                parent: OnceCell::new(),
            }),
        }
    }

    /// Creates a tree seeded from `(path, value)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use yconf::tree::PathTree;
    ///
    /// let tree = PathTree::from_entries([("a.b", "c")]);
    /// assert_eq!(tree.get("a.b").unwrap().as_str(), Some("c"));
    /// ```
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let tree = Self::new();
        tree.update(entries);
        tree
    }

    /// Creates a tree from a parsed YAML mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if any mapping, at any depth, has a
    /// non-string key.
    pub fn from_yaml(mapping: &serde_yaml::Mapping) -> Result<Self> {
        let tree = Self::new();
        tree.merge_yaml(mapping)?;
        Ok(tree)
    }

    /// Resolves a key or dotted path.
    ///
    /// Returns `None` when any segment is missing or when an intermediate
    /// segment holds a leaf instead of a tree.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Value> {
        match path.split_once(SEPARATOR) {
            None => self.child(path),
            Some((head, rest)) => self.child(head)?.as_tree()?.get(rest),
        }
    }

    /// Resolves a key or dotted path, falling back to `default`.
    pub fn get_or(&self, path: &str, default: impl Into<Value>) -> Value {
        self.get(path).unwrap_or_else(|| default.into())
    }

    /// Resolves a key or dotted path that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the path does not resolve.
    pub fn require(&self, path: &str) -> Result<Value> {
        self.get(path).ok_or_else(|| Error::KeyNotFound {
            key: path.to_string(),
        })
    }

    /// Assigns `value` at a key or dotted path using the merge rule.
    pub fn set(&self, path: &str, value: impl Into<Value>) {
        self.merge_entry(path, value.into());
    }

    /// Returns the value at `path`, storing `default` there first if the
    /// path does not resolve.
    pub fn setdefault(&self, path: &str, default: impl Into<Value>) -> Value {
        if let Some(existing) = self.get(path) {
            return existing;
        }
        let value = default.into();
        self.merge_entry(path, value.clone());
        value
    }

    /// Tests whether `key` is a direct entry of this tree.
    ///
    /// Dotted paths are not traversed; use [`get`](Self::get) for that.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.node.data.borrow().contains_key(key)
    }

    /// Walks literal key segments, without splitting them on the separator.
    ///
    /// An empty segment list, a missing segment or a leaf in the middle of the
    /// walk all yield `None`.
    pub fn lookup<I, S>(&self, segments: I) -> Option<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = segments.into_iter();
        let mut value = self.child(segments.next()?.as_ref())?;
        for segment in segments {
            value = value.as_tree()?.child(segment.as_ref())?;
        }
        Some(value)
    }

    /// Like [`lookup`](Self::lookup), falling back to `default`.
    pub fn lookup_or<I, S>(&self, segments: I, default: impl Into<Value>) -> Value
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lookup(segments).unwrap_or_else(|| default.into())
    }

    /// Removes a direct entry and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if `key` is not a direct entry.
    pub fn delete(&self, key: &str) -> Result<Value> {
        self.node
            .data
            .borrow_mut()
            .remove(key)
            .ok_or_else(|| Error::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Merges every `(path, value)` pair into this tree.
    pub fn update<I, K, V>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.merge_entry(key.as_ref(), value.into());
        }
    }

    /// Merges the direct entries of `other` into this tree.
    ///
    /// Subtrees of `other` that land on empty slots are stored as shared
    /// handles, not copies.
    pub fn merge(&self, other: &PathTree) {
        if self.ptr_eq(other) {
            return;
        }
        let entries: Vec<(String, Value)> = other
            .node
            .data
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for (key, value) in entries {
            self.merge_entry(&key, value);
        }
    }

    /// Merges a parsed YAML mapping into this tree.
    ///
    /// The whole mapping is converted before anything is written, so an
    /// error leaves the tree untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] if any mapping has a non-string key.
    pub fn merge_yaml(&self, mapping: &serde_yaml::Mapping) -> Result<()> {
        let entries = mapping
            .iter()
            .map(|(key, value)| -> Result<_> {
                Ok((yaml_key(key)?, Value::try_from(value.clone())?))
            })
            .collect::<Result<Vec<_>>>()?;
        for (key, value) in entries {
            self.merge_entry(&key, value);
        }
        Ok(())
    }

    /// Direct entries in key order.
    #[must_use]
    pub fn items(&self) -> Vec<(String, Value)> {
        let entries: Vec<(String, Value)> = self
            .node
            .data
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for (_, value) in &entries {
            if let Value::Tree(child) = value {
                self.adopt(child);
            }
        }
        entries
    }

    /// Direct keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.node.data.borrow().keys().cloned().collect()
    }

    /// Direct values in key order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.items().into_iter().map(|(_, value)| value).collect()
    }

    /// Number of direct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.node.data.borrow().len()
    }

    /// Whether the tree has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node.data.borrow().is_empty()
    }

    /// The tree this node was first fetched through, if it is still alive.
    #[must_use]
    pub fn parent(&self) -> Option<PathTree> {
        self.node
            .parent
            .get()
            .and_then(Weak::upgrade)
            .map(|node| PathTree { node })
    }

    /// Whether both handles refer to the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &PathTree) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// A detached plain-YAML snapshot of the whole tree.
    #[must_use]
    pub fn to_mapping(&self) -> serde_yaml::Mapping {
        self.node
            .data
            .borrow()
            .iter()
            .map(|(key, value)| (serde_yaml::Value::String(key.clone()), value.to_yaml()))
            .collect()
    }

    /// Deserializes the tree into a typed view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] if the tree does not match `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde::Deserialize;
    /// use yconf::tree::PathTree;
    ///
    /// #[derive(Deserialize)]
    /// struct Server {
    ///     host: String,
    ///     port: u16,
    /// }
    ///
    /// let tree = PathTree::from_entries([("server.host", "localhost")]);
    /// tree.set("server.port", 8080);
    ///
    /// let server: Server = tree.get("server").unwrap().extract().unwrap();
    /// assert_eq!(server.host, "localhost");
    /// assert_eq!(server.port, 8080);
    /// ```
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_yaml::from_value(serde_yaml::Value::Mapping(
            self.to_mapping(),
        ))?)
    }

    fn child(&self, key: &str) -> Option<Value> {
        let value = self.node.data.borrow().get(key).cloned()?;
        if let Value::Tree(child) = &value {
            self.adopt(child);
        }
        Some(value)
    }

    fn adopt(&self, child: &PathTree) {
        if !self.ptr_eq(child) {
            // A parent that is already set is kept.
            let _ = child.node.parent.set(Rc::downgrade(&self.node));
        }
    }

    fn merge_entry(&self, key: &str, value: Value) {
        let value = match value {
            Value::Leaf(serde_yaml::Value::Mapping(mapping)) => match Self::from_yaml(&mapping) {
                Ok(tree) => Value::Tree(tree),
                // Non-string keys cannot be addressed by path.
                Err(_) => Value::Leaf(serde_yaml::Value::Mapping(mapping)),
            },
            value => value,
        };
        let (key, value) = match key.split_once(SEPARATOR) {
            Some((head, rest)) => {
                let nested = Self::new();
                nested.merge_entry(rest, value);
                (head, Value::Tree(nested))
            }
            None => (key, value),
        };

        let current = match self.node.data.borrow().get(key) {
            Some(Value::Tree(tree)) => Some(tree.clone()),
            _ => None,
        };
        match (current, value) {
            (Some(current), Value::Tree(incoming)) => current.merge(&incoming),
            (_, value) => {
                self.node.data.borrow_mut().insert(key.to_string(), value);
            }
        }
    }
}

impl Default for PathTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PathTree {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.node.data.borrow() == *other.node.data.borrow()
    }
}

impl<K, V> FromIterator<(K, V)> for PathTree
where
    K: AsRef<str>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl fmt::Debug for PathTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PathTree ")?;
        f.debug_map()
            .entries(self.node.data.borrow().iter())
            .finish()
    }
}

impl fmt::Display for PathTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (key, value)) in self.node.data.borrow().iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

impl Serialize for PathTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let data = self.node.data.borrow();
        let mut map = serializer.serialize_map(Some(data.len()))?;
        for (key, value) in data.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn yaml_key(key: &serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(key) => Ok(key.clone()),
        other => Err(Error::InvalidKey {
            key: Value::Leaf(other.clone()).to_string(),
        }),
    }
}
