//! Ordered environment tiers.
//!
//! Each deployment environment has a name and an integer ordinal. Lower
//! ordinals are more restrictive (production-like); higher ordinals are more
//! permissive. The loader layers tiers in ascending ordinal order, so the
//! ordering must be total: ordinals are required to be distinct.

use std::fmt;

use crate::error::{Error, Result};
use crate::tree::Value;

/// Ordinal of the default `production` tier.
pub const PRODUCTION: i64 = 10;
/// Ordinal of the default `staging` tier.
pub const STAGING: i64 = 20;
/// Ordinal of the default `development` tier.
pub const DEVELOPMENT: i64 = 30;

/// A named environment tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    name: String,
    ordinal: i64,
}

impl Tier {
    /// The symbolic name, e.g. `staging`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rank used for ordering.
    #[must_use]
    pub const fn ordinal(&self) -> i64 {
        self.ordinal
    }
}

/// An environment given either by ordinal or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// A numeric ordinal, used as-is.
    Ordinal(i64),
    /// A symbolic tier name.
    Name(String),
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinal(ordinal) => write!(f, "{ordinal}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for Environment {
    fn from(ordinal: i64) -> Self {
        Self::Ordinal(ordinal)
    }
}

impl From<i32> for Environment {
    fn from(ordinal: i32) -> Self {
        Self::Ordinal(i64::from(ordinal))
    }
}

impl From<&str> for Environment {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Environment {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&Environment> for Environment {
    fn from(environment: &Environment) -> Self {
        environment.clone()
    }
}

impl TryFrom<&Value> for Environment {
    type Error = Error;

    /// Integer leaves become ordinals and string leaves become names; any
    /// other shape is [`Error::InvalidEnvironmentType`].
    fn try_from(value: &Value) -> Result<Self> {
        if let Some(ordinal) = value.as_i64() {
            return Ok(Self::Ordinal(ordinal));
        }
        if let Some(name) = value.as_str() {
            return Ok(Self::Name(name.to_string()));
        }
        Err(Error::InvalidEnvironmentType {
            found: value.to_string(),
        })
    }
}

/// Translates between environment names and ordinals.
///
/// # Examples
///
/// ```
/// use yconf::config::EnvironmentResolver;
///
/// let resolver = EnvironmentResolver::default();
/// let production = resolver.ordinal("production").unwrap();
/// let staging = resolver.ordinal("staging").unwrap();
/// assert!(production < staging);
/// assert_eq!(resolver.name(staging), Some("staging"));
/// assert_eq!(resolver.ordinal(20).unwrap(), 20);
/// assert!(resolver.ordinal("qa").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentResolver {
    /// Sorted by ascending ordinal; never empty.
    tiers: Vec<Tier>,
}

impl EnvironmentResolver {
    /// Builds a resolver from `(name, ordinal)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTiers`] if no tiers are given, or if a name or
    /// an ordinal appears twice.
    pub fn new<I, S>(tiers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut tiers: Vec<Tier> = tiers
            .into_iter()
            .map(|(name, ordinal)| Tier {
                name: name.into(),
                ordinal,
            })
            .collect();

        if tiers.is_empty() {
            return Err(Error::InvalidTiers {
                reason: "at least one tier is required".to_string(),
            });
        }

        tiers.sort_by_key(Tier::ordinal);
        for pair in tiers.windows(2) {
            if pair[0].ordinal == pair[1].ordinal {
                return Err(Error::InvalidTiers {
                    reason: format!(
                        "tiers '{}' and '{}' share ordinal {}",
                        pair[0].name, pair[1].name, pair[0].ordinal
                    ),
                });
            }
        }
        for (index, tier) in tiers.iter().enumerate() {
            if tiers[..index].iter().any(|other| other.name == tier.name) {
                return Err(Error::InvalidTiers {
                    reason: format!("duplicate tier name '{}'", tier.name),
                });
            }
        }

        Ok(Self { tiers })
    }

    /// Resolves an environment to its ordinal.
    ///
    /// Ordinals are returned unchanged, even when no tier uses them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEnvironment`] for a name outside the tier set.
    pub fn ordinal(&self, environment: impl Into<Environment>) -> Result<i64> {
        match environment.into() {
            Environment::Ordinal(ordinal) => Ok(ordinal),
            Environment::Name(name) => self
                .tiers
                .iter()
                .find(|tier| tier.name == name)
                .map(Tier::ordinal)
                .ok_or(Error::UnknownEnvironment { name }),
        }
    }

    /// Resolves a dynamically typed environment value to its ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEnvironmentType`] if `value` is neither an
    /// integer nor a string, and [`Error::UnknownEnvironment`] for an
    /// unrecognized name.
    pub fn ordinal_of(&self, value: &Value) -> Result<i64> {
        self.ordinal(Environment::try_from(value)?)
    }

    /// The tier name for an ordinal.
    #[must_use]
    pub fn name(&self, ordinal: i64) -> Option<&str> {
        self.tiers
            .iter()
            .find(|tier| tier.ordinal == ordinal)
            .map(Tier::name)
    }

    /// The tier an environment refers to, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEnvironment`] for a name outside the tier set.
    pub fn tier(&self, environment: impl Into<Environment>) -> Result<Option<&Tier>> {
        let ordinal = self.ordinal(environment)?;
        Ok(self.tiers.iter().find(|tier| tier.ordinal == ordinal))
    }

    /// All tiers in ascending ordinal order.
    #[must_use]
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// All tier names in ascending ordinal order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tiers.iter().map(Tier::name).collect()
    }

    /// The tier with the lowest ordinal.
    #[must_use]
    pub fn most_restrictive(&self) -> &Tier {
        &self.tiers[0]
    }
}

impl Default for EnvironmentResolver {
    fn default() -> Self {
        Self {
            tiers: vec![
                Tier {
                    name: "production".to_string(),
                    ordinal: PRODUCTION,
                },
                Tier {
                    name: "staging".to_string(),
                    ordinal: STAGING,
                },
                Tier {
                    name: "development".to_string(),
                    ordinal: DEVELOPMENT,
                },
            ],
        }
    }
}
