//! Container configuration.

use std::env;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ContainerOptions::max_depth`]
pub const MAX_DEPTH_ENV: &str = "FERRULE_MAX_DEPTH";
/// Environment variable overriding [`ContainerOptions::duplicates`]
pub const DUPLICATES_ENV: &str = "FERRULE_DUPLICATES";

const DEFAULT_MAX_DEPTH: usize = 1024;

/// What happens when a contract is registered twice.
///
/// The policy applies uniformly to every registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateRegistration` and keep the first registration
    #[default]
    Reject,
    /// The later registration wins
    Replace,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(DuplicatePolicy::Reject),
            "replace" => Ok(DuplicatePolicy::Replace),
            other => Err(format!("unknown duplicate policy '{}'", other)),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Reject => f.write_str("reject"),
            DuplicatePolicy::Replace => f.write_str("replace"),
        }
    }
}

/// Tunables for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```
/// use ferrule::{Container, ContainerOptions, DuplicatePolicy};
///
/// let options = ContainerOptions::default()
///     .with_max_depth(64)
///     .with_duplicates(DuplicatePolicy::Replace);
///
/// let container = Container::with_options(options);
/// container.add_instance(1u8).unwrap();
/// container.add_instance(2u8).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Deepest allowed chain of nested resolutions on one thread
    pub max_depth: usize,
    /// Duplicate registration policy
    pub duplicates: DuplicatePolicy,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            duplicates: DuplicatePolicy::Reject,
        }
    }
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the depth limit; values below 1 are raised to 1.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Defaults overridden by `FERRULE_MAX_DEPTH` and `FERRULE_DUPLICATES`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();

        if let Some(raw) = lookup(MAX_DEPTH_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => options.max_depth = depth,
                _ => tracing::warn!(variable = MAX_DEPTH_ENV, value = %raw, "ignoring invalid max depth"),
            }
        }

        if let Some(raw) = lookup(DUPLICATES_ENV) {
            match raw.parse::<DuplicatePolicy>() {
                Ok(policy) => options.duplicates = policy,
                Err(error) => tracing::warn!(variable = DUPLICATES_ENV, %error, "ignoring invalid duplicate policy"),
            }
        }

        options
    }

    /// Parses options from JSON; missing fields keep their defaults.
    ///
    /// ```
    /// use ferrule::{ContainerOptions, DuplicatePolicy};
    ///
    /// let options = ContainerOptions::from_json(r#"{ "duplicates": "replace" }"#).unwrap();
    /// assert_eq!(options.duplicates, DuplicatePolicy::Replace);
    /// assert_eq!(options.max_depth, ContainerOptions::default().max_depth);
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
