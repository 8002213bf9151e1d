//! Option registration and per-message option resolution.
//!
//! Options are registered once when the sink is configured, either with a
//! fixed value or as dynamic keys whose value is supplied with every message.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::PublishError;

pub const MESSAGE_GROUP_ID: &str = "message-group-id";
pub const DEDUPLICATION_ID: &str = "deduplication-id";

/// Per-message option values, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicOptions(BTreeMap<String, String>);

impl DynamicOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

impl<K, V> FromIterator<(K, V)> for DynamicOptions
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisteredOption {
    Static { key: String, value: String },
    Dynamic { key: String },
}

impl RegisteredOption {
    pub fn key(&self) -> &str {
        match self {
            RegisteredOption::Static { key, .. } | RegisteredOption::Dynamic { key } => key,
        }
    }

    /// Resolve this option for one message.
    ///
    /// # Errors
    ///
    /// Returns `OptionNotResolved` when a dynamic option has no value in `dynamic`.
    pub fn value(&self, dynamic: &DynamicOptions) -> Result<String, PublishError> {
        match self {
            RegisteredOption::Static { value, .. } => Ok(value.clone()),
            RegisteredOption::Dynamic { key } => dynamic
                .get(key)
                .map(str::to_owned)
                .ok_or_else(|| PublishError::OptionNotResolved { key: key.clone() }),
        }
    }
}

/// Options known to a sink, fixed after configuration.
#[derive(Debug, Clone, Default)]
pub struct OptionHolder {
    options: BTreeMap<String, RegisteredOption>,
}

impl OptionHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_static(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.options.insert(
            key.clone(),
            RegisteredOption::Static {
                key,
                value: value.into(),
            },
        );
        self
    }

    pub fn with_dynamic(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.options
            .insert(key.clone(), RegisteredOption::Dynamic { key });
        self
    }

    /// # Errors
    ///
    /// Returns `Config` if `key` was never registered on this sink.
    pub fn validate_and_get(&self, key: &str) -> Result<&RegisteredOption, PublishError> {
        self.options
            .get(key)
            .ok_or_else(|| PublishError::Config(format!("option '{key}' is not configured")))
    }

    pub fn dynamic_keys(&self) -> BTreeSet<&str> {
        self.options
            .values()
            .filter_map(|opt| match opt {
                RegisteredOption::Dynamic { key } => Some(key.as_str()),
                RegisteredOption::Static { .. } => None,
            })
            .collect()
    }

    pub fn is_dynamic(&self, key: &str) -> bool {
        matches!(self.options.get(key), Some(RegisteredOption::Dynamic { .. }))
    }
}
