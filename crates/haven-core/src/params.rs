//! Raw request parameters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Query parameters exactly as received, before any interpretation.
///
/// When a name is repeated the last value wins. Lookups trim whitespace and
/// treat blank values as absent, so `?city=` and a missing `city` are the same.
///
/// # Example
///
/// ```
/// use haven_core::RawParams;
///
/// let params = RawParams::from_pairs([("city", "Austin"), ("state", "  "), ("city", "Dallas")]);
/// assert_eq!(params.get("city"), Some("Dallas"));
/// assert_eq!(params.get("state"), None);
/// assert_eq!(params.get("type"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawParams(IndexMap<String, String>);

impl RawParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a parameter set from name/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (name, value) in pairs {
            params.insert(name, value);
        }
        params
    }

    /// Sets a parameter, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns the trimmed value of a parameter, or `None` if absent or blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Number of parameters received (including blank ones).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no parameters were received.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
