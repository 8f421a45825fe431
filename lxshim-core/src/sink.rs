//! Configuration sink for backend config items

use std::convert::Infallible;
use std::fmt;

/// Key-value sink receiving backend configuration items
///
/// Implemented by the container backend handle. Errors are passed through
/// to the caller unchanged, wrapped with the key being written.
pub trait ConfigSink {
    /// Error reported when an item is rejected
    type Error: std::error::Error + Send + Sync + 'static;

    /// Set a single configuration item
    ///
    /// # Errors
    /// Returns the backend's error if the item is rejected
    fn set_config_item(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// In-memory sink recording items in the order they were written
///
/// # Example
/// ```
/// use lxshim_core::{ConfigMap, ConfigSink};
///
/// let mut config = ConfigMap::new();
/// config.set_config_item("lxc.uts.name", "box").unwrap();
///
/// assert_eq!(config.get("lxc.uts.name"), Some("box"));
/// assert_eq!(config.to_string(), "lxc.uts.name = box\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    items: Vec<(String, String)>,
}

impl ConfigMap {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All writes, in order
    #[must_use]
    pub fn items(&self) -> &[(String, String)] {
        &self.items
    }

    /// Number of writes
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing was written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ConfigSink for ConfigMap {
    type Error = Infallible;

    fn set_config_item(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.items.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

/// Rendered as LXC config lines
impl fmt::Display for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.items {
            writeln!(f, "{key} = {value}")?;
        }
        Ok(())
    }
}
