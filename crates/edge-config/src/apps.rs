//! Application switcher configuration.

use std::path::PathBuf;

use edge_core::Application;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppsConfig {
    /// Preferred order for picking the primary application.
    /// Empty means backend response order.
    #[serde(default)]
    pub priority: Vec<String>,

    /// File holding the last selected application.
    /// Empty means `~/.marketedge/last_application`.
    #[serde(default)]
    pub selection_file: String,
}

impl AppsConfig {
    /// Parsed priority list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if an entry names no known application.
    pub fn priority_applications(&self) -> Result<Vec<Application>, ConfigError> {
        self.priority
            .iter()
            .map(|name| {
                name.parse::<Application>()
                    .map_err(|e| ConfigError::invalid("apps.priority", e.to_string()))
            })
            .collect()
    }

    #[must_use]
    pub fn selection_path(&self) -> Option<PathBuf> {
        if self.selection_file.is_empty() {
            dirs::home_dir().map(|h| h.join(".marketedge").join("last_application"))
        } else {
            Some(PathBuf::from(&self.selection_file))
        }
    }
}
