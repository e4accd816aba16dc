//! Session lifecycle configuration: token refresh, idle tracking, storage.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Auto-refresh tick, in seconds (14 minutes, inside a 15 minute token lifetime).
const fn default_token_refresh_interval_secs() -> u64 {
    840
}

/// Refresh a JWT when it expires within this many seconds.
const fn default_refresh_buffer_secs() -> u64 {
    60
}

const fn default_activity_check_interval_secs() -> u64 {
    60
}

/// Idle logout threshold, in seconds.
const fn default_idle_timeout_secs() -> u64 {
    1800
}

fn default_keyring_service() -> String {
    "marketedge".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_token_refresh_interval_secs")]
    pub token_refresh_interval_secs: u64,

    #[serde(default = "default_refresh_buffer_secs")]
    pub refresh_buffer_secs: u64,

    #[serde(default = "default_activity_check_interval_secs")]
    pub activity_check_interval_secs: u64,

    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// OS keychain service name for stored tokens.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Credentials file used when the keychain is unavailable.
    /// Empty means `~/.marketedge/credentials`.
    #[serde(default)]
    pub credentials_file: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_refresh_interval_secs: default_token_refresh_interval_secs(),
            refresh_buffer_secs: default_refresh_buffer_secs(),
            activity_check_interval_secs: default_activity_check_interval_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            keyring_service: default_keyring_service(),
            credentials_file: String::new(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub const fn token_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.token_refresh_interval_secs)
    }

    #[must_use]
    pub const fn refresh_buffer(&self) -> Duration {
        Duration::from_secs(self.refresh_buffer_secs)
    }

    #[must_use]
    pub const fn activity_check_interval(&self) -> Duration {
        Duration::from_secs(self.activity_check_interval_secs)
    }

    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Resolved credentials file path, or `None` when no home directory exists.
    #[must_use]
    pub fn credentials_path(&self) -> Option<PathBuf> {
        if self.credentials_file.is_empty() {
            dirs::home_dir().map(|h| h.join(".marketedge").join("credentials"))
        } else {
            Some(PathBuf::from(&self.credentials_file))
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            (
                "session.token_refresh_interval_secs",
                self.token_refresh_interval_secs,
            ),
            (
                "session.activity_check_interval_secs",
                self.activity_check_interval_secs,
            ),
            ("session.idle_timeout_secs", self.idle_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be positive"));
            }
        }
        if self.keyring_service.trim().is_empty() {
            return Err(ConfigError::invalid(
                "session.keyring_service",
                "must not be empty",
            ));
        }
        Ok(())
    }
}
