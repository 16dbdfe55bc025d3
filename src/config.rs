//! Config Module - TOML configuration for the shell and its host
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working watch with the standard element ids and no notifications.
//!
//! ```toml
//! [elements]
//! watch-face = "watch-face"
//!
//! [[notifications]]
//! type = "message"
//! label = "New message"
//! default-value = "Hello!"
//!
//! [host]
//! poll-ms = 50
//! initial-path = "/"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::dom::ElementIds;
use crate::error::{Result, ShellError};
use crate::notification::NotificationSpec;
use crate::router::ROOT_KEY;

/// Top-level shell configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ShellConfig {
    /// Element ids of the watch template.
    pub elements: ElementIds,
    /// Notification kinds the notification form can raise.
    pub notifications: Vec<NotificationSpec>,
    /// Terminal host settings.
    pub host: HostConfig,
}

/// Settings for the terminal watch simulator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct HostConfig {
    /// Event poll interval in milliseconds.
    pub poll_ms: u64,
    /// Location hash to navigate to at startup (without the `#`).
    pub initial_path: String,
    /// Where tracing output goes while the terminal is in raw mode.
    pub log_file: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            poll_ms: 50,
            initial_path: ROOT_KEY.to_string(),
            log_file: None,
        }
    }
}

impl ShellConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|error| ShellError::ConfigIo {
            path: path.to_path_buf(),
            error,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), notifications = config.notifications.len(), "loaded shell config");
        Ok(config)
    }
}

// =============================================================================
// TESTS
// =============================================================================
