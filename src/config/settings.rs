use crate::config::constants;
use crate::error::{Result, UpdateError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Persisted user preferences for the update agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Opt in to releases from the early-access channel.
    #[serde(default)]
    pub early_access: bool,
    pub auto_download: bool,
    pub auto_install: bool,
    pub show_release_notes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            early_access: false,
            auto_download: true,
            auto_install: false, // installing replaces the running build, ask first
            show_release_notes: true,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let settings = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| {
                UpdateError::InvalidConfiguration(format!(
                    "settings file {}: {e}",
                    path.display()
                ))
            })?
        } else {
            Self::default()
        };

        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| UpdateError::InvalidConfiguration(format!("settings: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The release feed URL, with support for an environment override
    /// during development and testing.
    pub fn feed_endpoint() -> String {
        if let Ok(feed_url) = std::env::var("UPDRAFT_FEED_URL") {
            return feed_url;
        }

        constants::endpoints::FEED.to_string()
    }
}
