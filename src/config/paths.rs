use crate::error::{Result, UpdateError};
use std::path::PathBuf;

/// Per-user filesystem layout of the update agent.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub settings_file: PathBuf,
    pub updates_dir: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    pub fn new() -> Result<Self> {
        let app_name = "updraft";

        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                UpdateError::InvalidConfiguration(
                    "could not determine config directory".to_string(),
                )
            })?
            .join(app_name);

        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| {
                UpdateError::InvalidConfiguration("could not determine data directory".to_string())
            })?
            .join(app_name);

        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| {
                UpdateError::InvalidConfiguration(
                    "could not determine cache directory".to_string(),
                )
            })?
            .join(app_name);

        std::fs::create_dir_all(&config_dir)?;
        std::fs::create_dir_all(&data_dir)?;
        std::fs::create_dir_all(&cache_dir)?;

        Ok(AppPaths {
            settings_file: config_dir.join("settings.json"),
            // Created lazily by the cache on first download.
            updates_dir: data_dir.join("updates"),
            log_file: cache_dir.join("updraft.log"),
            config_dir,
            data_dir,
        })
    }
}
