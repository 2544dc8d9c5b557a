pub mod constants;
pub mod paths;
pub mod settings;

#[cfg(test)]
mod settings_test;

use crate::error::Result;

pub use paths::AppPaths;
pub use settings::Settings;

/// Loaded agent configuration: the filesystem layout plus the persisted
/// settings file.
pub struct Config {
    paths: AppPaths,
    settings: Settings,
}

impl Config {
    pub fn new() -> Result<Self> {
        let paths = AppPaths::new()?;
        let settings = Settings::load(&paths.settings_file)?;

        Ok(Config { paths, settings })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply a change to the settings and persist it.
    pub fn update_settings<F>(&mut self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Settings),
    {
        apply(&mut self.settings);
        self.settings.save(&self.paths.settings_file)
    }
}
