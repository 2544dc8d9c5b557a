use crate::error::Result;
use log::info;
use std::path::Path;
use std::process::{Command, Stdio};

/// Hands a validated installer over to the operating system.
///
/// The engine never launches anything on its own; the host calls this
/// once a state reports `ready`.
pub trait InstallerLauncher {
    /// Spawn the installer and return without waiting for it to finish.
    fn launch(&self, installer: &Path) -> Result<()>;
}

/// Runs the installer as a detached child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl InstallerLauncher for ProcessLauncher {
    fn launch(&self, installer: &Path) -> Result<()> {
        info!("launching installer {}", installer.display());

        Command::new(installer)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        Ok(())
    }
}
