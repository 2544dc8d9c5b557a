pub mod launcher;
pub mod state;


pub use launcher::{InstallerLauncher, ProcessLauncher};
pub use state::{UpdateContext, UpdateOptions, UpdateState};
