use clap::{Parser, Subcommand};
use log::error;
use std::sync::Arc;
use updraft::config::{constants, Config, Settings};
use updraft::error::{Result, UpdateError};
use updraft::feed::Version;
use updraft::http::ReqwestClient;
use updraft::logging;
use updraft::update::{
    InstallerLauncher, ProcessLauncher, UpdateContext, UpdateOptions, UpdateState,
};

#[derive(Parser)]
#[command(name = "updraft")]
#[command(about = "Auto-update agent for desktop applications")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the release feed for a newer version
    Check {
        /// Include early-access releases
        #[arg(long)]
        early_access: bool,
    },

    /// Download the newest installer into the local cache and verify it
    Download {
        /// Include early-access releases
        #[arg(long)]
        early_access: bool,
    },

    /// Download, verify and launch the newest installer
    Install {
        /// Include early-access releases
        #[arg(long)]
        early_access: bool,
    },

    /// Show or change the agent configuration
    Config {
        /// Enable/disable the early-access channel
        #[arg(long)]
        early_access: Option<bool>,

        /// Show current configuration
        #[arg(long, short)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = Config::new()?;
    logging::init_logging(&config.paths().log_file)?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check { early_access }) => check(&config, early_access).await,
        Some(Commands::Download { early_access }) => download(&config, early_access).await,
        Some(Commands::Install { early_access }) => install(&config, early_access).await,
        Some(Commands::Config { early_access, show }) => configure(&mut config, early_access, show),
        None => check(&config, false).await,
    }
}

fn current_version() -> Result<Version> {
    env!("CARGO_PKG_VERSION")
        .parse()
        .map_err(|e| UpdateError::InvalidConfiguration(format!("package version: {e}")))
}

fn build_state(config: &Config) -> Result<UpdateState<ReqwestClient>> {
    let client = ReqwestClient::new()?;
    let options = UpdateOptions {
        feed_url: Box::new(Settings::feed_endpoint),
        updates_path: config.paths().updates_dir.clone(),
        current_version: current_version()?,
        early_access_category: constants::EARLY_ACCESS_CATEGORY.to_string(),
    };

    Ok(UpdateState::new(Arc::new(UpdateContext::new(
        client, options,
    ))))
}

async fn check(config: &Config, early_access: bool) -> Result<()> {
    let early_access = early_access || config.settings().early_access;
    println!("Checking for updates...");

    let state = build_state(config)?.latest(early_access).await?;

    let Some(release) = state.new_release() else {
        println!("You are running the latest version.");
        return Ok(());
    };

    println!("Update available: {}", release.version());
    if config.settings().show_release_notes {
        for line in release.change_log() {
            println!("  - {line}");
        }
    }

    if !config.settings().auto_download {
        println!("Run 'updraft download' to fetch the installer.");
        return Ok(());
    }

    let state = state.downloaded().await?;
    let state = state.validated().await?;
    if !state.ready() {
        error!("installer failed checksum verification");
        println!("Downloaded installer failed verification; not installing.");
        return Ok(());
    }
    println!("Installer downloaded and verified.");

    if config.settings().auto_install {
        if let Some(path) = state.installer_path() {
            println!("Launching installer...");
            ProcessLauncher.launch(path)?;
        }
    } else {
        println!("Run 'updraft install' to apply the update.");
    }

    Ok(())
}

async fn download(config: &Config, early_access: bool) -> Result<()> {
    let early_access = early_access || config.settings().early_access;

    let state = build_state(config)?.latest(early_access).await?;
    if !state.available() {
        println!("You are running the latest version.");
        return Ok(());
    }

    let release = state
        .new_release()
        .map(|r| r.version().to_string())
        .unwrap_or_default();
    println!("Downloading {release}...");

    let state = state.downloaded().await?;
    let state = state.validated().await?;

    if state.ready() {
        println!("Installer verified and ready.");
    } else {
        error!("installer failed checksum verification");
        println!("Download completed but the checksum does not match; not installing.");
    }

    Ok(())
}

async fn install(config: &Config, early_access: bool) -> Result<()> {
    let early_access = early_access || config.settings().early_access;

    let state = build_state(config)?.latest(early_access).await?;
    if !state.available() {
        println!("You are running the latest version.");
        return Ok(());
    }

    let state = state.downloaded().await?;
    let state = state.validated().await?;

    if !state.ready() {
        println!("Installer failed verification; aborting.");
        return Ok(());
    }

    if let Some(path) = state.installer_path() {
        println!("Launching installer...");
        ProcessLauncher.launch(path)?;
    }

    Ok(())
}

fn configure(config: &mut Config, early_access: Option<bool>, show: bool) -> Result<()> {
    if show {
        let settings = config.settings();
        println!("Current configuration:");
        println!("  Early access: {}", settings.early_access);
        println!("  Auto-download: {}", settings.auto_download);
        println!("  Auto-install: {}", settings.auto_install);
        println!("  Feed endpoint: {}", Settings::feed_endpoint());
        println!("  Updates directory: {}", config.paths().updates_dir.display());
        return Ok(());
    }

    let mut changed = false;

    if let Some(enabled) = early_access {
        config.update_settings(|s| {
            s.early_access = enabled;
        })?;
        println!(
            "Early access {}",
            if enabled { "enabled" } else { "disabled" }
        );
        changed = true;
    }

    if !changed {
        println!("No changes made. Use --show to see current configuration.");
    }

    Ok(())
}
