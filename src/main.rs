#![forbid(unsafe_code)]

mod color;
mod config;
mod constants;
mod gui;
mod ipc;
mod overlay;
mod types;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use config::ConfigStore;

/// Configurable crosshair overlay for X11
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Run the overlay daemon instead of the settings window
    #[arg(long)]
    overlay: bool,

    /// Preset directory (defaults to the per-user config directory)
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    if args.overlay {
        info!("Starting overlay daemon");
        overlay::run_overlay_daemon()
    } else {
        let mut store = ConfigStore::open_default();
        if let Some(dir) = args.config_dir {
            store.set_directory(dir)?;
        }
        info!(dir = %store.dir().display(), "Starting settings window");
        gui::run_gui(store)
    }
}
