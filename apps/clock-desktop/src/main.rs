//! City Hall Clock entry point.

mod app;
mod config;
mod resources;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use cityclock_chime::{AudioBuffer, LocalClock, OutputDevice, Scheduler, SchedulerConfig};
use cityclock_tray::{TrayConfig, TrayHandle};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::resources::Resources;

fn main() -> ExitCode {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting City Hall Clock"
    );

    match run() {
        Ok(()) => {
            tracing::info!("clock shut down cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let resources = Resources::locate()?;
    let config = Config::load(&resources).context("cannot load configuration")?;
    tracing::info!(resources = %resources.dir().display(), "resources located");

    // -- Audio: nothing to do without it --
    let chime = AudioBuffer::open(&resources.path(&config.chime_file))
        .context("cannot load chime sound")?;
    let device =
        OutputDevice::open(&chime, config.output_buffer()).context("cannot open audio output")?;

    // -- Tray --
    let icon = resources.read(&config.icon_file)?;
    let tray_config = TrayConfig {
        icon_data: Some(icon),
        ..TrayConfig::default()
    };
    let (tray_handle, event_tx, update_rx) = TrayHandle::new();

    // Build the tokio runtime; the main thread belongs to the tray.
    let rt = tokio::runtime::Runtime::new()?;
    let scheduler = Arc::new(Scheduler::new(
        chime,
        Arc::new(device.sink()),
        SchedulerConfig::default(),
    ));
    let clock = rt.spawn(app::run(scheduler, Arc::new(LocalClock), tray_handle));

    let tray_result = cityclock_tray::run(tray_config, event_tx, update_rx);

    // The event sender is gone by now, so the core winds down on its own.
    rt.block_on(clock).context("clock task panicked")??;
    tray_result.context("tray failed")?;

    drop(device);
    Ok(())
}
