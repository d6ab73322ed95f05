//! Application orchestrator: starts the chimes once the tray is up and
//! tears everything down when the user quits.

use std::sync::Arc;
use std::time::Duration;

use cityclock_chime::{Clock, Scheduler};
use cityclock_tray::{TrayEvent, TrayHandle};

/// How long in-flight chimes may keep playing after quit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Interval for polling the tray channel.
const TRAY_POLL: Duration = Duration::from_millis(100);

/// Runs the clock until the tray asks to quit or Ctrl-C arrives.
pub async fn run(scheduler: Arc<Scheduler>, clock: Arc<dyn Clock>, tray: TrayHandle) -> anyhow::Result<()> {
    // -- Wait for the tray to come up --
    tokio::select! {
        event = next_event(&tray) => match event {
            Some(TrayEvent::Ready) => {}
            Some(TrayEvent::QuitRequested) | None => {
                tracing::info!("tray closed before it was ready");
                tray.shutdown();
                return Ok(());
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
            tray.shutdown();
            return Ok(());
        }
    }

    scheduler.start(clock).await;
    tracing::info!("clock ready");

    // -- Main loop: wait for shutdown --
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
        }
        _ = async {
            loop {
                match next_event(&tray).await {
                    Some(TrayEvent::QuitRequested) | None => break,
                    Some(TrayEvent::Ready) => {}
                }
            }
        } => {
            tracing::info!("quit requested via tray");
        }
    }

    // -- Graceful shutdown --
    scheduler.stop().await;
    if tokio::time::timeout(SHUTDOWN_GRACE, scheduler.wait_idle())
        .await
        .is_err()
    {
        tracing::warn!(
            in_flight = scheduler.chimes_in_flight(),
            "chime still playing at shutdown"
        );
    }
    tray.shutdown();

    Ok(())
}

/// Waits for the next tray event; `None` once the tray is gone.
async fn next_event(tray: &TrayHandle) -> Option<TrayEvent> {
    loop {
        match tray.try_recv_event() {
            Ok(Some(event)) => return Some(event),
            Ok(None) => tokio::time::sleep(TRAY_POLL).await,
            Err(_) => return None,
        }
    }
}
