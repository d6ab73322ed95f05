//! Tray handle, events, and update types.
//!
//! The tray event loop must own the main thread, so the application core
//! talks to it through a pair of channels instead of calling it directly.

use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Mutex, PoisonError};

use crate::TrayError;

/// Title and tooltip shown for the clock.
pub const APP_NAME: &str = "City Hall Clock";

/// Configuration for the system tray.
#[derive(Debug, Clone)]
pub struct TrayConfig {
    /// Text shown next to the icon (macOS menu bar).
    pub title: String,
    /// Tooltip shown on hover.
    pub tooltip: String,
    /// Optional icon data (PNG bytes).
    pub icon_data: Option<Vec<u8>>,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            title: APP_NAME.into(),
            tooltip: APP_NAME.into(),
            icon_data: None,
        }
    }
}

/// Events emitted by the tray to the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    /// The icon is on screen; background work may start.
    Ready,
    /// User clicked "Quit" in the context menu.
    QuitRequested,
}

/// Updates sent from the application core to the tray.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayUpdate {
    /// Remove the icon and leave the event loop.
    Shutdown,
}

/// Core-side end of the tray channels.
///
/// `Sync`, so async tasks can poll it while holding a shared reference.
pub struct TrayHandle {
    update_tx: mpsc::Sender<TrayUpdate>,
    event_rx: Mutex<mpsc::Receiver<TrayEvent>>,
}

impl TrayHandle {
    /// Creates a new tray handle with its channel pair.
    ///
    /// Returns `(handle, event_sender, update_receiver)`; the sender/receiver
    /// pair is given to the tray event loop running on the main thread.
    pub fn new() -> (Self, mpsc::Sender<TrayEvent>, mpsc::Receiver<TrayUpdate>) {
        let (update_tx, update_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        (
            Self {
                update_tx,
                event_rx: Mutex::new(event_rx),
            },
            event_tx,
            update_rx,
        )
    }

    /// Requests the tray to shut down.
    pub fn shutdown(&self) {
        let _ = self.update_tx.send(TrayUpdate::Shutdown);
    }

    /// Tries to receive a tray event (non-blocking).
    ///
    /// Fails with [`TrayError::Closed`] once the event loop has gone away.
    pub fn try_recv_event(&self) -> Result<Option<TrayEvent>, TrayError> {
        let event_rx = self.event_rx.lock().unwrap_or_else(PoisonError::into_inner);
        match event_rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TrayError::Closed),
        }
    }
}
