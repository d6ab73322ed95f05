//! System tray icon for the City Hall Clock.
//!
//! Provides a cross-platform tray icon with a title, tooltip and a quit
//! action.
//!
//! The tray communicates with the application core via channels:
//! - [`TrayEvent`]: events from tray to core (ready, quit requested)
//! - [`TrayUpdate`]: updates from core to tray (shutdown)
//!
//! # Platform notes
//! - Linux: GTK-backed tray via `tray-icon` (AppIndicator)
//! - macOS: menu bar item; the title is shown next to the icon
//! - The tray event loop must run on the main thread

#[cfg(feature = "backend")]
mod backend;
#[cfg(feature = "backend")]
mod icon;
mod menu;
mod tray;

#[cfg(feature = "backend")]
pub use backend::run;
pub use menu::{MenuAction, MenuItem, QUIT_LABEL, build_menu};
pub use tray::{APP_NAME, TrayConfig, TrayEvent, TrayHandle, TrayUpdate};

/// Errors for tray operations.
#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    #[cfg(feature = "backend")]
    #[error("cannot decode tray icon: {0}")]
    Icon(#[from] image::ImageError),

    #[cfg(feature = "backend")]
    #[error("invalid tray icon: {0}")]
    BadIcon(#[from] tray_icon::BadIcon),

    #[cfg(feature = "backend")]
    #[error("cannot build tray menu: {0}")]
    Menu(#[from] tray_icon::menu::Error),

    #[cfg(feature = "backend")]
    #[error("cannot create tray icon: {0}")]
    Build(#[from] tray_icon::Error),

    #[error("tray event loop closed")]
    Closed,
}
