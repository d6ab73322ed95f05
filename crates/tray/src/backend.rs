//! Native tray icon on top of `tray-icon` and a `tao` event loop.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tao::platform::run_return::EventLoopExtRunReturn;
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem as NativeMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use crate::TrayError;
use crate::icon::decode_icon;
use crate::menu::{self, MenuAction};
use crate::tray::{TrayConfig, TrayEvent, TrayUpdate};

/// How often the loop checks for core updates while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the tray event loop on the calling thread until shutdown.
///
/// Must be called from the main thread. Sends [`TrayEvent::Ready`] once the
/// icon is shown and returns after [`TrayUpdate::Shutdown`] arrives or the
/// core drops its handle.
pub fn run(
    config: TrayConfig,
    event_tx: Sender<TrayEvent>,
    update_rx: Receiver<TrayUpdate>,
) -> Result<(), TrayError> {
    let mut icon = match &config.icon_data {
        Some(bytes) => {
            let decoded = decode_icon(bytes)?;
            Some(Icon::from_rgba(decoded.rgba, decoded.width, decoded.height)?)
        }
        None => None,
    };

    let tray_menu = Menu::new();
    let mut native_items = Vec::new();
    let mut quit_ids: Vec<MenuId> = Vec::new();
    for item in menu::build_menu() {
        let native = NativeMenuItem::new(&item.label, item.enabled, None);
        tray_menu.append(&native)?;
        if item.action == Some(MenuAction::Quit) {
            quit_ids.push(native.id().clone());
        }
        native_items.push(native);
    }

    let mut event_loop = EventLoopBuilder::new().build();
    let mut tray: Option<TrayIcon> = None;
    let mut result = Ok(());

    event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL);

        // The icon can only be created once the loop is running (macOS).
        if let Event::NewEvents(StartCause::Init) = event {
            let mut builder = TrayIconBuilder::new()
                .with_menu(Box::new(tray_menu.clone()))
                .with_tooltip(&config.tooltip)
                .with_title(&config.title);
            if let Some(icon) = icon.take() {
                builder = builder.with_icon(icon);
            }
            match builder.build() {
                Ok(built) => {
                    tray = Some(built);
                    tracing::info!(title = %config.title, "tray icon ready");
                    let _ = event_tx.send(TrayEvent::Ready);
                }
                Err(e) => {
                    result = Err(TrayError::from(e));
                    *control_flow = ControlFlow::Exit;
                    return;
                }
            }
        }

        while let Ok(menu_event) = MenuEvent::receiver().try_recv() {
            if quit_ids.contains(&menu_event.id) {
                tracing::info!("quit selected from tray menu");
                let _ = event_tx.send(TrayEvent::QuitRequested);
            }
        }

        loop {
            match update_rx.try_recv() {
                Ok(TrayUpdate::Shutdown) | Err(TryRecvError::Disconnected) => {
                    tray.take();
                    *control_flow = ControlFlow::Exit;
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }
    });

    drop(native_items);
    tracing::debug!("tray event loop finished");
    result
}
