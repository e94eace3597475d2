//! Native tray backend
//!
//! The controller talks to the OS through the [`TrayBackend`] trait so the
//! lifecycle rules stay testable without a desktop session. [`SystemTray`]
//! is the production implementation on top of the `tray-icon` crate.

use super::icon::TrayImage;
use super::listener::TrayAction;
use super::menu::{MenuEntry, MenuModel};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};
use tray_icon::{
    menu::{Menu, MenuEvent, MenuId, PredefinedMenuItem},
    MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent,
};

/// Raw event produced by the native side, before any listener dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeTrayEvent {
    /// A menu entry was activated.
    Menu(TrayAction),
    /// The icon itself was clicked `clicks` times (1 = single click).
    IconClick { clicks: u32 },
}

/// Channel the backend pushes native events into.
///
/// Sends never block; the optional waker nudges the host event loop so a
/// waiting UI thread picks the event up promptly (the same trick the shell
/// uses for its own app events).
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<NativeTrayEvent>,
    waker: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl EventSink {
    pub fn new(
        tx: mpsc::UnboundedSender<NativeTrayEvent>,
        waker: Option<Arc<dyn Fn() + Send + Sync>>,
    ) -> Self {
        Self { tx, waker }
    }

    /// Queue an event for the UI thread. Errors (receiver gone during
    /// teardown) are ignored; there is nobody left to inform.
    pub fn send(&self, event: NativeTrayEvent) {
        trace!("native tray event: {:?}", event);
        let _ = self.tx.send(event);
        if let Some(ref wake) = self.waker {
            wake();
        }
    }
}

/// Seam between the tray controller and the OS tray.
///
/// `register` either produces a fully wired handle or nothing; a handle
/// passed to `unregister` is consumed and must never be reused.
pub trait TrayBackend {
    /// Opaque native resource representing a registered icon.
    type Handle;

    /// Whether this environment can host a tray icon at all.
    fn is_supported(&self) -> bool;

    /// Preferred icon pixel dimensions of the native tray.
    fn icon_size(&self) -> (u32, u32);

    /// Build the native icon + menu, wire callbacks into `events`, and
    /// register with the OS tray.
    fn register(
        &mut self,
        icon: TrayImage,
        menu: &MenuModel,
        tooltip: &str,
        events: EventSink,
    ) -> Result<Self::Handle>;

    /// Remove a previously registered icon from the OS tray.
    fn unregister(&mut self, handle: Self::Handle);
}

/// Production backend backed by the `tray-icon` crate.
///
/// `tray-icon` keeps its menu and icon event handlers in process-global
/// slots, so at most one `SystemTray` should be active per process.
#[derive(Debug, Default)]
pub struct SystemTray;

impl SystemTray {
    pub fn new() -> Self {
        Self
    }
}

impl TrayBackend for SystemTray {
    type Handle = tray_icon::TrayIcon;

    fn is_supported(&self) -> bool {
        tray_supported()
    }

    fn icon_size(&self) -> (u32, u32) {
        preferred_icon_size()
    }

    fn register(
        &mut self,
        icon: TrayImage,
        menu: &MenuModel,
        tooltip: &str,
        events: EventSink,
    ) -> Result<Self::Handle> {
        let native_menu = Menu::new();
        let mut actions: HashMap<MenuId, TrayAction> = HashMap::new();

        for entry in &menu.entries {
            match entry {
                MenuEntry::Action { action, label } => {
                    let item = tray_icon::menu::MenuItem::new(label.as_str(), true, None);
                    actions.insert(item.id().clone(), *action);
                    native_menu
                        .append(&item)
                        .map_err(|e| Error::Registration(e.to_string()))?;
                }
                MenuEntry::Separator => {
                    native_menu
                        .append(&PredefinedMenuItem::separator())
                        .map_err(|e| Error::Registration(e.to_string()))?;
                }
            }
        }

        let menu_sink = events.clone();
        MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
            if let Some(action) = actions.get(event.id()) {
                menu_sink.send(NativeTrayEvent::Menu(*action));
            } else {
                debug!("menu event for unknown id: {:?}", event.id());
            }
        }));

        TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| match event {
            TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } => events.send(NativeTrayEvent::IconClick { clicks: 1 }),
            TrayIconEvent::DoubleClick {
                button: MouseButton::Left,
                ..
            } => events.send(NativeTrayEvent::IconClick { clicks: 2 }),
            _ => {}
        }));

        let native_icon = tray_icon::Icon::from_rgba(icon.rgba, icon.width, icon.height)
            .map_err(|e| Error::Registration(e.to_string()))?;

        TrayIconBuilder::new()
            .with_menu(Box::new(native_menu))
            .with_tooltip(tooltip)
            .with_icon(native_icon)
            .build()
            .map_err(|e| Error::Registration(e.to_string()))
    }

    fn unregister(&mut self, handle: Self::Handle) {
        // Dropping the handle removes the icon from the OS tray.
        drop(handle);
    }
}

/// Whether the current environment can host a tray icon.
#[cfg(target_os = "linux")]
fn tray_supported() -> bool {
    // Without a display server there is no notification area to register
    // with; headless sessions get the warning path instead of a panic
    // deep inside the toolkit.
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

#[cfg(not(target_os = "linux"))]
fn tray_supported() -> bool {
    true
}

/// Platform-conventional tray icon size in pixels.
fn preferred_icon_size() -> (u32, u32) {
    #[cfg(target_os = "macos")]
    {
        (22, 22)
    }
    #[cfg(target_os = "windows")]
    {
        (16, 16)
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        (24, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_sink_delivers_and_wakes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let woke = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let woke_in_waker = woke.clone();
        let sink = EventSink::new(
            tx,
            Some(Arc::new(move || {
                woke_in_waker.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            })),
        );

        sink.send(NativeTrayEvent::Menu(TrayAction::Exit));
        sink.send(NativeTrayEvent::IconClick { clicks: 2 });

        assert_eq!(rx.try_recv().unwrap(), NativeTrayEvent::Menu(TrayAction::Exit));
        assert_eq!(
            rx.try_recv().unwrap(),
            NativeTrayEvent::IconClick { clicks: 2 }
        );
        assert_eq!(woke.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let sink = EventSink::new(tx, None);
        sink.send(NativeTrayEvent::IconClick { clicks: 1 });
    }
}
