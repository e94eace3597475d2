//! Tray module - system tray icon lifecycle, menu, and event routing

mod backend;
mod catalog;
mod controller;
mod icon;
mod listener;
mod menu;

pub use backend::{EventSink, NativeTrayEvent, SystemTray, TrayBackend};
pub use catalog::StringCatalog;
pub use controller::TrayIconController;
pub use icon::{decode_scaled, TrayImage, TRAY_ICON_PNG};
pub use listener::{TrayAction, TrayEventListener};
pub use menu::{MenuEntry, MenuModel, MENU_KEYS};
