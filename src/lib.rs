//! Perch
//!
//! System tray presence for a desktop application: a single persistent
//! tray icon with a fixed context menu, safe routing of native mouse and
//! menu events onto the application's UI thread, and the small surfaces
//! around it (about info, update metadata).
//!
//! # Features
//! - Idempotent tray icon lifecycle (show/hide, rebuild-on-show)
//! - Fixed context menu labeled through a string catalog
//! - Double-click on the icon mapped to the Display action
//! - Listener callbacks guaranteed to run on the host's UI thread
//! - Graceful degradation when the environment has no system tray

pub mod about;
pub mod core;
pub mod error;
pub mod tray;
pub mod update;

pub use crate::core::config::Config;
pub use crate::core::events::{AppEvent, EventSender};
pub use crate::error::Error;
pub use crate::tray::{
    StringCatalog, SystemTray, TrayAction, TrayBackend, TrayEventListener, TrayIconController,
};
pub use crate::update::PlatformUpdate;

/// Application display name, used for tooltips and dialog titles.
pub const APP_NAME: &str = "Perch";
