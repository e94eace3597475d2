//! Tray event listener contract

/// User intents a tray icon can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    /// Toggle the main window (Display entry, or icon double-click)
    ShowHide,
    /// Open settings
    Settings,
    /// Open the about surface
    About,
    /// Quit the application
    Exit,
}

/// Callbacks the application shell supplies to the tray controller.
///
/// Each hook fires exactly once per corresponding user gesture, and always
/// from the UI execution context: the controller queues native events and
/// dispatches them when the host calls
/// [`pump_events`](crate::tray::TrayIconController::pump_events) on its
/// event-loop thread. Implementations never run concurrently with each
/// other.
pub trait TrayEventListener {
    /// Display menu entry activated, or the icon was double-clicked.
    fn on_show_hide(&mut self);
    /// Settings menu entry activated.
    fn on_settings(&mut self);
    /// About menu entry activated.
    fn on_about(&mut self);
    /// Exit menu entry activated.
    fn on_exit(&mut self);
}
