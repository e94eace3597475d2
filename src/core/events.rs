//! Application event definitions

use crate::tray::TrayAction;
use tokio::sync::mpsc;
use winit::event_loop::EventLoopProxy;

/// Wrapper around `mpsc::UnboundedSender<AppEvent>` that also wakes the
/// winit event loop via `EventLoopProxy::send_event` after every send.
/// This allows the shell to run with `ControlFlow::Wait` without losing
/// responsiveness to events produced off the UI thread.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<AppEvent>,
    proxy: EventLoopProxy<()>,
}

impl EventSender {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>, proxy: EventLoopProxy<()>) -> Self {
        Self { tx, proxy }
    }

    pub fn send(&self, event: AppEvent) -> Result<(), mpsc::error::SendError<AppEvent>> {
        let result = self.tx.send(event);
        let _ = self.proxy.send_event(());
        result
    }
}

/// Application-wide events for inter-module communication
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Tray menu action or icon double-click, already marshaled onto the
    /// UI thread by the tray controller's pump
    Tray(TrayAction),

    /// Graceful shutdown requested
    Shutdown,
}
