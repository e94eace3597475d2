//! Tray icon lifecycle controller
//!
//! Owns at most one native tray handle, rebuilds the icon and menu for
//! every registration cycle, and routes native-thread events onto the UI
//! execution context before any listener callback runs.

use super::backend::{EventSink, NativeTrayEvent, SystemTray, TrayBackend};
use super::catalog::StringCatalog;
use super::icon::{self, TRAY_ICON_PNG};
use super::listener::{TrayAction, TrayEventListener};
use super::menu::{self, MenuModel};
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

/// Click count at which an icon click counts as "open" (the Display
/// action). Anything below it is ignored.
const DOUBLE_CLICK_THRESHOLD: u32 = 2;

/// Explicit lifecycle state: either no native resource exists, or exactly
/// one fully wired handle is registered with the OS tray.
enum IconState<H> {
    NoIcon,
    Visible(H),
}

impl<H> IconState<H> {
    fn is_visible(&self) -> bool {
        matches!(self, IconState::Visible(_))
    }
}

/// Controller for the application's presence in the system tray.
///
/// Constructed once by the application shell with a string catalog and an
/// event listener; `show` and `hide` are idempotent and must be called
/// from one logical thread (normally the UI thread). Native menu and
/// click events are queued internally and only reach the listener when
/// the host calls [`pump_events`](Self::pump_events) from its UI context.
pub struct TrayIconController<B: TrayBackend = SystemTray> {
    catalog: StringCatalog,
    listener: Box<dyn TrayEventListener>,
    backend: B,
    state: IconState<B::Handle>,
    tooltip: String,
    icon_bytes: &'static [u8],
    event_tx: mpsc::UnboundedSender<NativeTrayEvent>,
    event_rx: mpsc::UnboundedReceiver<NativeTrayEvent>,
    waker: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl TrayIconController<SystemTray> {
    /// Create a controller on the production backend.
    ///
    /// Fails when `catalog` cannot resolve all four menu labels, so later
    /// operations can assume a complete label set.
    pub fn new(catalog: StringCatalog, listener: Box<dyn TrayEventListener>) -> Result<Self> {
        Self::with_backend(catalog, listener, SystemTray::new())
    }
}

impl<B: TrayBackend> TrayIconController<B> {
    /// Create a controller on a caller-supplied backend.
    pub fn with_backend(
        catalog: StringCatalog,
        listener: Box<dyn TrayEventListener>,
        backend: B,
    ) -> Result<Self> {
        menu::validate_labels(&catalog)?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            catalog,
            listener,
            backend,
            state: IconState::NoIcon,
            tooltip: crate::APP_NAME.to_owned(),
            icon_bytes: TRAY_ICON_PNG,
            event_tx,
            event_rx,
            waker: None,
        })
    }

    /// Hook for nudging the host event loop after a native event is
    /// queued (e.g. a winit `EventLoopProxy` wake-up). Without one the
    /// events are still delivered on the next `pump_events` call.
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    /// Tooltip shown when hovering the icon. Takes effect on the next
    /// registration cycle.
    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        self.tooltip = tooltip.into();
    }

    /// Replace the embedded icon asset. Takes effect on the next
    /// registration cycle.
    pub fn set_icon_bytes(&mut self, bytes: &'static [u8]) {
        self.icon_bytes = bytes;
    }

    /// Whether a handle is currently registered with the OS tray.
    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    /// Ensure the icon is visible in the OS tray.
    ///
    /// Idempotent: while an icon is registered this is a no-op. In an
    /// environment without a tray the call logs a warning and succeeds;
    /// tray presence is best-effort. Registration failures at the OS
    /// level are logged and absorbed. Only an icon-asset failure is
    /// returned to the caller.
    pub fn show(&mut self) -> Result<()> {
        info!("displaying tray icon");

        if self.state.is_visible() {
            debug!("tray icon already registered");
            return Ok(());
        }

        if !self.backend.is_supported() {
            warn!("system tray is not supported in this environment");
            return Ok(());
        }

        let (width, height) = self.backend.icon_size();
        let image = icon::decode_scaled(self.icon_bytes, width, height)?;

        // Cannot fail: labels were validated at construction.
        let menu = MenuModel::build(&self.catalog)?;

        let sink = EventSink::new(self.event_tx.clone(), self.waker.clone());
        match self.backend.register(image, &menu, &self.tooltip, sink) {
            Ok(handle) => {
                self.state = IconState::Visible(handle);
            }
            Err(e) => {
                error!("tray icon could not be added: {e}");
            }
        }
        Ok(())
    }

    /// Ensure the icon is not visible.
    ///
    /// Removes and discards the current handle; the next `show` builds a
    /// fresh one. Calling this without a visible icon is a warned no-op.
    pub fn hide(&mut self) {
        info!("hiding tray icon");

        match std::mem::replace(&mut self.state, IconState::NoIcon) {
            IconState::Visible(handle) => self.backend.unregister(handle),
            IconState::NoIcon => warn!("no tray icon to hide"),
        }
    }

    /// Drain queued native events and run the listener callbacks.
    ///
    /// This is the single point where native activity crosses into the UI
    /// execution context; the host must call it from its event-loop
    /// thread. Returns the number of callbacks dispatched.
    pub fn pump_events(&mut self) -> usize {
        let mut dispatched = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                NativeTrayEvent::Menu(action) => {
                    self.dispatch(action);
                    dispatched += 1;
                }
                NativeTrayEvent::IconClick { clicks } if clicks >= DOUBLE_CLICK_THRESHOLD => {
                    self.dispatch(TrayAction::ShowHide);
                    dispatched += 1;
                }
                NativeTrayEvent::IconClick { clicks } => {
                    trace!("ignoring icon click (count {clicks})");
                }
            }
        }
        dispatched
    }

    fn dispatch(&mut self, action: TrayAction) {
        debug!("tray action: {:?}", action);
        match action {
            TrayAction::ShowHide => self.listener.on_show_hide(),
            TrayAction::Settings => self.listener.on_settings(),
            TrayAction::About => self.listener.on_about(),
            TrayAction::Exit => self.listener.on_exit(),
        }
    }

    /// Sender half of the native event queue, for backends that outlive
    /// a registration cycle.
    #[cfg(test)]
    pub(crate) fn native_sender(&self) -> mpsc::UnboundedSender<NativeTrayEvent> {
        self.event_tx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tray::icon::TrayImage;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Scripted backend: counts registrations, hands out distinct handle
    /// ids, and can simulate an unsupported environment.
    struct FakeTray {
        supported: bool,
        fail_registration: bool,
        registered: Vec<u64>,
        removed: Vec<u64>,
        next_id: AtomicU64,
        sink: Rc<RefCell<Option<EventSink>>>,
    }

    impl FakeTray {
        fn new() -> Self {
            Self {
                supported: true,
                fail_registration: false,
                registered: Vec::new(),
                removed: Vec::new(),
                next_id: AtomicU64::new(1),
                sink: Rc::new(RefCell::new(None)),
            }
        }

        fn live_count(&self) -> usize {
            self.registered.len() - self.removed.len()
        }
    }

    impl TrayBackend for FakeTray {
        type Handle = u64;

        fn is_supported(&self) -> bool {
            self.supported
        }

        fn icon_size(&self) -> (u32, u32) {
            (22, 22)
        }

        fn register(
            &mut self,
            icon: TrayImage,
            menu: &MenuModel,
            _tooltip: &str,
            events: EventSink,
        ) -> Result<Self::Handle> {
            assert_eq!((icon.width, icon.height), (22, 22));
            assert_eq!(menu.actions().count(), 4);
            if self.fail_registration {
                return Err(Error::Registration("tray is full".into()));
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.registered.push(id);
            *self.sink.borrow_mut() = Some(events);
            Ok(id)
        }

        fn unregister(&mut self, handle: Self::Handle) {
            self.removed.push(handle);
        }
    }

    #[derive(Default)]
    struct CallLog {
        show_hide: usize,
        settings: usize,
        about: usize,
        exit: usize,
    }

    #[derive(Clone, Default)]
    struct RecordingListener(Rc<RefCell<CallLog>>);

    impl TrayEventListener for RecordingListener {
        fn on_show_hide(&mut self) {
            self.0.borrow_mut().show_hide += 1;
        }
        fn on_settings(&mut self) {
            self.0.borrow_mut().settings += 1;
        }
        fn on_about(&mut self) {
            self.0.borrow_mut().about += 1;
        }
        fn on_exit(&mut self) {
            self.0.borrow_mut().exit += 1;
        }
    }

    fn controller() -> (TrayIconController<FakeTray>, RecordingListener) {
        let listener = RecordingListener::default();
        let c = TrayIconController::with_backend(
            StringCatalog::builtin(),
            Box::new(listener.clone()),
            FakeTray::new(),
        )
        .unwrap();
        (c, listener)
    }

    #[test]
    fn test_construction_rejects_incomplete_catalog() {
        let catalog = StringCatalog::from_toml_str(r#"Display = "Show""#).unwrap();
        let result = TrayIconController::with_backend(
            catalog,
            Box::new(RecordingListener::default()),
            FakeTray::new(),
        );
        assert!(matches!(result, Err(Error::MissingLabel(_))));
    }

    #[test]
    fn test_show_registers_once() {
        let (mut c, _) = controller();
        c.show().unwrap();
        c.show().unwrap();
        c.show().unwrap();
        assert!(c.is_visible());
        assert_eq!(c.backend.registered.len(), 1);
        assert_eq!(c.backend.live_count(), 1);
    }

    #[test]
    fn test_hide_without_icon_is_noop() {
        let (mut c, _) = controller();
        c.hide();
        c.hide();
        assert!(!c.is_visible());
        assert!(c.backend.removed.is_empty());
    }

    #[test]
    fn test_cycle_builds_fresh_handles() {
        let (mut c, _) = controller();
        c.show().unwrap();
        c.hide();
        c.show().unwrap();
        assert_eq!(c.backend.registered, vec![1, 2]);
        assert_eq!(c.backend.removed, vec![1]);
        assert_eq!(c.backend.live_count(), 1);
        c.hide();
        assert_eq!(c.backend.removed, vec![1, 2]);
        assert_eq!(c.backend.live_count(), 0);
    }

    #[test]
    fn test_unsupported_environment_is_soft() {
        let (mut c, _) = controller();
        c.backend.supported = false;
        c.show().unwrap();
        assert!(!c.is_visible());
        assert!(c.backend.registered.is_empty());
    }

    #[test]
    fn test_corrupt_asset_surfaces_io_failure() {
        let (mut c, _) = controller();
        c.set_icon_bytes(b"definitely not a png");
        let err = c.show().unwrap_err();
        assert!(matches!(err, Error::Icon(_)));
        assert!(!c.is_visible());
        assert!(c.backend.registered.is_empty());
    }

    #[test]
    fn test_registration_failure_is_absorbed() {
        let (mut c, _) = controller();
        c.backend.fail_registration = true;
        c.show().unwrap();
        assert!(!c.is_visible());
        // A later attempt may succeed (transient native condition).
        c.backend.fail_registration = false;
        c.show().unwrap();
        assert!(c.is_visible());
    }

    #[test]
    fn test_double_click_threshold() {
        let (mut c, listener) = controller();
        c.show().unwrap();

        let tx = c.native_sender();
        tx.send(NativeTrayEvent::IconClick { clicks: 1 }).unwrap();
        assert_eq!(c.pump_events(), 0);
        assert_eq!(listener.0.borrow().show_hide, 0);

        tx.send(NativeTrayEvent::IconClick { clicks: 2 }).unwrap();
        tx.send(NativeTrayEvent::IconClick { clicks: 3 }).unwrap();
        assert_eq!(c.pump_events(), 2);
        assert_eq!(listener.0.borrow().show_hide, 2);
    }

    #[test]
    fn test_menu_actions_reach_listener() {
        let (mut c, listener) = controller();
        c.show().unwrap();

        let tx = c.native_sender();
        tx.send(NativeTrayEvent::Menu(TrayAction::Settings)).unwrap();
        tx.send(NativeTrayEvent::Menu(TrayAction::About)).unwrap();
        tx.send(NativeTrayEvent::Menu(TrayAction::Exit)).unwrap();
        assert_eq!(c.pump_events(), 3);

        let log = listener.0.borrow();
        assert_eq!(
            (log.show_hide, log.settings, log.about, log.exit),
            (0, 1, 1, 1)
        );
    }

    #[test]
    fn test_callbacks_fire_across_icon_generations() {
        let (mut c, listener) = controller();

        c.show().unwrap();
        c.backend
            .sink
            .borrow()
            .as_ref()
            .unwrap()
            .send(NativeTrayEvent::Menu(TrayAction::ShowHide));
        c.pump_events();

        c.hide();
        c.show().unwrap();
        c.backend
            .sink
            .borrow()
            .as_ref()
            .unwrap()
            .send(NativeTrayEvent::Menu(TrayAction::ShowHide));
        c.pump_events();

        assert_eq!(listener.0.borrow().show_hide, 2);
        assert_eq!(c.backend.registered, vec![1, 2]);
    }
}
