// Hide console window on Windows release builds
#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

//! Perch - Entry Point
//!
//! Demo application shell: hosts the winit event loop, owns the tray
//! controller, and reacts to the user intents the tray forwards.

use anyhow::Result;
use perch::{
    about::AboutInfo,
    core::{
        config::Config,
        events::{AppEvent, EventSender},
    },
    tray::{StringCatalog, TrayAction, TrayEventListener, TrayIconController},
};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

/// Listener the tray controller dispatches into. Runs on the UI thread;
/// it only translates tray actions into app events so the shell handles
/// them alongside everything else.
struct ShellListener {
    events: EventSender,
}

impl TrayEventListener for ShellListener {
    fn on_show_hide(&mut self) {
        let _ = self.events.send(AppEvent::Tray(TrayAction::ShowHide));
    }

    fn on_settings(&mut self) {
        let _ = self.events.send(AppEvent::Tray(TrayAction::Settings));
    }

    fn on_about(&mut self) {
        let _ = self.events.send(AppEvent::Tray(TrayAction::About));
    }

    fn on_exit(&mut self) {
        let _ = self.events.send(AppEvent::Tray(TrayAction::Exit));
    }
}

/// Main application handler for the winit event loop
struct App {
    /// Event sender for inter-module communication (wakes event loop)
    event_tx: EventSender,
    /// Event receiver for inter-module communication
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Proxy used to wake the loop from the tray's native threads
    proxy: EventLoopProxy<()>,
    /// Tray controller (None until `resumed`, or when init failed)
    tray: Option<TrayIconController>,
    /// The main window, created lazily on first Display action
    window: Option<Window>,
    /// Strings for dialog titles and error alerts
    catalog: StringCatalog,
    /// About surface data
    about: AboutInfo,
    /// Configuration
    config: Config,
}

impl App {
    fn new(
        event_tx: EventSender,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        proxy: EventLoopProxy<()>,
        config: Config,
    ) -> Self {
        Self {
            event_tx,
            event_rx,
            proxy,
            tray: None,
            window: None,
            catalog: StringCatalog::builtin(),
            about: AboutInfo::new(config.about.website.clone()),
            config,
        }
    }

    fn toggle_window(&mut self, event_loop: &ActiveEventLoop) {
        match &self.window {
            Some(window) => {
                let visible = window.is_visible().unwrap_or(true);
                window.set_visible(!visible);
            }
            None => {
                let attrs = Window::default_attributes()
                    .with_title(perch::APP_NAME)
                    .with_inner_size(winit::dpi::LogicalSize::new(480.0, 320.0));
                match event_loop.create_window(attrs) {
                    Ok(window) => self.window = Some(window),
                    Err(e) => error!("failed to create main window: {e}"),
                }
            }
        }
    }

    fn open_settings(&self) {
        match Config::config_path() {
            Ok(path) => {
                if !path.exists() {
                    if let Err(e) = self.config.save() {
                        error!("failed to write default config: {e}");
                        return;
                    }
                }
                if let Err(e) = open::that(&path) {
                    error!("failed to open settings file: {e}");
                }
            }
            Err(e) => error!("no settings path available: {e}"),
        }
    }

    fn show_about(&self) {
        let pressed = rfd::MessageDialog::new()
            .set_title(self.catalog.label("AboutTitle"))
            .set_description(format!("{}\n{}", self.about.summary(), self.about.website))
            .set_buttons(rfd::MessageButtons::OkCancelCustom(
                "Website".to_string(),
                "Close".to_string(),
            ))
            .show();

        if pressed == rfd::MessageDialogResult::Custom("Website".to_string()) {
            if let Err(e) = self.about.open_website() {
                error!("error opening the website: {e}");
                self.alert(self.catalog.label("WebsiteError"), &e.to_string());
            }
        }
    }

    fn alert(&self, title: &str, message: &str) {
        rfd::MessageDialog::new()
            .set_title(title)
            .set_description(message)
            .set_level(rfd::MessageLevel::Error)
            .show();
    }

    fn handle_event(&mut self, event: AppEvent, event_loop: &ActiveEventLoop) {
        match event {
            AppEvent::Tray(action) => {
                info!("tray action: {:?}", action);
                match action {
                    TrayAction::ShowHide => self.toggle_window(event_loop),
                    TrayAction::Settings => self.open_settings(),
                    TrayAction::About => self.show_about(),
                    TrayAction::Exit => {
                        if let Some(ref mut tray) = self.tray {
                            tray.hide();
                        }
                        event_loop.exit();
                    }
                }
            }
            AppEvent::Shutdown => event_loop.exit(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        if self.tray.is_some() {
            return;
        }

        let listener = ShellListener {
            events: self.event_tx.clone(),
        };
        match TrayIconController::new(self.catalog.clone(), Box::new(listener)) {
            Ok(mut tray) => {
                tray.set_tooltip(&self.config.tray.tooltip);
                let proxy = self.proxy.clone();
                tray.set_waker(move || {
                    let _ = proxy.send_event(());
                });

                if self.config.tray.show_icon_on_start {
                    if let Err(e) = tray.show() {
                        error!("tray icon could not be created: {e}");
                        self.alert(self.catalog.label("TrayError"), &e.to_string());
                    }
                } else {
                    warn!("tray icon disabled by configuration");
                }
                self.tray = Some(tray);
            }
            Err(e) => error!("failed to initialize tray controller: {e}"),
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let ours = self.window.as_ref().is_some_and(|w| w.id() == window_id);
        if !ours {
            return;
        }

        // Closing the window keeps the app alive in the tray.
        if let WindowEvent::CloseRequested = event {
            if let Some(ref window) = self.window {
                window.set_visible(false);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        for event in events {
            self.handle_event(event, event_loop);
        }

        // Native tray activity crosses into the UI thread here.
        if let Some(ref mut tray) = self.tray {
            tray.pump_events();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!("application exiting");
        if let Some(ref mut tray) = self.tray {
            if tray.is_visible() {
                tray.hide();
            }
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Perch");

    // Load configuration
    let config = Config::load()?;

    // Create event channel and loop
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let event_loop = EventLoop::new()?;

    // Create EventSender that wraps the channel + event loop proxy for wake-up
    let proxy = event_loop.create_proxy();
    let event_sender = EventSender::new(event_tx, proxy.clone());

    // Create application
    let mut app = App::new(event_sender, event_rx, proxy, config);

    // Run event loop
    event_loop.run_app(&mut app)?;

    Ok(())
}
