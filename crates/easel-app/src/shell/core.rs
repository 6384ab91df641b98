//! Shell struct definition and constructor.

use easel_common::{AppState, Notification, NotificationBus, WindowId};
use easel_config::{ProfileScope, ProfileStore, ShellConfig};
use easel_package::{PackageRegistry, ScriptHost};
use easel_panel::{PanelDockTable, PanelEnv};
use easel_window::{WindowFactory, WindowOptions, WindowRegistry};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::notifications::Outbox;

const NOTIFICATION_CAPACITY: usize = 256;

/// Name of the host component every package may declare in `hosts`.
pub const HOST_NAME: &str = "easel";

/// Owns every registry. All operations take `&mut self`, so each one runs
/// to completion before the next starts.
pub struct Shell {
    pub(super) config: ShellConfig,
    pub(super) packages: PackageRegistry,
    pub(super) windows: WindowRegistry,
    pub(super) panels: PanelDockTable,
    pub(super) profiles: ProfileStore,
    pub(super) bus: NotificationBus,
    pub(super) notifications: mpsc::UnboundedReceiver<Notification>,
    pub(super) outbox: Outbox,
    pub(super) state: AppState,
}

impl Shell {
    pub fn new(
        config: ShellConfig,
        factory: Box<dyn WindowFactory>,
        script_host: Box<dyn ScriptHost>,
    ) -> Self {
        let (bus, notifications) = NotificationBus::with_forwarding(NOTIFICATION_CAPACITY);

        let mut packages = PackageRegistry::new(script_host, bus.clone());
        let version = semver::Version::parse(env!("CARGO_PKG_VERSION"))
            .unwrap_or_else(|_| semver::Version::new(0, 0, 0));
        packages.register_host(HOST_NAME, version);
        for path in &config.packages.search_paths {
            packages.add_path(path.clone());
        }

        let windows = WindowRegistry::new(factory).with_default_size(
            f64::from(config.window.width),
            f64::from(config.window.height),
        );
        let profiles = ProfileStore::from_config(&config.profiles);

        Self {
            config,
            packages,
            windows,
            panels: PanelDockTable::new(),
            profiles,
            bus,
            notifications,
            outbox: Outbox::default(),
            state: AppState::Starting,
        }
    }

    /// Restore window states, open the main window, and load the
    /// configured autoload packages. Returns the main window.
    pub fn start(&mut self) -> WindowId {
        if let Err(e) = self
            .windows
            .restore_window_states(&self.profiles, ProfileScope::Local)
        {
            warn!(error = %e, "failed to restore window states");
        }

        let main = self.windows.create(
            "main",
            WindowOptions {
                main: true,
                ..WindowOptions::default()
            },
        );

        for root in self.config.packages.autoload.clone() {
            if let Err(e) = self.load_package(&root) {
                warn!(path = %root.display(), error = %e, "autoload failed");
            }
        }

        self.state = AppState::Running;
        info!(window = %main, packages = self.packages.loaded_names().len(), "shell started");
        main
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    /// True once the main window closed or shutdown began.
    pub fn should_exit(&self) -> bool {
        self.state == AppState::ShuttingDown
    }

    pub fn packages(&self) -> &PackageRegistry {
        &self.packages
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    pub fn panels(&self) -> &PanelDockTable {
        &self.panels
    }

    pub(super) fn panel_env(&mut self) -> (&mut PanelDockTable, PanelEnv<'_>, &PackageRegistry) {
        (
            &mut self.panels,
            PanelEnv {
                windows: &mut self.windows,
                profiles: &self.profiles,
            },
            &self.packages,
        )
    }
}
