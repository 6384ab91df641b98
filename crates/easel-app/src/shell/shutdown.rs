//! Graceful shutdown: persist layout, close windows, unload packages.

use easel_common::AppState;
use easel_config::ProfileScope;
use tracing::{info, warn};

use super::core::Shell;

impl Shell {
    /// Shut every subsystem down. Safe to call more than once.
    ///
    /// Order matters:
    /// 1. Save panel geometry and window states while windows still exist
    /// 2. Close every window, resolving pending sessions
    /// 3. Unload packages, most recently loaded first
    pub fn shutdown(&mut self) {
        info!("initiating graceful shutdown");
        self.state = AppState::ShuttingDown;

        for window in self.windows.ids() {
            let (panels, mut env, _) = self.panel_env();
            panels.on_window_closing(&mut env, window);
        }
        if let Err(e) = self
            .windows
            .save_window_states(&self.profiles, ProfileScope::Local)
        {
            warn!(error = %e, "failed to save window states");
        }

        for window in self.windows.ids() {
            self.panels.on_window_closed(window);
        }
        let closed = self.windows.close_all();

        let unloaded = self.packages.unload_all();
        self.flush();

        info!(windows = closed, packages = unloaded.len(), "graceful shutdown complete");
    }
}
