//! Panel and window operations that span several registries.

use easel_common::{AppState, PanelError, PanelId, WindowError, WindowId};
use easel_window::CloseOutcome;
use serde_json::Value;
use tracing::info;

use super::core::Shell;

impl Shell {
    pub fn open_panel(&mut self, panel: &PanelId, argv: Vec<Value>) -> Result<WindowId, PanelError> {
        let (panels, mut env, packages) = self.panel_env();
        let result = panels.open(&mut env, packages, panel, argv);
        self.flush();
        result
    }

    pub fn close_panel(&mut self, panel: &PanelId) -> bool {
        let (panels, mut env, _) = self.panel_env();
        let closed = panels.close(&mut env, panel);
        self.flush();
        closed
    }

    /// Close a window on behalf of the user or its page. Panels it hosts
    /// save their geometry first. Closing the main window starts shutdown.
    pub fn close_window(&mut self, window: WindowId) -> Result<CloseOutcome, WindowError> {
        let (panels, mut env, _) = self.panel_env();
        panels.on_window_closing(&mut env, window);

        let outcome = self.windows.close(window)?;
        if outcome != CloseOutcome::Hidden {
            let released = self.panels.on_window_closed(window);
            if !released.is_empty() {
                info!(window = %window, panels = released.len(), "panels released with window");
            }
        }
        if outcome == CloseOutcome::MainClosed {
            info!("main window closed");
            self.state = AppState::ShuttingDown;
        }
        self.flush();
        Ok(outcome)
    }
}
