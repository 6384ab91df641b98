//! Show/hide/close and geometry operations on registered windows.

use easel_common::{Rect, WindowError, WindowId};
use serde_json::Value;
use tracing::{debug, info};

use super::{not_found, CloseOutcome, WindowRegistry};

impl WindowRegistry {
    /// Close a window. Quick windows only hide. Any other window resolves
    /// its pending sessions with empty args and is dropped.
    pub fn close(&mut self, id: WindowId) -> Result<CloseOutcome, WindowError> {
        let window = self.window_mut(id)?;
        if window.kind().hides_instead_of_closing() {
            window.native.hide();
            debug!(window = %id, "quick window hidden");
            return Ok(CloseOutcome::Hidden);
        }
        self.destroy(id)
    }

    /// Close every window, quick ones included. Used at shutdown.
    pub fn close_all(&mut self) -> usize {
        let ids = self.ids();
        let count = ids.len();
        for id in ids {
            let _ = self.destroy(id);
        }
        count
    }

    fn destroy(&mut self, id: WindowId) -> Result<CloseOutcome, WindowError> {
        let mut window = self.windows.remove(&id).ok_or_else(|| not_found(id))?;

        let resolved = window.sessions.resolve_all();
        self.states
            .insert(window.name().to_string(), window.snapshot());
        window.native.close();
        info!(window = %id, name = window.name(), resolved, "window closed");

        if self.main == Some(id) {
            self.main = None;
            return Ok(CloseOutcome::MainClosed);
        }
        Ok(CloseOutcome::Closed)
    }

    pub fn show(&mut self, id: WindowId) -> Result<(), WindowError> {
        self.window_mut(id)?.native.show();
        Ok(())
    }

    pub fn hide(&mut self, id: WindowId) -> Result<(), WindowError> {
        self.window_mut(id)?.native.hide();
        Ok(())
    }

    pub fn focus(&mut self, id: WindowId) -> Result<(), WindowError> {
        let window = self.window_mut(id)?;
        if !window.native.is_visible() {
            window.native.show();
        }
        window.native.focus();
        Ok(())
    }

    pub fn center(&mut self, id: WindowId) -> Result<(), WindowError> {
        self.window_mut(id)?.native.center();
        Ok(())
    }

    /// Resize within the window's min/max constraints, keeping its position.
    pub fn resize(&mut self, id: WindowId, width: f64, height: f64) -> Result<(), WindowError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(WindowError::InvalidArgument(format!(
                "window size must be positive, got {width}x{height}"
            )));
        }
        let window = self.window_mut(id)?;
        let (width, height) = window.clamp_size(width, height);
        let current = window.native.bounds();
        window
            .native
            .set_bounds(Rect::new(current.x, current.y, width, height));
        Ok(())
    }

    pub fn set_bounds(&mut self, id: WindowId, bounds: Rect) -> Result<(), WindowError> {
        self.window_mut(id)?.native.set_bounds(bounds);
        Ok(())
    }

    /// Navigate the window's page. `argv` is kept for the page to query
    /// once it is ready.
    pub fn load(&mut self, id: WindowId, url: &str, argv: Vec<Value>) -> Result<(), WindowError> {
        if url.trim().is_empty() {
            return Err(WindowError::InvalidArgument("url must not be empty".into()));
        }
        let window = self.window_mut(id)?;
        window.loaded = false;
        window.argv = argv;
        window.native.load_url(url);
        debug!(window = %id, url, "page loading");
        Ok(())
    }

    /// Record that the window's page finished loading.
    pub fn mark_loaded(&mut self, id: WindowId) -> Result<(), WindowError> {
        self.window_mut(id)?.loaded = true;
        Ok(())
    }

    pub fn inspect_at(&mut self, id: WindowId, x: f64, y: f64) -> Result<(), WindowError> {
        self.window_mut(id)?.native.inspect_at(x, y);
        Ok(())
    }
}
