//! Window state snapshots and their persistence in the `layout.windows`
//! profile.

use easel_common::{ConfigError, WindowError, WindowId};
use easel_config::{ProfileScope, ProfileStore};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::WindowRegistry;
use crate::window::LayoutSnapshot;

/// Profile holding one [`LayoutSnapshot`] per window name.
pub const WINDOW_LAYOUT_PROFILE: &str = "layout.windows";

impl WindowRegistry {
    /// Snapshot the window's bounds, and its dock tree when given. A zero
    /// width or height is replaced by the default size.
    pub fn commit_window_state(
        &mut self,
        id: WindowId,
        layout: Option<Value>,
    ) -> Result<(), WindowError> {
        let (default_width, default_height) = self.default_size;
        let window = self.window_mut(id)?;
        if layout.is_some() {
            window.layout = layout;
        }
        let name = window.name().to_string();
        let mut snapshot = window.snapshot();
        if snapshot.correct_size(default_width, default_height) {
            warn!(window = %id, name = %name, "window had zero size, committing default");
        }
        debug!(window = %id, name = %name, "window state committed");
        self.states.insert(name, snapshot);
        Ok(())
    }

    /// Saved state for a window name.
    pub fn window_state(&self, name: &str) -> Option<&LayoutSnapshot> {
        self.states.get(name)
    }

    /// Commit every open window, then write all known states.
    pub fn save_window_states(
        &mut self,
        store: &ProfileStore,
        scope: ProfileScope,
    ) -> Result<(), ConfigError> {
        for id in self.ids() {
            let _ = self.commit_window_state(id, None);
        }

        let mut profile = store.load_profile(WINDOW_LAYOUT_PROFILE, scope, json!({}))?;
        for (name, snapshot) in &self.states {
            match serde_json::to_value(snapshot) {
                Ok(value) => profile.set(name.clone(), value),
                Err(e) => warn!(name = %name, error = %e, "failed to serialize window state"),
            }
        }
        profile.save()?;
        info!(count = self.states.len(), "window states saved");
        Ok(())
    }

    /// Read saved states so windows created afterwards reopen where they
    /// were. Entries with a zero width or height get the default size.
    pub fn restore_window_states(
        &mut self,
        store: &ProfileStore,
        scope: ProfileScope,
    ) -> Result<usize, ConfigError> {
        let profile = store.load_profile(WINDOW_LAYOUT_PROFILE, scope, json!({}))?;
        let (default_width, default_height) = self.default_size;

        let mut restored = 0;
        for (name, value) in profile.data() {
            let mut snapshot: LayoutSnapshot = match serde_json::from_value(value.clone()) {
                Ok(s) => s,
                Err(e) => {
                    warn!(name = %name, error = %e, "skipping malformed window state");
                    continue;
                }
            };
            if snapshot.correct_size(default_width, default_height) {
                warn!(name = %name, "window state had zero size, using default");
            }
            self.states.insert(name.clone(), snapshot);
            restored += 1;
        }
        debug!(restored, "window states restored");
        Ok(restored)
    }
}
